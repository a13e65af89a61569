use std::io::{BufRead, Write};

use anyhow::Result;
use serde::Serialize;

use crate::terminal::Terminal;

/// Comma-separated input coerced to a single element type.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedList {
    Integers(Vec<i64>),
    Strings(Vec<String>),
}

impl ParsedList {
    pub fn len(&self) -> usize {
        match self {
            ParsedList::Integers(items) => items.len(),
            ParsedList::Strings(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Prompt with `text` and parse the answer with [`parse_list`].
pub fn list_from_input<R: BufRead, W: Write>(
    term: &mut Terminal<R, W>,
    text: &str,
) -> Result<ParsedList> {
    let raw = term.prompt(text)?;
    Ok(parse_list(&raw))
}

/// Strip all whitespace, split on commas, and return integers only if every token
/// is one. A single bad token turns the whole list into strings.
pub fn parse_list(raw: &str) -> ParsedList {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let tokens: Vec<&str> = compact.split(',').collect();

    match tokens
        .iter()
        .map(|token| parse_integer(token))
        .collect::<Option<Vec<_>>>()
    {
        Some(numbers) => ParsedList::Integers(numbers),
        None => ParsedList::Strings(tokens.into_iter().map(str::to_owned).collect()),
    }
}

/// Optional sign, then digits with single `_` separators between digit groups.
fn parse_integer(token: &str) -> Option<i64> {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    if digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    token.replace('_', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn strings(items: &[&str]) -> ParsedList {
        ParsedList::Strings(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn integers_with_spaces() {
        assert_eq!(parse_list("1, 2,3"), ParsedList::Integers(vec![1, 2, 3]));
        assert_eq!(parse_list(" -4 ,\t+5 "), ParsedList::Integers(vec![-4, 5]));
    }

    #[test]
    fn words_stay_strings() {
        assert_eq!(parse_list("a,b"), strings(&["a", "b"]));
        assert_eq!(parse_list("Acme Ltd, Beta"), strings(&["AcmeLtd", "Beta"]));
    }

    #[test]
    fn one_bad_token_downgrades_everything() {
        assert_eq!(parse_list("1,2,x"), strings(&["1", "2", "x"]));
        assert_eq!(parse_list("1,,3"), strings(&["1", "", "3"]));
    }

    #[test]
    fn underscore_digit_groups_are_integers() {
        assert_eq!(parse_list("1_000,2"), ParsedList::Integers(vec![1000, 2]));
        assert_eq!(parse_list("-1_0"), ParsedList::Integers(vec![-10]));
        assert_eq!(parse_list("1__0,2"), strings(&["1__0", "2"]));
        assert_eq!(parse_list("_1,2"), strings(&["_1", "2"]));
        assert_eq!(parse_list("1_,2"), strings(&["1_", "2"]));
        assert_eq!(parse_list("+_1"), strings(&["+_1"]));
    }

    #[test]
    fn values_beyond_i64_fall_back_to_strings() {
        assert_eq!(
            parse_list("9223372036854775807"),
            ParsedList::Integers(vec![i64::MAX])
        );
        assert_eq!(
            parse_list("9223372036854775808,1"),
            strings(&["9223372036854775808", "1"])
        );
    }

    #[test]
    fn empty_input_is_a_single_empty_string() {
        let parsed = parse_list("");
        assert_eq!(parsed, strings(&[""]));
        assert_eq!(parsed.len(), 1);
        assert_eq!(parse_list("   "), strings(&[""]));
    }

    #[test]
    fn serializes_as_plain_json_array() {
        assert_eq!(
            serde_json::to_string(&parse_list("7,8")).unwrap(),
            "[7,8]"
        );
        assert_eq!(
            serde_json::to_string(&parse_list("x")).unwrap(),
            r#"["x"]"#
        );
    }

    #[test]
    fn reads_one_line_from_the_terminal() {
        let mut term = Terminal::new(Cursor::new(b"10, 20\n30\n".to_vec()), Vec::new());
        let parsed = list_from_input(&mut term, "Invoice numbers: ").unwrap();
        assert_eq!(parsed, ParsedList::Integers(vec![10, 20]));
        assert_eq!(String::from_utf8_lossy(term.output()), "Invoice numbers: ");
    }
}
