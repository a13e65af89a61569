use std::io::{self, BufRead, StdinLock, Stdout, Write};

use anyhow::{Context, Result, bail};

/// Line-oriented prompt/response channel. Production code talks to stdin/stdout;
/// tests hand in byte buffers.
#[derive(Debug)]
pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl Terminal<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Show `label` and read one line, without its line terminator.
    /// Other whitespace is left alone.
    pub fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}").with_context(|| format!("writing prompt `{label}`"))?;
        self.output
            .flush()
            .with_context(|| format!("writing prompt `{label}`"))?;

        let mut buf = String::new();
        let read = self
            .input
            .read_line(&mut buf)
            .with_context(|| format!("reading input for `{label}`"))?;
        if read == 0 {
            bail!("input closed while waiting for `{label}`");
        }
        Ok(buf.trim_end_matches(['\n', '\r']).to_owned())
    }

    pub fn blank_line(&mut self) -> Result<()> {
        writeln!(self.output).context("writing to terminal")
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn terminal(input: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
        Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn prompt_writes_label_and_strips_terminator_only() {
        let mut term = terminal("  Acme Ltd \r\nnext\n");
        assert_eq!(term.prompt("Company: ").unwrap(), "  Acme Ltd ");
        assert_eq!(term.prompt("Again: ").unwrap(), "next");
        assert_eq!(String::from_utf8_lossy(term.output()), "Company: Again: ");
    }

    #[test]
    fn prompt_accepts_last_line_without_newline() {
        let mut term = terminal("42");
        assert_eq!(term.prompt("> ").unwrap(), "42");
    }

    #[test]
    fn prompt_fails_when_input_is_closed() {
        let mut term = terminal("");
        let err = term.prompt("Continue? ").unwrap_err();
        assert!(err.to_string().contains("input closed"));
    }
}
