use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use crate::settings::Settings;
use crate::terminal::Terminal;

/// Ask a yes/no question. Only "n" or "no" (any case) declines; anything else,
/// an empty answer included, confirms. `--yes-for-all` skips the prompt entirely.
pub fn confirm<R: BufRead, W: Write>(
    settings: &Settings,
    term: &mut Terminal<R, W>,
    text: &str,
) -> Result<bool> {
    if settings.yes_for_all {
        debug!("auto-confirmed: {text}");
        return Ok(true);
    }

    let answer = term.prompt(text)?;
    Ok(is_confirmation(&answer))
}

/// Whitespace is significant: " n" is not a decline.
pub fn is_confirmation(answer: &str) -> bool {
    !matches!(answer.to_lowercase().as_str(), "n" | "no")
}
