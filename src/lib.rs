//! Interactive helpers for the QBO label generator: run flags, logging,
//! confirmation prompts, file checks, JSON config capture, and list parsing.

pub mod files;
pub mod list;
pub mod logging;
pub mod prompt;
pub mod record;
pub mod settings;
pub mod terminal;
