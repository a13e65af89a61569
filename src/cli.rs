use clap::{Args, Parser, Subcommand};

use label_kit::settings::Settings;

/// Command-line surface for driving the label generator helpers from scripts.
#[derive(Parser, Debug)]
#[command(
    name = "label-kit",
    version,
    about = "Prompt, config, and list helpers for the QBO label generator"
)]
pub struct Cli {
    /// Running on a local machine; skip cloud logging.
    #[arg(long = "on-premises", global = true)]
    pub on_premises: bool,
    /// Answer yes to every confirmation prompt.
    #[arg(long = "yes-for-all", global = true)]
    pub yes_for_all: bool,
    /// Target the QBO sandbox company.
    #[arg(long = "sandbox", global = true)]
    pub sandbox: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a yes/no question; exits 1 when declined.
    Confirm { text: String },
    /// Check for a regular file in the current directory; exits 1 when absent.
    FileExists { name: String },
    /// Capture fields into `<BASE_NAME>.json`.
    Ask(AskArgs),
    /// Read a comma-separated list and print it as JSON.
    List { text: String },
    /// Print a record previously saved with `ask`.
    Show { base_name: String },
}

#[derive(Args, Debug)]
pub struct AskArgs {
    pub base_name: String,
    /// Field names to prompt for, in order.
    #[arg(required_unless_present = "set", conflicts_with = "set")]
    pub fields: Vec<String>,
    /// Provide a value directly instead of prompting.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_pair)]
    pub set: Vec<(String, String)>,
}

impl From<&Cli> for Settings {
    fn from(cli: &Cli) -> Self {
        Settings {
            on_premises: cli.on_premises,
            yes_for_all: cli.yes_for_all,
            sandbox: cli.sandbox,
        }
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

/// Helper entry point so `main` can stay minimal.
pub fn parse() -> Cli {
    Cli::parse()
}
