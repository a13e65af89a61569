use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::debug;

use label_kit::files;
use label_kit::list;
use label_kit::prompt;
use label_kit::record::{self, DataSource};
use label_kit::settings::Settings;
use label_kit::terminal::Terminal;

use crate::cli::{AskArgs, Command};

pub fn run(command: Command, settings: &Settings) -> Result<ExitCode> {
    debug!(
        "running against the {} environment",
        settings.environment().as_str()
    );
    let mut term = Terminal::stdio();

    match command {
        Command::Confirm { text } => {
            let confirmed = prompt::confirm(settings, &mut term, &text)?;
            println!("{}", if confirmed { "yes" } else { "no" });
            Ok(status(confirmed))
        }
        Command::FileExists { name } => {
            let exists = files::file_exists(&name);
            println!("{exists}");
            Ok(status(exists))
        }
        Command::Ask(args) => {
            let base_name = args.base_name.clone();
            let record = record::ask_for_data(&mut term, &data_source(args), &base_name)?;
            println!("{}", record.to_json()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::List { text } => {
            let parsed = list::list_from_input(&mut term, &text)?;
            let rendered = serde_json::to_string(&parsed).context("rendering list")?;
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { base_name } => {
            let record = record::load(&base_name)?;
            println!("{}", record.to_json()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn status(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn data_source(args: AskArgs) -> DataSource {
    if args.set.is_empty() {
        DataSource::Prompt(args.fields)
    } else {
        DataSource::Provided(args.set)
    }
}
