mod cli;
mod runner;

use std::process::ExitCode;

use label_kit::logging;
use label_kit::settings::Settings;

fn main() -> anyhow::Result<ExitCode> {
    let app = cli::parse();
    let settings = Settings::from(&app);
    let _guard = logging::init(&settings)?;
    runner::run(app.command, &settings)
}
