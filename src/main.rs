// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging and hand control to the UI flow.
// - Returns `anyhow::Result` to keep error handling simple.

use anyhow::Result;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

fn main() -> Result<()> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    // Prompts for breed and token, then runs the backup to completion.
    dog_backup::ui::run()?;
    Ok(())
}
