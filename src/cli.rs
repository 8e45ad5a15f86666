use clap::Parser;
use log::info;

use crate::console::TerminalConsole;
use crate::error::RelocateError;
use crate::migrator::Migrator;

/// Everything is asked for interactively; there are no options beyond
/// `--help` and `--version`.
#[derive(Parser)]
#[command(
    name = "nightingale-relocate",
    version,
    about = "Rewrites the music file path prefixes stored in a Nightingale/Songbird library database"
)]
pub struct Cli {}

impl Cli {
    pub fn handle_command_line() -> Result<(), RelocateError> {
        let _args = Cli::parse();

        let mut console = TerminalConsole::new();
        let summary = Migrator::run(&mut console)?;

        info!(
            "Migration complete: {} of {} songs changed ({} estimated, {} in library)",
            summary.changed, summary.scanned, summary.estimated, summary.total
        );

        Ok(())
    }
}
