mod cli;
mod config;
mod console;
mod database;
mod error;
mod media_items;
mod migrator;
mod prefix;

use cli::Cli;
use config::Config;
use flexi_logger::Logger;
use log::{debug, error, info};

fn main() {
    let config = Config::init();

    // Levels come from the [logging] section of the config file
    let _logger = match Logger::try_with_str(config.logging.log_spec())
        .and_then(|logger| logger.log_to_stderr().start())
    {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {}", err);
            None
        }
    };
    debug!("Command-line args: {:?}", std::env::args_os().collect::<Vec<_>>());

    match Cli::handle_command_line() {
        Ok(()) => {}
        Err(err) if err.is_user_abort() => {
            info!("Session ended early: {:?}", err);
            println!("{}", err);
        }
        Err(err) => {
            error!("{:?}", err);
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
