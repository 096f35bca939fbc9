use clap::Parser;
use starrank_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Log file under the XDG state dir unless asked for stderr or the file is unusable.
    if cli.log_stderr || logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = cli.run().await {
        eprintln!("starrank error: {:#}", err);
        std::process::exit(1);
    }
}
