mod anchor;
mod catalog;
mod cli;
mod config;
mod controller;
mod events;
mod identity;
mod logging;
mod model;
mod overlay;
mod placement;
mod schedule;
mod seen;
mod storage;
#[cfg(test)]
mod testing;
mod tui;

use std::process;

use clap::Parser;

use cli::Cli;
use config::Config;
use storage::Storage;

fn main() {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    // The terminal UI owns stderr's screen, so `run` logs to a file.
    let log_file = cli
        .is_interactive()
        .then(Storage::default_root)
        .flatten()
        .map(|root| root.join("tourguide.log"));
    let _guard = logging::init(cli.debug || config.debug, log_file.as_deref());

    if let Err(e) = cli::run(cli, &config) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
