//! sheetmeta - Table metadata and dependency graphs from spreadsheet cell dumps

mod cli;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbose, cli.quiet);

    if let Err(e) = cli.run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
