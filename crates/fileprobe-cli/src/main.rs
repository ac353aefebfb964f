mod cli;

use clap::Parser;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    if let Err(err) = cli.run() {
        eprintln!("fileprobe error: {:#}", err);
        std::process::exit(1);
    }
}
