use clap::Parser;
use desksweep::cli::{self, Cli};
use desksweep::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();

    OutputFormatter::info("desksweep - Desktop & Downloads organizer");

    if let Err(e) = cli::run(&cli) {
        OutputFormatter::error(&e);
    }
}
