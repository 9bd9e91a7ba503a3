use clap::Parser;
use trade_pipeline::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
