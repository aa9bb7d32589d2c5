use clap::Parser;
use fxbacktest::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
