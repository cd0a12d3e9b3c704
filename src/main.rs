use clap::Parser;
use std::process::ExitCode;
use xmlfold::Cli;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}
