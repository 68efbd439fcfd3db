mod app;
mod cli;
mod clipboard;
mod config;
mod effects;
mod render;

use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse_args();
    match app::run(cli) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("netident: {err:#}");
            ExitCode::FAILURE
        }
    }
}
