use std::path::PathBuf;

use clap::{ArgAction, Parser};
use engine_logging::LogDestination;
use log::LevelFilter;
use netident_core::Field;

#[derive(Debug, Parser)]
#[command(name = "netident")]
#[command(version, about = "Show the public addresses, location, provider and device behind this session.")]
pub struct Cli {
    /// User-agent string to classify and identify
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Client-hints JSON document ({ platform, platformVersion, fullVersionList })
    #[arg(long, value_name = "FILE")]
    pub client_hints: Option<PathBuf>,

    /// RON configuration file (default: ./netident.ron when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Per-lookup timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Copy a field's value to the clipboard once the report is complete
    #[arg(long, value_name = "FIELD")]
    pub copy: Option<Field>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Where log output goes: file, terminal, both or off
    #[arg(long, value_name = "DEST", default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_log_to_file_at_info() {
        let cli = Cli::try_parse_from(["netident"]).unwrap();
        assert_eq!(cli.log, LogDestination::File);
        assert_eq!(cli.log_level(), LevelFilter::Info);
        assert!(cli.copy.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn parses_copy_field_by_label() {
        let cli = Cli::try_parse_from(["netident", "--copy", "ipv6", "-vv", "--log", "both"]).unwrap();
        assert_eq!(cli.copy, Some(Field::Ipv6));
        assert_eq!(cli.log, LogDestination::Both);
        assert_eq!(cli.log_level(), LevelFilter::Trace);
    }

    #[test]
    fn rejects_unknown_copy_field() {
        assert!(Cli::try_parse_from(["netident", "--copy", "mac"]).is_err());
    }
}
