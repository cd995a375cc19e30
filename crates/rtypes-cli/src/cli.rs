//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config;

/// RemoteTypes - persistent dictionaries, lists and sets behind a batch protocol
#[derive(Parser, Debug)]
#[command(name = "rtypes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding the collection files
    #[arg(short, long, env = "RTYPES_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Consume batches from stdin, one JSON array per line, and write one
    /// response batch per line to stdout
    Serve {
        /// How long a read waits before checking for shutdown, in milliseconds
        #[arg(long, default_value_t = 1000)]
        poll_timeout_ms: u64,

        /// Do not flush stdout after every response batch
        #[arg(long)]
        no_flush: bool,
    },

    /// Run a single batch and print its response batch
    Exec {
        /// File holding the batch, or `-` for stdin
        #[arg(default_value = "-")]
        file: PathBuf,

        /// Pretty-print the response batch
        #[arg(short, long)]
        pretty: bool,
    },
}

impl Cli {
    /// Returns the storage directory, using the default if not specified.
    pub fn storage_dir(&self) -> PathBuf {
        config::resolve_storage_dir(self.storage_dir.clone())
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_serve_defaults() {
        let cli = Cli::parse_from(["rtypes", "serve"]);
        match cli.command {
            Commands::Serve {
                poll_timeout_ms,
                no_flush,
            } => {
                assert_eq!(poll_timeout_ms, 1000);
                assert!(!no_flush);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_exec() {
        let cli = Cli::parse_from(["rtypes", "exec", "batch.json", "--pretty"]);
        match cli.command {
            Commands::Exec { file, pretty } => {
                assert_eq!(file, PathBuf::from("batch.json"));
                assert!(pretty);
            }
            _ => panic!("Expected Exec command"),
        }
    }

    #[test]
    fn test_cli_exec_defaults_to_stdin() {
        let cli = Cli::parse_from(["rtypes", "exec"]);
        assert!(matches!(cli.command, Commands::Exec { file, .. } if file == PathBuf::from("-")));
    }

    #[test]
    fn test_cli_storage_dir_flag() {
        let cli = Cli::parse_from(["rtypes", "--storage-dir", "/tmp/rt", "serve"]);
        assert_eq!(cli.storage_dir(), PathBuf::from("/tmp/rt"));
    }

    #[test]
    fn test_cli_verbose() {
        let cli = Cli::parse_from(["rtypes", "-vv", "serve"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }
}
