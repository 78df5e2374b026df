//! Command-line arguments.

use clap::{Parser, Subcommand};

/// Metacat catalogue search service
#[derive(Parser, Debug)]
#[command(name = "metacat")]
#[command(author, version, about = "Metadata catalogue search service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "METACAT_CONFIG", global = true)]
    pub config: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the search API
    Serve {
        /// Override the listen host
        #[arg(long)]
        host: Option<String>,

        /// Override the listen port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create every resource index (existing indices are left alone)
    SetupIndices,

    /// Print the generated index mapping of one resource type
    Mapping {
        /// Plural resource name, e.g. `datasets`
        plural: String,
    },

    /// Inspect or edit the configuration file
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `metacat config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Show the effective configuration (file plus environment)
    Show,

    /// Get a value by dotted key, e.g. `server.port`
    Get {
        /// Dotted key
        key: String,
    },

    /// Set a value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },

    /// Write a default config file
    Init {
        /// Destination (defaults to the resolved config path)
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["metacat", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Serve {
                port: Some(9000),
                host: None
            }
        ));
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["metacat", "mapping", "datasets", "--config", "/tmp/m.toml"])
                .unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/m.toml"));
        assert!(matches!(cli.command, Command::Mapping { ref plural } if plural == "datasets"));
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["metacat", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Init {
                    file: None,
                    force: true
                }
            }
        ));
    }
}
