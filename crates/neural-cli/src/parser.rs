//! Root CLI parser.

use clap::Parser;

use crate::commands::Commands;

/// OpenAI-compatible chat gateway in front of a local llama-server.
#[derive(Parser)]
#[command(name = "neural-gateway")]
#[command(about = "OpenAI-compatible chat gateway for a local LLM")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The command to run; `serve` when none was given.
    pub fn command_or_default(self) -> Commands {
        self.command.unwrap_or(Commands::Serve { port: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::parse_from(["neural-gateway"]);
        assert_eq!(cli.command_or_default(), Commands::Serve { port: None });
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::parse_from(["neural-gateway", "serve", "--port", "8088"]);
        assert_eq!(
            cli.command_or_default(),
            Commands::Serve { port: Some(8088) }
        );
    }

    #[test]
    fn test_config_command() {
        let cli = Cli::parse_from(["neural-gateway", "config"]);
        assert_eq!(cli.command_or_default(), Commands::Config);
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(Cli::try_parse_from(["neural-gateway", "serve", "--port", "70000"]).is_err());
    }
}
