//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How single-shot replies are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The reply only
    Text,
    /// The reply followed by each tool that ran
    Full,
    /// A JSON object with the reply and tool results
    Json,
}

/// CLI arguments for naomi
#[derive(Parser, Debug)]
#[command(name = "naomi")]
#[command(author, version, about = "Calendar assistant driven by an LLM with tool calling")]
#[command(long_about = r#"
naomi turns plain requests into calendar changes. The model decides which
tools to call (add, check, remove or move events, send an alert email);
naomi runs them and the model summarizes what happened.

Configuration files are loaded from (in priority order):
1. NAOMI_* environment variables (e.g. NAOMI_GEMINI__MODEL)
2. --config <path>     Explicit config file
3. ./naomi.toml        Project-level config
4. ~/.config/naomi/config.toml   Global config

A .env file in the working directory is read first.

Example:
  naomi "Add a team sync tomorrow at 3pm"
  naomi "What's on my schedule this week?" --output full
  naomi --chat
"#)]
pub struct Cli {
    /// The request to send (not required in chat mode)
    pub message: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Output format for single-shot mode
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Keep the calendar and sheet in memory instead of calling Google
    #[arg(long)]
    pub offline: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_shot_args() {
        let cli = Cli::parse_from(["naomi", "-vv", "--output", "json", "Add lunch at noon"]);
        assert_eq!(cli.message.as_deref(), Some("Add lunch at noon"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(!cli.chat);
    }

    #[test]
    fn test_chat_defaults() {
        let cli = Cli::parse_from(["naomi", "--chat", "--offline"]);
        assert!(cli.chat);
        assert!(cli.offline);
        assert!(cli.message.is_none());
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
