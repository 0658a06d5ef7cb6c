//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Subcommand, ValueEnum};

/// Create command arguments.
#[derive(Debug, Args)]
pub struct CreateCommand {
    /// The poll question (up to 200 characters)
    pub question: String,

    /// A choice; repeat for each one (at least two)
    #[arg(short, long = "option", value_name = "TEXT")]
    pub options: Vec<String>,

    /// Attribute the poll to this user id
    #[arg(long, value_name = "ID")]
    pub creator_id: Option<i64>,

    /// Copy the share link to the clipboard
    #[arg(long)]
    pub copy: bool,
}

/// Legacy create command arguments.
#[derive(Debug, Args)]
pub struct LegacyCreateCommand {
    /// The poll question
    pub question: String,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Poll link or share URL
    pub link: String,

    /// Copy the share link to the clipboard
    #[arg(long)]
    pub copy: bool,
}

/// Vote command arguments.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("selection").required(true).args(["option_id", "choice"])))]
pub struct VoteCommand {
    /// Poll link or share URL
    pub link: String,

    /// Vote for the option with this id
    #[arg(long, value_name = "ID")]
    pub option_id: Option<i64>,

    /// Vote for the Nth option as listed by `show` (1-based)
    #[arg(long, value_name = "N")]
    pub choice: Option<usize>,

    /// Attribute the vote to this user id
    #[arg(long, value_name = "ID")]
    pub voter_id: Option<i64>,
}

/// Results command arguments.
#[derive(Debug, Args)]
pub struct ResultsCommand {
    /// Poll link or share URL
    pub link: String,

    /// Keep refreshing until interrupted
    #[arg(short, long)]
    pub watch: bool,

    /// Seconds between refreshes (defaults to the configured interval)
    #[arg(short, long, value_name = "SECS", requires = "watch")]
    pub interval: Option<u64>,

    /// Copy the share link to the clipboard
    #[arg(long)]
    pub copy: bool,
}

/// Register command arguments.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    /// Username
    #[arg(long)]
    pub username: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Password
    #[arg(long)]
    pub password: String,
}

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Email address
    #[arg(long)]
    pub email: String,

    /// Password
    #[arg(long)]
    pub password: String,
}

/// Local vote ledger commands.
#[derive(Debug, Subcommand)]
pub enum VotedCommand {
    /// List polls voted on from this machine
    List,

    /// Forget the vote on one poll so it can be cast again
    Forget {
        /// Poll link or share URL
        link: String,
    },

    /// Forget every recorded vote
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Plain,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_output_format_values() {
        let names: Vec<_> = OutputFormat::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["plain", "json"]);
    }
}
