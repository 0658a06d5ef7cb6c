//! Command-line interface for quickpoll.
//!
//! This module provides the CLI structure for the `qpoll` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, CreateCommand, LegacyCreateCommand, LoginCommand, OutputFormat,
    RegisterCommand, ResultsCommand, ShowCommand, VoteCommand, VotedCommand,
};

/// qpoll - Create, share, and vote on quick polls
///
/// A terminal client for the Quick Poll service. Create a poll, share its
/// link, cast votes, and watch the results update live.
#[derive(Debug, Parser)]
#[command(name = "qpoll")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format for commands that print data
    #[arg(long, value_enum, global = true, default_value = "plain")]
    pub format: OutputFormat,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a poll and print its share link
    Create(CreateCommand),

    /// Create a single-question poll through the legacy endpoint
    LegacyCreate(LegacyCreateCommand),

    /// Show a poll and its options
    Show(ShowCommand),

    /// Vote on a poll
    Vote(VoteCommand),

    /// Show a poll's results
    Results(ResultsCommand),

    /// Register a user account
    Register(RegisterCommand),

    /// Log in and print the user
    Login(LoginCommand),

    /// Inspect the local record of cast votes
    #[command(subcommand)]
    Voted(VotedCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
