//! `quickpoll` - A terminal client for the Quick Poll service
//!
//! This library provides the poll server client, form state and validation,
//! headless view-models for the create, vote, and results screens, and a local
//! ledger of cast votes.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod model;
pub mod render;
pub mod route;
pub mod share;
pub mod storage;
pub mod views;
pub mod watch;

pub use api::{HttpPollClient, LegacyClient, PollApi};
pub use config::Config;
pub use error::{Error, Result};
pub use form::{FormErrors, PollForm, QuestionForm};
pub use logging::init_logging;
pub use model::{Poll, PollLink, PollResults};
pub use route::{share_url, Route};
pub use storage::{VoteLedger, VoteRecord};
pub use views::{CreatePollView, PollResultsView, PollVoteView};
pub use watch::{ResultsWatcher, WatchEvent, WatchHandle};
