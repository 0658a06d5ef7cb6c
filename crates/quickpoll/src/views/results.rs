//! The poll results view.

use tracing::debug;

use crate::api::PollApi;
use crate::error::Result;
use crate::model::{PollLink, PollResults};
use crate::views::Action;
use crate::watch::WatchEvent;

/// Shown when results cannot be loaded without a server message.
pub const RESULTS_FAILED: &str = "Failed to load results";

/// State of the results view for one poll.
///
/// Once results have loaded they stay on screen; later refresh failures only
/// record the error.
#[derive(Debug, Clone)]
pub struct PollResultsView {
    link: PollLink,
    results: Option<PollResults>,
    error: Option<String>,
    is_loading: bool,
}

impl PollResultsView {
    /// Create a view for the poll at `link`, not yet loaded.
    #[must_use]
    pub fn new(link: PollLink) -> Self {
        Self {
            link,
            results: None,
            error: None,
            is_loading: true,
        }
    }

    /// Link of the poll shown.
    #[must_use]
    pub fn link(&self) -> &PollLink {
        &self.link
    }

    /// The most recently loaded results.
    #[must_use]
    pub fn results(&self) -> Option<&PollResults> {
        self.results.as_ref()
    }

    /// Error from the most recent refresh.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a refresh is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the view has nothing to show but an error.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.results.is_none() && self.error.is_some()
    }

    /// Actions offered below the results.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn actions(&self) -> [Action; 2] {
        [Action::VoteAgain, Action::CreateNewPoll]
    }

    /// Fetch results once. Returns whether the fetch succeeded.
    pub async fn refresh<A: PollApi + ?Sized>(&mut self, api: &A) -> bool {
        self.is_loading = true;
        let outcome = api.get_poll_results(&self.link).await;
        self.apply(outcome)
    }

    /// Fold a fetch outcome into the view. Returns whether it succeeded.
    pub fn apply(&mut self, outcome: Result<PollResults>) -> bool {
        self.is_loading = false;
        match outcome {
            Ok(results) => {
                self.results = Some(results);
                self.error = None;
                true
            }
            Err(err) => {
                debug!("Error fetching results for {}: {}", self.link, err);
                self.error = Some(err.user_message(RESULTS_FAILED));
                false
            }
        }
    }

    /// Fold a watcher event into the view.
    pub fn apply_event(&mut self, event: WatchEvent) {
        self.is_loading = false;
        match event {
            WatchEvent::Updated(results) => {
                self.results = Some(results);
                self.error = None;
            }
            WatchEvent::Failed(message) => self.error = Some(message),
        }
    }
}
