//! Headless view-models for the three screens: create, vote, and results.
//!
//! Each view owns its state and talks to the server through
//! [`crate::api::PollApi`]. Failures are caught, turned into a message, and
//! kept on the view; nothing is retried.

mod create;
mod results;
mod vote;

pub use create::{CreatePollView, CREATE_FAILED};
pub use results::{PollResultsView, RESULTS_FAILED};
pub use vote::{PollVoteView, LOAD_FAILED, VOTE_FAILED};

/// Loading state of a fetched resource.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// The fetch has not completed.
    Loading,
    /// The fetch failed with a user-facing message.
    Failed(String),
    /// The resource is available.
    Ready(T),
}

impl<T> LoadState<T> {
    /// The loaded value, if ready.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Whether the fetch is still pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// A button offered by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Submit the selected option.
    SubmitVote,
    /// Go to the results page.
    ViewResults,
    /// Go back to the vote page.
    VoteAgain,
    /// Go to the create page.
    CreateNewPoll,
}

impl Action {
    /// Button label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SubmitVote => "Submit Vote",
            Self::ViewResults => "View Results",
            Self::VoteAgain => "Vote Again",
            Self::CreateNewPoll => "Create New Poll",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_state_accessors() {
        let loading: LoadState<i32> = LoadState::Loading;
        assert!(loading.is_loading());
        assert!(loading.value().is_none());

        let failed: LoadState<i32> = LoadState::Failed("nope".to_string());
        assert_eq!(failed.failure(), Some("nope"));

        let ready = LoadState::Ready(3);
        assert_eq!(ready.value(), Some(&3));
        assert!(ready.failure().is_none());
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::SubmitVote.label(), "Submit Vote");
        assert_eq!(Action::VoteAgain.label(), "Vote Again");
        assert_eq!(Action::CreateNewPoll.label(), "Create New Poll");
    }
}
