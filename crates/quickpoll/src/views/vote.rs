//! The poll voting view.

use tracing::{debug, info, warn};

use crate::api::PollApi;
use crate::error::{Error, Result};
use crate::model::{Poll, PollLink, VoteRequest};
use crate::route::Route;
use crate::storage::VoteLedger;
use crate::views::{Action, LoadState};

/// Shown when the poll cannot be loaded without a server message.
pub const LOAD_FAILED: &str = "Failed to load poll";

/// Shown when a vote fails without a server message.
pub const VOTE_FAILED: &str = "Failed to submit vote. Please try again.";

/// State of the vote view for one poll.
#[derive(Debug, Clone)]
pub struct PollVoteView {
    link: PollLink,
    state: LoadState<Poll>,
    selected_option: Option<i64>,
    has_voted: bool,
    is_submitting: bool,
    error: Option<String>,
    voter_id: Option<i64>,
}

impl PollVoteView {
    /// Create a view for the poll at `link`, not yet loaded.
    #[must_use]
    pub fn new(link: PollLink) -> Self {
        Self {
            link,
            state: LoadState::Loading,
            selected_option: None,
            has_voted: false,
            is_submitting: false,
            error: None,
            voter_id: None,
        }
    }

    /// Attribute submitted votes to a user.
    #[must_use]
    pub fn with_voter(mut self, voter_id: Option<i64>) -> Self {
        self.voter_id = voter_id;
        self
    }

    /// Link of the poll shown.
    #[must_use]
    pub fn link(&self) -> &PollLink {
        &self.link
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> &LoadState<Poll> {
        &self.state
    }

    /// The loaded poll, if any.
    #[must_use]
    pub fn poll(&self) -> Option<&Poll> {
        self.state.value()
    }

    /// The selected option id.
    #[must_use]
    pub fn selected_option(&self) -> Option<i64> {
        self.selected_option
    }

    /// Whether this client has voted on the poll.
    #[must_use]
    pub fn has_voted(&self) -> bool {
        self.has_voted
    }

    /// Whether option inputs are disabled.
    #[must_use]
    pub fn inputs_disabled(&self) -> bool {
        self.has_voted
    }

    /// Whether a vote is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Error shown above the options.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Label of the submit button.
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting {
            "Submitting..."
        } else {
            Action::SubmitVote.label()
        }
    }

    /// Actions offered below the options.
    #[must_use]
    pub fn actions(&self) -> [Action; 2] {
        if self.has_voted {
            [Action::ViewResults, Action::CreateNewPoll]
        } else {
            [Action::SubmitVote, Action::ViewResults]
        }
    }

    /// Fetch the poll and restore any vote recorded in the ledger.
    ///
    /// The ledger decides the voted state on every load, so a forgotten vote
    /// reopens the poll. Returns whether the poll loaded.
    pub async fn load<A: PollApi + ?Sized>(&mut self, api: &A, ledger: &VoteLedger) -> bool {
        self.state = LoadState::Loading;
        self.has_voted = false;
        self.selected_option = None;
        match api.get_poll(&self.link).await {
            Ok(poll) => {
                self.state = LoadState::Ready(poll);
                self.error = None;
                match ledger.get(&self.link) {
                    Ok(Some(record)) => {
                        self.has_voted = true;
                        self.selected_option = Some(record.option_id);
                    }
                    Ok(None) => {}
                    Err(err) => warn!("Could not read vote ledger: {}", err),
                }
                true
            }
            Err(err) => {
                debug!("Error fetching poll {}: {}", self.link, err);
                let message = err.user_message(LOAD_FAILED);
                self.state = LoadState::Failed(message.clone());
                self.error = Some(message);
                false
            }
        }
    }

    /// Select an option by id.
    ///
    /// Ignored once a vote has been cast; returns whether the selection changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] if the option is not part of the poll,
    /// or an internal error if the poll is not loaded.
    pub fn select(&mut self, option_id: i64) -> Result<bool> {
        let poll = self
            .poll()
            .ok_or_else(|| Error::internal("poll is not loaded"))?;
        if poll.option(option_id).is_none() {
            return Err(Error::InvalidOption { option: option_id });
        }
        if self.has_voted {
            return Ok(false);
        }
        self.selected_option = Some(option_id);
        Ok(true)
    }

    /// Select an option by its 1-based position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] if there is no such choice.
    pub fn select_choice(&mut self, choice: usize) -> Result<bool> {
        let option_id = self
            .poll()
            .and_then(|p| p.option_id_for_choice(choice))
            .ok_or(Error::InvalidOption {
                option: i64::try_from(choice).unwrap_or(i64::MAX),
            })?;
        self.select(option_id)
    }

    /// Submit the selected option.
    ///
    /// On success the vote is recorded in the ledger and the results route is
    /// returned. On failure the reason is kept in [`Self::error`].
    pub async fn submit<A: PollApi + ?Sized>(
        &mut self,
        api: &A,
        ledger: &VoteLedger,
    ) -> Option<Route> {
        let Some(option_id) = self.selected_option else {
            self.error = Some(Error::NoSelection.to_string());
            return None;
        };
        if self.has_voted {
            self.error = Some(
                Error::AlreadyVoted {
                    link: self.link.to_string(),
                }
                .to_string(),
            );
            return None;
        }
        let Some(poll) = self.poll() else {
            self.error = Some(LOAD_FAILED.to_string());
            return None;
        };

        let request = VoteRequest {
            poll_id: poll.poll_id,
            option_id,
            voter_id: self.voter_id,
        };
        let question = poll.question.clone();

        self.is_submitting = true;
        self.error = None;
        let outcome = api.submit_vote(&request).await;
        self.is_submitting = false;

        match outcome {
            Ok(_) => {
                info!("Voted for option {} on poll {}", option_id, self.link);
                if let Err(err) = ledger.record(&self.link, option_id, Some(&question)) {
                    warn!("Vote accepted but not recorded locally: {}", err);
                }
                self.has_voted = true;
                Some(Route::Results(self.link.clone()))
            }
            Err(err) => {
                debug!("Error submitting vote: {}", err);
                self.error = Some(err.user_message(VOTE_FAILED));
                None
            }
        }
    }
}
