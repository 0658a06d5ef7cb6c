//! The poll creation view.

use tracing::{debug, info};

use crate::api::PollApi;
use crate::form::PollForm;
use crate::route::Route;

/// Shown when creation fails without a server message.
pub const CREATE_FAILED: &str = "Failed to create poll. Please try again.";

/// State of the create view: the form plus submission status.
#[derive(Debug, Clone, Default)]
pub struct CreatePollView {
    form: PollForm,
    creator_id: Option<i64>,
    is_submitting: bool,
    submit_error: Option<String>,
}

impl CreatePollView {
    /// Create a view with an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute created polls to a user.
    #[must_use]
    pub fn with_creator(mut self, creator_id: Option<i64>) -> Self {
        self.creator_id = creator_id;
        self
    }

    /// The form being edited.
    #[must_use]
    pub fn form(&self) -> &PollForm {
        &self.form
    }

    /// Mutable access to the form.
    pub fn form_mut(&mut self) -> &mut PollForm {
        &mut self.form
    }

    /// Whether a creation request is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Error from the last failed submission.
    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Label of the submit button.
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting {
            "Creating..."
        } else {
            "Create Poll"
        }
    }

    /// Validate and submit the form.
    ///
    /// Returns the route of the new poll's vote page on success. On failure
    /// the reason is kept in the form errors or [`Self::submit_error`].
    pub async fn submit<A: PollApi + ?Sized>(&mut self, api: &A) -> Option<Route> {
        let Ok(request) = self.form.to_request(self.creator_id) else {
            return None;
        };

        self.is_submitting = true;
        self.submit_error = None;
        let outcome = api.create_poll(&request).await;
        self.is_submitting = false;

        match outcome {
            Ok(response) => {
                info!(
                    "Created poll {} at link {}",
                    response.poll_id, response.poll_link
                );
                Some(Route::Vote(response.poll_link))
            }
            Err(err) => {
                debug!("Error creating poll: {}", err);
                self.submit_error = Some(err.user_message(CREATE_FAILED));
                None
            }
        }
    }
}
