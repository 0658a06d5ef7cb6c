//! Client for the legacy single-question `/create_poll` endpoint.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use super::send_json;
use crate::config::Config;
use crate::error::{Error, Result, CONNECT_MESSAGE};
use crate::form::QuestionForm;
use crate::model::{LegacyCreateRequest, LegacyCreateResponse};

/// Shown when the legacy endpoint refuses a question without a message.
pub const LEGACY_FAILED: &str = "Poll could not be created.";

/// Message shown for a failed legacy submission.
///
/// The legacy form reports an unreadable response the same way as an
/// unreachable server.
#[must_use]
pub fn failure_message(err: &Error) -> String {
    match err {
        Error::Decode { .. } => CONNECT_MESSAGE.to_string(),
        Error::Validation(errors) => errors.to_string(),
        other => other.user_message(LEGACY_FAILED),
    }
}

/// Posts bare questions to the legacy form endpoint.
#[derive(Debug, Clone)]
pub struct LegacyClient {
    http: Client,
    base_url: String,
}

impl LegacyClient {
    /// Create a client for the server rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the `[api]` section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api.legacy_base_url.clone(), config.request_timeout())
    }

    /// Create a poll from a single, already validated question.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Api`] with the server's `message` when the
    /// server refuses the question, or [`crate::Error::Connect`] when it
    /// cannot be reached.
    pub async fn create_poll(&self, question: &str) -> Result<LegacyCreateResponse> {
        let url = format!("{}/create_poll", self.base_url);
        let body = LegacyCreateRequest {
            poll_question: question.to_string(),
        };
        let response: LegacyCreateResponse =
            send_json(self.http.post(&url).json(&body), &url).await?;
        info!("Legacy poll created with id {:?}", response.poll_id);
        Ok(response)
    }

    /// Validate `form`, post its question, and clear the form once the
    /// server accepts it.
    ///
    /// # Errors
    ///
    /// Returns the message to show: the validation error, the server's
    /// `message`, or [`CONNECT_MESSAGE`] when the server is unreachable or
    /// does not answer with JSON. The form is left untouched.
    pub async fn submit_form(
        &self,
        form: &mut QuestionForm,
    ) -> std::result::Result<LegacyCreateResponse, String> {
        let question = form.validate().map_err(|e| failure_message(&e))?;
        debug!("Submitting legacy question ({})", form.char_counter());

        match self.create_poll(&question).await {
            Ok(response) if response.status.as_deref() == Some("error") => {
                Err(response.message.unwrap_or_else(|| LEGACY_FAILED.to_string()))
            }
            Ok(response) => {
                form.reset();
                Ok(response)
            }
            Err(err) => Err(failure_message(&err)),
        }
    }
}
