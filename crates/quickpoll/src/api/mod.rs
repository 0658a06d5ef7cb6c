//! Client for the poll server's REST API.
//!
//! [`PollApi`] is the seam the views talk to; [`HttpPollClient`] implements it
//! over HTTP. [`LegacyClient`] covers the single-question `/create_poll`
//! endpoint served by the older form handler.
//!
//! Requests are made once: no retries, no backoff, no caching.

mod client;
mod legacy;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{
    CreatePollRequest, CreatePollResponse, LoginRequest, LoginResponse, Poll, PollLink,
    PollResults, RegisterRequest, RegisterResponse, VoteRequest, VoteResponse,
};

pub use client::HttpPollClient;
pub use legacy::{LegacyClient, LEGACY_FAILED};

/// Operations offered by the poll server.
#[async_trait]
pub trait PollApi: Send + Sync {
    /// Create a poll. `POST /polls`
    async fn create_poll(&self, request: &CreatePollRequest) -> Result<CreatePollResponse>;

    /// Fetch a poll and its options. `GET /polls/:link`
    async fn get_poll(&self, link: &PollLink) -> Result<Poll>;

    /// Fetch tallied results. `GET /polls/:link/results`
    async fn get_poll_results(&self, link: &PollLink) -> Result<PollResults>;

    /// Cast a vote. `POST /votes`
    async fn submit_vote(&self, request: &VoteRequest) -> Result<VoteResponse>;

    /// Register a user. `POST /users/register`
    async fn register_user(&self, request: &RegisterRequest) -> Result<RegisterResponse>;

    /// Log a user in. `POST /users/login`
    async fn login_user(&self, request: &LoginRequest) -> Result<LoginResponse>;
}

/// Send a request and decode a JSON body, mapping failures to [`Error`].
///
/// Transport failures become [`Error::Connect`]; non-success statuses become
/// [`Error::Api`] carrying the server's message when the body has one.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder, url: &str) -> Result<T> {
    debug!("Sending request to {}", url);
    let response = request.send().await.map_err(|source| {
        if source.is_builder() {
            Error::Http(source)
        } else {
            warn!("Request to {} failed: {}", url, source);
            Error::Connect {
                url: url.to_string(),
                source,
            }
        }
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|source| Error::Connect {
        url: url.to_string(),
        source,
    })?;

    if !status.is_success() {
        let message = error_message(&body);
        debug!("{} answered {}: {:?}", url, status, message);
        return Err(Error::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|source| Error::Decode {
        endpoint: url.to_string(),
        source,
    })
}

/// Extract the server's error text from a failure body.
///
/// The REST API uses `{"error": ...}`; the legacy endpoint uses
/// `{"status": "error", "message": ...}`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(serde_json::Value::as_str))
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// In-process [`PollApi`] used by view and watcher tests.
#[cfg(test)]
pub(crate) mod fake {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::model::{PollOption, ResultOption, User};

    /// Scripted failure returned by every call when set.
    #[derive(Debug, Clone)]
    pub(crate) enum Failure {
        Api(u16, Option<String>),
        Internal,
    }

    impl Failure {
        fn to_error(&self) -> Error {
            match self {
                Self::Api(status, message) => Error::Api {
                    status: *status,
                    message: message.clone(),
                },
                Self::Internal => Error::internal("scripted failure"),
            }
        }
    }

    #[derive(Debug, Default)]
    pub(crate) struct FakeApi {
        pub(crate) poll: Option<Poll>,
        pub(crate) results: Option<PollResults>,
        pub(crate) failure: Mutex<Option<Failure>>,
        pub(crate) created: Mutex<Vec<CreatePollRequest>>,
        pub(crate) votes: Mutex<Vec<VoteRequest>>,
        pub(crate) result_calls: AtomicUsize,
    }

    impl FakeApi {
        pub(crate) fn with_poll(poll: Poll) -> Self {
            let results = PollResults {
                poll_id: poll.poll_id,
                question: poll.question.clone(),
                poll_link: poll.poll_link.clone(),
                created_at: poll.created_at.clone(),
                total_votes: 0,
                options: poll
                    .options
                    .iter()
                    .map(|o| ResultOption {
                        option_id: o.option_id,
                        option_text: o.option_text.clone(),
                        vote_count: 0,
                        percentage: 0.0,
                    })
                    .collect(),
            };
            Self {
                poll: Some(poll),
                results: Some(results),
                ..Self::default()
            }
        }

        pub(crate) fn fail_with(&self, failure: Option<Failure>) {
            *self.failure.lock().unwrap() = failure;
        }

        fn check(&self) -> Result<()> {
            match &*self.failure.lock().unwrap() {
                Some(failure) => Err(failure.to_error()),
                None => Ok(()),
            }
        }

        fn not_found() -> Error {
            Error::Api {
                status: 404,
                message: Some("Poll not found".to_string()),
            }
        }
    }

    pub(crate) fn sample_poll() -> Poll {
        Poll {
            poll_id: 1,
            question: "Best season?".to_string(),
            poll_link: PollLink::parse("season1").unwrap(),
            created_at: Some("2024-05-01 10:00:00".to_string()),
            options: vec![
                PollOption {
                    option_id: 11,
                    option_text: "Summer".to_string(),
                    vote_count: 0,
                },
                PollOption {
                    option_id: 12,
                    option_text: "Winter".to_string(),
                    vote_count: 0,
                },
            ],
        }
    }

    #[async_trait]
    impl PollApi for FakeApi {
        async fn create_poll(&self, request: &CreatePollRequest) -> Result<CreatePollResponse> {
            self.check()?;
            self.created.lock().unwrap().push(request.clone());
            Ok(CreatePollResponse {
                message: Some("Poll created successfully".to_string()),
                poll_id: 99,
                poll_link: PollLink::parse("newpoll").unwrap(),
            })
        }

        async fn get_poll(&self, link: &PollLink) -> Result<Poll> {
            self.check()?;
            self.poll
                .clone()
                .filter(|p| &p.poll_link == link)
                .ok_or_else(Self::not_found)
        }

        async fn get_poll_results(&self, link: &PollLink) -> Result<PollResults> {
            self.result_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.results
                .clone()
                .filter(|r| &r.poll_link == link)
                .ok_or_else(Self::not_found)
        }

        async fn submit_vote(&self, request: &VoteRequest) -> Result<VoteResponse> {
            self.check()?;
            self.votes.lock().unwrap().push(request.clone());
            Ok(VoteResponse {
                message: Some("Vote submitted successfully".to_string()),
                vote_id: Some(1),
            })
        }

        async fn register_user(&self, _request: &RegisterRequest) -> Result<RegisterResponse> {
            self.check()?;
            Ok(RegisterResponse {
                message: None,
                user_id: 1,
            })
        }

        async fn login_user(&self, request: &LoginRequest) -> Result<LoginResponse> {
            self.check()?;
            Ok(LoginResponse {
                message: None,
                user: User {
                    user_id: 1,
                    username: "tester".to_string(),
                    email: request.email.clone(),
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_rest_shape() {
        assert_eq!(
            error_message(r#"{"error": "Poll not found"}"#).as_deref(),
            Some("Poll not found")
        );
    }

    #[test]
    fn test_error_message_legacy_shape() {
        assert_eq!(
            error_message(r#"{"status": "error", "message": "Invalid question"}"#).as_deref(),
            Some("Invalid question")
        );
    }

    #[test]
    fn test_error_message_prefers_error_field() {
        assert_eq!(
            error_message(r#"{"message": "m", "error": "e"}"#).as_deref(),
            Some("e")
        );
    }

    #[test]
    fn test_error_message_absent() {
        assert!(error_message("<html>Bad Gateway</html>").is_none());
        assert!(error_message(r#"{"error": ""}"#).is_none());
        assert!(error_message(r#"{"error": 42}"#).is_none());
    }
}
