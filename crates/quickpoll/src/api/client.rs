//! HTTP implementation of [`PollApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{send_json, PollApi};
use crate::config::Config;
use crate::error::Result;
use crate::model::{
    CreatePollRequest, CreatePollResponse, LoginRequest, LoginResponse, Poll, PollEnvelope,
    PollLink, PollResults, RegisterRequest, RegisterResponse, VoteRequest, VoteResponse,
};

/// [`PollApi`] over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpPollClient {
    http: Client,
    base_url: String,
}

impl HttpPollClient {
    /// Create a client for the API rooted at `base_url`.
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
        Self::new(config.api.base_url.clone(), config.request_timeout())
    }

    /// The API base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl PollApi for HttpPollClient {
    async fn create_poll(&self, request: &CreatePollRequest) -> Result<CreatePollResponse> {
        let url = self.url("/polls");
        send_json(self.http.post(&url).json(request), &url).await
    }

    async fn get_poll(&self, link: &PollLink) -> Result<Poll> {
        let url = self.url(&format!("/polls/{link}"));
        let envelope: PollEnvelope<Poll> = send_json(self.http.get(&url), &url).await?;
        Ok(envelope.poll)
    }

    async fn get_poll_results(&self, link: &PollLink) -> Result<PollResults> {
        let url = self.url(&format!("/polls/{link}/results"));
        let envelope: PollEnvelope<PollResults> = send_json(self.http.get(&url), &url).await?;
        Ok(envelope.poll)
    }

    async fn submit_vote(&self, request: &VoteRequest) -> Result<VoteResponse> {
        let url = self.url("/votes");
        send_json(self.http.post(&url).json(request), &url).await
    }

    async fn register_user(&self, request: &RegisterRequest) -> Result<RegisterResponse> {
        let url = self.url("/users/register");
        send_json(self.http.post(&url).json(request), &url).await
    }

    async fn login_user(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let url = self.url("/users/login");
        send_json(self.http.post(&url).json(request), &url).await
    }
}
