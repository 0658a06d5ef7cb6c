//! Wire types exchanged with the poll server.
//!
//! Field names follow the server's JSON exactly. The client never computes
//! tallies; counts and percentages are displayed as received.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// URL-safe token alphabet used by the server when it mints poll links.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("link pattern is valid"));

/// Shareable slug identifying a poll.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PollLink(String);

impl PollLink {
    /// Parse a bare poll link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLink`] if the link is empty, too long, or
    /// contains characters that cannot appear in a URL path segment.
    pub fn parse(link: &str) -> Result<Self> {
        if LINK_PATTERN.is_match(link) {
            Ok(Self(link.to_string()))
        } else {
            Err(Error::InvalidLink {
                link: link.to_string(),
            })
        }
    }

    /// The link as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PollLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PollLink {
    type Error = Error;

    fn try_from(link: String) -> Result<Self> {
        Self::parse(&link)
    }
}

impl From<PollLink> for String {
    fn from(link: PollLink) -> Self {
        link.0
    }
}

impl std::str::FromStr for PollLink {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// One choice of a poll, as returned by the poll detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// Server-assigned option id.
    pub option_id: i64,
    /// Display text of the option.
    pub option_text: String,
    /// Votes cast for this option so far.
    #[serde(default)]
    pub vote_count: i64,
}

/// A poll with its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    /// Server-assigned poll id, used when voting.
    pub poll_id: i64,
    /// The poll question.
    pub question: String,
    /// Shareable link of the poll.
    pub poll_link: PollLink,
    /// Creation time as reported by the server.
    #[serde(default)]
    pub created_at: Option<String>,
    /// The poll's choices in server order.
    #[serde(default)]
    pub options: Vec<PollOption>,
}

impl Poll {
    /// Look up an option by id.
    #[must_use]
    pub fn option(&self, option_id: i64) -> Option<&PollOption> {
        self.options.iter().find(|o| o.option_id == option_id)
    }

    /// Resolve a 1-based choice number to an option id.
    #[must_use]
    pub fn option_id_for_choice(&self, choice: usize) -> Option<i64> {
        choice
            .checked_sub(1)
            .and_then(|index| self.options.get(index))
            .map(|o| o.option_id)
    }
}

/// One option of a poll's tallied results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultOption {
    /// Server-assigned option id.
    pub option_id: i64,
    /// Display text of the option.
    pub option_text: String,
    /// Votes cast for this option.
    #[serde(default)]
    pub vote_count: i64,
    /// Share of all votes, as computed by the server.
    #[serde(default)]
    pub percentage: f64,
}

/// Tallied results of a poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResults {
    /// Server-assigned poll id.
    pub poll_id: i64,
    /// The poll question.
    pub question: String,
    /// Shareable link of the poll.
    pub poll_link: PollLink,
    /// Creation time as reported by the server.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Total votes across all options.
    #[serde(default)]
    pub total_votes: i64,
    /// Per-option results in server order.
    #[serde(default)]
    pub options: Vec<ResultOption>,
}

impl PollResults {
    /// The highest vote count of any option, or 0 when there are no options.
    #[must_use]
    pub fn max_vote_count(&self) -> i64 {
        self.options.iter().map(|o| o.vote_count).max().unwrap_or(0)
    }
}

/// Envelope used by the poll detail and results endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PollEnvelope<T> {
    pub(crate) poll: T,
}

/// Body of a poll creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePollRequest {
    /// The trimmed poll question.
    pub question: String,
    /// Non-empty, trimmed option texts.
    pub options: Vec<String>,
    /// Creating user, if any. Serialized as `null` for anonymous polls.
    pub creator_id: Option<i64>,
}

/// Response to a poll creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePollResponse {
    /// Human-readable status from the server.
    #[serde(default)]
    pub message: Option<String>,
    /// Id of the new poll.
    pub poll_id: i64,
    /// Shareable link of the new poll.
    pub poll_link: PollLink,
}

/// Body of a vote submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    /// Poll being voted on.
    pub poll_id: i64,
    /// Chosen option.
    pub option_id: i64,
    /// Voting user, if any. Serialized as `null` for anonymous votes.
    pub voter_id: Option<i64>,
}

/// Response to a vote submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    /// Human-readable status from the server.
    #[serde(default)]
    pub message: Option<String>,
    /// Id of the recorded vote.
    #[serde(default)]
    pub vote_id: Option<i64>,
}

/// Body of a user registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Plain-text password, sent over the configured transport.
    pub password: String,
}

/// Response to a registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Human-readable status from the server.
    #[serde(default)]
    pub message: Option<String>,
    /// Id of the new user.
    pub user_id: i64,
}

/// Body of a login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned user id.
    pub user_id: i64,
    /// Display name.
    pub username: String,
    /// Login email.
    pub email: String,
}

/// Response to a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Human-readable status from the server.
    #[serde(default)]
    pub message: Option<String>,
    /// The logged-in user.
    pub user: User,
}

/// Body of a legacy single-question poll creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCreateRequest {
    /// The trimmed poll question.
    #[serde(rename = "pollQuestion")]
    pub poll_question: String,
}

/// Response of the legacy creation endpoint, for success and failure alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCreateResponse {
    /// `"success"` or `"error"`.
    #[serde(default)]
    pub status: Option<String>,
    /// Id of the created poll.
    #[serde(default, rename = "pollid")]
    pub poll_id: Option<i64>,
    /// Echo of the stored question.
    #[serde(default, rename = "pollQuestion")]
    pub poll_question: Option<String>,
    /// Error description on failure.
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_link_accepts_url_safe_tokens() {
        assert!(PollLink::parse("aB3_x-9Qz").is_ok());
        assert!(PollLink::parse("a").is_ok());
    }

    #[test]
    fn test_poll_link_rejects_unsafe_input() {
        assert!(PollLink::parse("").is_err());
        assert!(PollLink::parse("../admin").is_err());
        assert!(PollLink::parse("has space").is_err());
        assert!(PollLink::parse("a/b").is_err());
        assert!(PollLink::parse(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_poll_link_display_and_from_str() {
        let link: PollLink = "abc123".parse().unwrap();
        assert_eq!(link.to_string(), "abc123");
        assert_eq!(link.as_str(), "abc123");
    }

    #[test]
    fn test_poll_link_serde_validates() {
        let link: PollLink = serde_json::from_str(r#""abc123""#).unwrap();
        assert_eq!(serde_json::to_string(&link).unwrap(), r#""abc123""#);
        assert!(serde_json::from_str::<PollLink>(r#""../etc""#).is_err());
    }

    #[test]
    fn test_poll_envelope_deserialize() {
        let json = r#"{
            "poll": {
                "poll_id": 7,
                "question": "Tabs or spaces?",
                "poll_link": "Xy12_ab",
                "created_at": "2024-05-01 10:00:00",
                "options": [
                    {"option_id": 1, "option_text": "Tabs", "vote_count": 2},
                    {"option_id": 2, "option_text": "Spaces", "vote_count": 0}
                ]
            }
        }"#;
        let envelope: PollEnvelope<Poll> = serde_json::from_str(json).unwrap();
        let poll = envelope.poll;
        assert_eq!(poll.poll_id, 7);
        assert_eq!(poll.poll_link.as_str(), "Xy12_ab");
        assert_eq!(poll.options.len(), 2);
        assert_eq!(poll.option(2).unwrap().option_text, "Spaces");
        assert!(poll.option(3).is_none());
    }

    #[test]
    fn test_option_id_for_choice() {
        let poll = Poll {
            poll_id: 1,
            question: "Q?".to_string(),
            poll_link: PollLink::parse("abc").unwrap(),
            created_at: None,
            options: vec![
                PollOption {
                    option_id: 10,
                    option_text: "A".to_string(),
                    vote_count: 0,
                },
                PollOption {
                    option_id: 11,
                    option_text: "B".to_string(),
                    vote_count: 0,
                },
            ],
        };
        assert_eq!(poll.option_id_for_choice(1), Some(10));
        assert_eq!(poll.option_id_for_choice(2), Some(11));
        assert_eq!(poll.option_id_for_choice(0), None);
        assert_eq!(poll.option_id_for_choice(3), None);
    }

    #[test]
    fn test_results_defaults_and_max() {
        let json = r#"{
            "poll_id": 3,
            "question": "Lunch?",
            "poll_link": "lunch",
            "options": [
                {"option_id": 1, "option_text": "Pizza", "vote_count": 3, "percentage": 75.0},
                {"option_id": 2, "option_text": "Salad", "vote_count": 1}
            ]
        }"#;
        let results: PollResults = serde_json::from_str(json).unwrap();
        assert_eq!(results.total_votes, 0);
        assert_eq!(results.max_vote_count(), 3);
        assert!(results.options[1].percentage.abs() < f64::EPSILON);
    }

    #[test]
    fn test_anonymous_requests_serialize_null_ids() {
        let request = CreatePollRequest {
            question: "Q?".to_string(),
            options: vec!["A".to_string(), "B".to_string()],
            creator_id: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value["creator_id"].is_null());

        let vote = VoteRequest {
            poll_id: 1,
            option_id: 2,
            voter_id: None,
        };
        let value = serde_json::to_value(&vote).unwrap();
        assert!(value["voter_id"].is_null());
    }

    #[test]
    fn test_legacy_field_names() {
        let request = LegacyCreateRequest {
            poll_question: "Best editor?".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"pollQuestion":"Best editor?"}"#);

        let response: LegacyCreateResponse = serde_json::from_str(
            r#"{"status":"success","pollid":12,"pollQuestion":"Best editor?"}"#,
        )
        .unwrap();
        assert_eq!(response.poll_id, Some(12));
        assert!(response.message.is_none());
    }
}
