//! Navigation between views and share link construction.

use crate::error::{Error, Result};
use crate::model::PollLink;

/// Where a view sends the user next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: create a new poll.
    Create,
    /// `/poll/:link`: vote on a poll.
    Vote(PollLink),
    /// `/poll/:link/results`: watch a poll's results.
    Results(PollLink),
}

impl Route {
    /// Resolve a path to a route.
    ///
    /// Unknown paths, including ones with an invalid link, resolve to
    /// [`Route::Create`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["poll", link] => PollLink::parse(link).map_or(Self::Create, Self::Vote),
            ["poll", link, "results"] => PollLink::parse(link).map_or(Self::Create, Self::Results),
            _ => Self::Create,
        }
    }

    /// The path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Create => "/".to_string(),
            Self::Vote(link) => format!("/poll/{link}"),
            Self::Results(link) => format!("/poll/{link}/results"),
        }
    }

    /// The poll this route refers to, if any.
    #[must_use]
    pub fn link(&self) -> Option<&PollLink> {
        match self {
            Self::Create => None,
            Self::Vote(link) | Self::Results(link) => Some(link),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Absolute URL of a route under the front end's origin.
#[must_use]
pub fn route_url(origin: &str, route: &Route) -> String {
    format!("{}{}", origin.trim_end_matches('/'), route.path())
}

/// Shareable URL of a poll: `{origin}/poll/{link}`.
#[must_use]
pub fn share_url(origin: &str, link: &PollLink) -> String {
    route_url(origin, &Route::Vote(link.clone()))
}

/// Accept either a bare poll link or a full share/results URL.
///
/// # Errors
///
/// Returns [`Error::InvalidLink`] if no poll link can be extracted.
pub fn link_from_arg(arg: &str) -> Result<PollLink> {
    let arg = arg.trim();
    if let Some((_, rest)) = arg.split_once("://") {
        let path = rest.find('/').map_or("/", |start| &rest[start..]);
        return Route::parse(path)
            .link()
            .cloned()
            .ok_or_else(|| Error::InvalidLink {
                link: arg.to_string(),
            });
    }
    if arg.starts_with('/') {
        return Route::parse(arg)
            .link()
            .cloned()
            .ok_or_else(|| Error::InvalidLink {
                link: arg.to_string(),
            });
    }
    PollLink::parse(arg)
}
