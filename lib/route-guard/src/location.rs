//! Locations, navigation intents and the navigation seam.
//!
//! The router owns the real location and history; this module only models
//! what the guard reads from it and what it asks it to do.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The current router location: a path plus its raw query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    path: String,
    query: String,
}

impl Location {
    /// Creates a location. A leading `?` on the query is dropped, and an
    /// empty path is treated as `/`.
    #[must_use]
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        let path = path.into();
        let query = query.into();
        Self {
            path: if path.is_empty() { "/".to_string() } else { path },
            query: query.strip_prefix('?').map(str::to_string).unwrap_or(query),
        }
    }

    /// Parses `"/path?query"` into a location.
    #[must_use]
    pub fn parse(path_and_query: &str) -> Self {
        match path_and_query.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(path_and_query, ""),
        }
    }

    /// Returns the path component.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string without the leading `?`.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns `path?query`, or just the path when there is no query.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// The path and query a visitor tried to reach when a guard denied them.
///
/// Captured once, at the moment of the redirect decision, and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationIntent(String);

impl NavigationIntent {
    /// Captures the intent from the current location.
    #[must_use]
    pub fn capture(location: &Location) -> Self {
        Self(location.path_and_query())
    }

    /// Returns the captured path and query.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NavigationIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a navigation treats the browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Push a new history entry.
    #[default]
    Push,
    /// Overwrite the current history entry, so "back" cannot return to it.
    Replace,
}

impl NavigationMode {
    /// Returns true for [`NavigationMode::Replace`].
    #[must_use]
    pub fn is_replace(self) -> bool {
        matches!(self, Self::Replace)
    }
}

/// Errors reported by the navigation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// No route matches the destination path.
    RouteNotFound { path: String },
    /// The router refused or failed to perform the navigation.
    Rejected { destination: String, reason: String },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RouteNotFound { path } => write!(f, "no route matches '{path}'"),
            Self::Rejected {
                destination,
                reason,
            } => write!(f, "navigation to '{destination}' failed: {reason}"),
        }
    }
}

impl std::error::Error for NavigationError {}

/// The navigation primitive supplied by the router.
pub trait Navigator {
    /// Navigates to `destination` (a same-origin path, optionally with query).
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be resolved or the router
    /// fails to navigate.
    fn navigate(&self, destination: &str, mode: NavigationMode) -> Result<(), NavigationError>;
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn navigate(&self, destination: &str, mode: NavigationMode) -> Result<(), NavigationError> {
        (**self).navigate(destination, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_leading_question_mark() {
        let location = Location::new("/blog", "?page=2");
        assert_eq!(location.query(), "page=2");
        assert_eq!(location.path_and_query(), "/blog?page=2");
    }

    #[test]
    fn empty_path_is_root() {
        assert_eq!(Location::new("", "").path(), "/");
    }

    #[test]
    fn parse_splits_on_first_question_mark() {
        let location = Location::parse("/auth?returnUrl=%2Fblog%3Fa%3Db");
        assert_eq!(location.path(), "/auth");
        assert_eq!(location.query(), "returnUrl=%2Fblog%3Fa%3Db");
    }

    #[test]
    fn intent_captures_path_and_query() {
        let intent = NavigationIntent::capture(&Location::new("/dashboard", "tab=chat"));
        assert_eq!(intent.as_str(), "/dashboard?tab=chat");

        let bare = NavigationIntent::capture(&Location::new("/blog", ""));
        assert_eq!(bare.to_string(), "/blog");
    }

    #[test]
    fn default_mode_is_push() {
        assert_eq!(NavigationMode::default(), NavigationMode::Push);
        assert!(NavigationMode::Replace.is_replace());
    }

    #[test]
    fn navigation_error_display() {
        let err = NavigationError::RouteNotFound {
            path: "/missing".to_string(),
        };
        assert!(err.to_string().contains("/missing"));
    }
}
