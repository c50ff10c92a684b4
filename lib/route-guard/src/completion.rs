//! Post-login redirect.
//!
//! After a successful sign-in the login view hands its query string to
//! [`LoginCompletion`], which sends the visitor back where they were headed
//! if the carried return URL is a same-origin path, and to the default
//! destination otherwise. A failed navigation to the return URL also falls
//! back to the default, so nobody is left on the login view.

use tracing::{debug, warn};
use vibe_flow_core::Result;

use crate::config::GuardConfig;
use crate::error::GuardError;
use crate::location::{NavigationMode, Navigator};
use crate::return_url::{ReturnUrl, ReturnUrlRejection};

/// Where the completion handler decided to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// The validated return URL.
    Return(ReturnUrl),
    /// The default destination, with the reason the return URL was unusable.
    Default {
        path: String,
        reason: ReturnUrlRejection,
    },
}

impl Destination {
    /// Returns the path to navigate to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Return(url) => url.as_str(),
            Self::Default { path, .. } => path,
        }
    }
}

/// Result of a completed post-login navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Where the visitor was sent.
    pub navigated_to: String,
    /// True when navigation to the return URL failed and the default was used.
    pub fell_back: bool,
}

/// Computes and performs the post-login navigation.
#[derive(Debug, Clone)]
pub struct LoginCompletion {
    default_destination: String,
}

impl LoginCompletion {
    /// Creates a handler that falls back to `default_destination`.
    #[must_use]
    pub fn new(default_destination: impl Into<String>) -> Self {
        Self {
            default_destination: default_destination.into(),
        }
    }

    /// Creates a handler using the configured default destination.
    #[must_use]
    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(config.default_destination.clone())
    }

    /// Returns the fallback destination.
    #[must_use]
    pub fn default_destination(&self) -> &str {
        &self.default_destination
    }

    /// Decides the destination for the given login-view query string.
    ///
    /// The query must be read at the moment sign-in succeeds.
    #[must_use]
    pub fn destination(&self, query: &str) -> Destination {
        match ReturnUrl::from_query(query) {
            Ok(url) => Destination::Return(url),
            Err(reason) => {
                if reason != ReturnUrlRejection::Missing {
                    debug!(%reason, "ignoring return url");
                }
                Destination::Default {
                    path: self.default_destination.clone(),
                    reason,
                }
            }
        }
    }

    /// Navigates to the post-login destination.
    ///
    /// # Errors
    ///
    /// Returns an error only if navigation to the default destination itself
    /// fails.
    pub fn complete<N: Navigator>(
        &self,
        query: &str,
        navigator: &N,
    ) -> Result<Completion, GuardError> {
        let destination = self.destination(query);

        match navigator.navigate(destination.path(), NavigationMode::Push) {
            Ok(()) => {
                return Ok(Completion {
                    navigated_to: destination.path().to_string(),
                    fell_back: false,
                });
            }
            Err(error) if matches!(destination, Destination::Return(_)) => {
                warn!(
                    destination = destination.path(),
                    error = %error,
                    "return url navigation failed, using default destination"
                );
            }
            Err(error) => {
                return Err(GuardError::RedirectNavigationFailed {
                    destination: destination.path().to_string(),
                    source: error,
                }
                .into());
            }
        }

        navigator
            .navigate(&self.default_destination, NavigationMode::Push)
            .map_err(|error| GuardError::RedirectNavigationFailed {
                destination: self.default_destination.clone(),
                source: error,
            })?;

        Ok(Completion {
            navigated_to: self.default_destination.clone(),
            fell_back: true,
        })
    }
}
