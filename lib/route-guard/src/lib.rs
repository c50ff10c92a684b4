//! Client-side route guarding and the post-login redirect protocol.
//!
//! This crate decides whether a protected view may render, sends denied
//! visitors to the login view with their original destination preserved,
//! and sends them back (safely) once they sign in:
//!
//! - [`RouteGuard`]: per-mount state machine (`Checking`, `DeniedRedirecting`,
//!   `Granted`) with at-most-one redirect per intent and a fail-closed timeout
//! - [`LoginCompletion`]: validates the carried `returnUrl` and navigates to
//!   it, or to the default destination
//! - [`ReturnUrl`] and [`login_redirect_url`]: the URL contract between them
//!
//! The guard is a UX gate. The data backend must enforce its own access rules.
//!
//! # Example
//!
//! ```
//! use vibe_flow_platform_access::SessionState;
//! use vibe_flow_route_guard::{GuardConfig, Location, Render, Requirement, RouteGuard};
//!
//! let mut guard = RouteGuard::new(GuardConfig::default(), Requirement::SignedIn);
//! let evaluation = guard.evaluate(&Ok(SessionState::Unauthenticated), &Location::new("/blog", ""));
//!
//! assert_eq!(evaluation.render, Render::Redirecting);
//! assert_eq!(evaluation.redirect(), Some("/auth?returnUrl=%2Fblog"));
//! ```

pub mod completion;
pub mod config;
pub mod error;
pub mod guard;
pub mod location;
pub mod return_url;

pub use completion::{Completion, Destination, LoginCompletion};
pub use config::GuardConfig;
pub use error::GuardError;
pub use guard::{
    DenialReason, Evaluation, GuardEffect, GuardState, Render, Requirement, RouteGuard,
    TimerTicket,
};
pub use location::{Location, NavigationError, NavigationIntent, NavigationMode, Navigator};
pub use return_url::{
    RETURN_URL_PARAM, ReturnUrl, ReturnUrlRejection, encode_component, login_redirect_url,
    query_param,
};
