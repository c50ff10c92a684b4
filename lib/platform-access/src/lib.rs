//! Identity and session access for the Vibe Flow site.
//!
//! This crate provides:
//! - The `Identity` of a signed-in account and its `RoleSet`
//! - `SessionState`, the three-way answer to "who is using the site?"
//! - `IdentitySource`, the process-wide observable cell that delivers
//!   session reports to every mounted route guard
//! - Configuration for the hosted identity backend
//!
//! # Access Model
//!
//! Any account the hosted backend vouches for is signed in. Accounts whose
//! backend role matches the configured admin role additionally get access
//! to the management pages. This is a client-side gate only; the backend
//! must enforce its own row-level rules.
//!
//! # Example
//!
//! ```
//! use vibe_flow_core::UserId;
//! use vibe_flow_platform_access::{Identity, IdentitySource, RoleSet, SessionState};
//!
//! let source = IdentitySource::init();
//! assert_eq!(source.current(), Ok(SessionState::Pending));
//!
//! let identity = Identity::new(UserId::new("user-1"), RoleSet::admin())
//!     .with_email(Some("owner@vibeflow.studio".to_string()));
//! source.resolve(Some(identity));
//!
//! assert!(source.current().expect("resolved").is_authenticated());
//! ```

pub mod error;
pub mod hosted;
pub mod identity;
pub mod role;
pub mod session;
pub mod source;

// Re-export main types at crate root
pub use error::{AuthenticationError, SessionCheckFailed};
pub use hosted::{HostedAuthConfig, HostedAuthConfigBuilder};
pub use identity::Identity;
pub use role::{Role, RoleSet};
pub use session::{SessionKind, SessionReport, SessionState, report_kind};
pub use source::{IdentitySource, SessionSubscription};
