//! Shared types used across server functions and UI components.

use serde::{Deserialize, Serialize};
use vibe_flow_platform_access::Identity;

/// Outcome of a sign-up request as seen by the browser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignUpResult {
    /// The account was created and is now signed in.
    SignedIn(Identity),
    /// A confirmation email was sent; the account cannot sign in yet.
    ConfirmationRequired,
}
