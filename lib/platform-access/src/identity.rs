//! The signed-in account as seen by the site.

use serde::{Deserialize, Serialize};
use vibe_flow_core::UserId;

use crate::role::RoleSet;

/// An account the hosted identity backend has vouched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Backend-issued account ID.
    user_id: UserId,
    /// Account email address, if the backend exposes it.
    email: Option<String>,
    /// Display name from the account's user metadata.
    display_name: Option<String>,
    /// Roles derived from the account's backend metadata.
    roles: RoleSet,
}

impl Identity {
    /// Creates an identity with the given roles and no profile details.
    #[must_use]
    pub fn new(user_id: UserId, roles: RoleSet) -> Self {
        Self {
            user_id,
            email: None,
            display_name: None,
            roles,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    /// Returns the account ID.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Returns the email address, if known.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the display name, if set.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Name to show in the header: display name, then email, then a fallback.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name()
            .or_else(|| self.email())
            .unwrap_or("Account")
    }

    /// Returns the account's roles.
    #[must_use]
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Returns true if the account may use the management pages.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_prefers_display_name() {
        let identity = Identity::new(UserId::new("u1"), RoleSet::user())
            .with_email(Some("a@b.test".to_string()))
            .with_display_name(Some("Ana".to_string()));
        assert_eq!(identity.label(), "Ana");
    }

    #[test]
    fn label_falls_back_to_email_then_placeholder() {
        let with_email =
            Identity::new(UserId::new("u1"), RoleSet::user()).with_email(Some("a@b.test".into()));
        assert_eq!(with_email.label(), "a@b.test");

        let bare = Identity::new(UserId::new("u2"), RoleSet::user());
        assert_eq!(bare.label(), "Account");
    }

    #[test]
    fn admin_flag_follows_roles() {
        assert!(Identity::new(UserId::new("u1"), RoleSet::admin()).is_admin());
        assert!(!Identity::new(UserId::new("u1"), RoleSet::user()).is_admin());
    }
}
