//! Role types for site access control.
//!
//! Every account the hosted backend authenticates may use the dashboard.
//! Accounts whose backend role matches the configured admin role may also
//! use the management pages (blog manager, contact forms, analytics).

use serde::{Deserialize, Serialize};

/// Site access role derived from the hosted backend's account metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Signed-in account with dashboard access.
    User,
    /// Administrator with access to the management pages.
    Admin,
}

impl Role {
    /// Returns true if this role has admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Set of roles held by a signed-in account.
///
/// Having Admin implies having User access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    /// Creates an empty role set (no access).
    #[must_use]
    pub fn none() -> Self {
        Self { roles: Vec::new() }
    }

    /// Creates a role set with user access only.
    #[must_use]
    pub fn user() -> Self {
        Self {
            roles: vec![Role::User],
        }
    }

    /// Creates a role set with admin access (implies user access).
    #[must_use]
    pub fn admin() -> Self {
        Self {
            roles: vec![Role::User, Role::Admin],
        }
    }

    /// Derives the role set of an authenticated account from the role names
    /// the backend attaches to it.
    ///
    /// Role names are compared case-insensitively after trimming.
    #[must_use]
    pub fn from_backend_roles<S: AsRef<str>>(backend_roles: &[S], admin_role: &str) -> Self {
        let admin_role = admin_role.trim();
        let is_admin = !admin_role.is_empty()
            && backend_roles
                .iter()
                .any(|r| r.as_ref().trim().eq_ignore_ascii_case(admin_role));

        if is_admin { Self::admin() } else { Self::user() }
    }

    /// Returns true if the account has any access to the site's private pages.
    #[must_use]
    pub fn has_access(&self) -> bool {
        self.roles.contains(&Role::User)
    }

    /// Returns true if the account has admin access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Returns the roles as a slice.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_admin() {
        assert!(!Role::User.is_admin());
        assert!(Role::Admin.is_admin());
    }

    #[test]
    fn role_set_none_has_no_access() {
        let roles = RoleSet::none();
        assert!(!roles.has_access());
        assert!(!roles.is_admin());
        assert!(roles.roles().is_empty());
    }

    #[test]
    fn role_set_admin_has_both_roles() {
        let roles = RoleSet::admin();
        assert!(roles.has_access());
        assert!(roles.is_admin());
        assert!(roles.roles().contains(&Role::User));
    }

    #[test]
    fn authenticated_account_without_admin_role_is_user() {
        let roles = RoleSet::from_backend_roles(&["editor", "authenticated"], "admin");
        assert_eq!(roles, RoleSet::user());
    }

    #[test]
    fn admin_role_matches_case_insensitively() {
        let roles = RoleSet::from_backend_roles(&[" Admin "], "admin");
        assert!(roles.is_admin());
        assert_eq!(
            roles.roles().iter().filter(|r| **r == Role::User).count(),
            1
        );
    }

    #[test]
    fn blank_admin_role_never_grants_admin() {
        let roles = RoleSet::from_backend_roles(&[""], "  ");
        assert!(!roles.is_admin());
        assert!(roles.has_access());
    }

    #[test]
    fn role_serialization_format() {
        let json = serde_json::to_string(&Role::Admin).expect("serialize");
        assert_eq!(json, "\"admin\"");
    }
}
