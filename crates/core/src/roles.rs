//! Well-known role names and the rules for changing them.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users_table.sql`.

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_USER: &str = "USER";
pub const ROLE_MODERATOR: &str = "MODERATOR";
pub const ROLE_ADMIN: &str = "ADMIN";

/// Every assignable role.
pub const ALL_ROLES: &[&str] = &[ROLE_USER, ROLE_MODERATOR, ROLE_ADMIN];

/// Roles allowed to inspect other learners' progress.
pub const STAFF_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MODERATOR];

/// Whether `role` is one of `allowed`.
pub fn role_allowed(role: &str, allowed: &[&str]) -> bool {
    allowed.contains(&role)
}

/// Check that an admin may give `target_id` the role `new_role`.
///
/// The role must be one of [`ALL_ROLES`], and an admin cannot take the
/// `ADMIN` role away from themselves.
pub fn check_role_change(
    actor_id: DbId,
    target_id: DbId,
    new_role: &str,
) -> Result<(), CoreError> {
    if !role_allowed(new_role, ALL_ROLES) {
        return Err(CoreError::Validation("Invalid role".into()));
    }
    if actor_id == target_id && new_role != ROLE_ADMIN {
        return Err(CoreError::Validation("You can't change your own admin role".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn staff_roles_exclude_plain_users() {
        assert!(role_allowed(ROLE_ADMIN, STAFF_ROLES));
        assert!(role_allowed(ROLE_MODERATOR, STAFF_ROLES));
        assert!(!role_allowed(ROLE_USER, STAFF_ROLES));
    }

    #[test]
    fn role_names_are_case_sensitive() {
        assert!(!role_allowed("admin", STAFF_ROLES));
    }

    #[test]
    fn role_change_accepts_known_roles() {
        for role in ALL_ROLES {
            assert!(check_role_change(1, 2, role).is_ok(), "{role}");
        }
        assert!(check_role_change(1, 1, ROLE_ADMIN).is_ok());
    }

    #[test]
    fn role_change_rejects_unknown_roles() {
        assert_matches!(
            check_role_change(1, 2, "OWNER"),
            Err(CoreError::Validation(msg)) if msg == "Invalid role"
        );
    }

    #[test]
    fn admin_cannot_demote_themselves() {
        assert_matches!(
            check_role_change(4, 4, ROLE_MODERATOR),
            Err(CoreError::Validation(msg)) if msg == "You can't change your own admin role"
        );
    }
}
