//! Permission checking for group administration.

use chatzen_users::User;

use crate::entities::Chat;
use crate::types::{ChatError, ChatResult};

/// Permission checking utilities
pub struct PermissionChecker;

impl PermissionChecker {
    /// Check if `acting_user_id` may rename the group
    pub fn can_rename(chat: &Chat, acting_user_id: &str) -> ChatResult<()> {
        chat.ensure_group()?;
        if !chat.has_participant(acting_user_id) {
            return Err(ChatError::permission_denied("You are not a member of this group"));
        }
        Ok(())
    }

    /// Check if `acting_user_id` may add `user` to the group
    pub fn can_add_member(chat: &Chat, acting_user_id: &str, user: &User) -> ChatResult<()> {
        chat.ensure_group()?;
        if chat.has_participant(&user.id) {
            return Err(ChatError::validation("User Already in group!"));
        }
        if !chat.is_admin(acting_user_id) {
            return Err(ChatError::permission_denied("Only admins can add someone!"));
        }
        Ok(())
    }

    /// Check if `acting_user_id` may remove `user` from the group.
    ///
    /// Admins may remove anyone; everybody else may only remove themselves.
    pub fn can_remove_member(chat: &Chat, acting_user_id: &str, user: &User) -> ChatResult<()> {
        chat.ensure_group()?;
        if !chat.is_admin(acting_user_id) && !user.is(acting_user_id) {
            return Err(ChatError::permission_denied("Only admins can remove someone!"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> User {
        User::new("u1", "Ada")
    }

    fn member() -> User {
        User::new("u2", "Grace")
    }

    fn group() -> Chat {
        Chat::group("c1", "Team", vec![admin(), member()], admin())
    }

    #[test]
    fn test_permission_checker_can_add_member() {
        let outsider = User::new("u3", "Linus");

        assert!(PermissionChecker::can_add_member(&group(), "u1", &outsider).is_ok());

        let err = PermissionChecker::can_add_member(&group(), "u2", &outsider).unwrap_err();
        assert_eq!(err.user_message(), "Only admins can add someone!");

        let err = PermissionChecker::can_add_member(&group(), "u1", &member()).unwrap_err();
        assert_eq!(err.user_message(), "User Already in group!");
    }

    #[test]
    fn test_permission_checker_can_remove_member() {
        assert!(PermissionChecker::can_remove_member(&group(), "u1", &member()).is_ok());
        assert!(PermissionChecker::can_remove_member(&group(), "u2", &member()).is_ok());

        let err = PermissionChecker::can_remove_member(&group(), "u2", &admin()).unwrap_err();
        assert_eq!(err.user_message(), "Only admins can remove someone!");
    }

    #[test]
    fn test_permission_checker_rejects_direct_chats() {
        let direct = Chat::direct("c2", admin(), member());

        assert!(PermissionChecker::can_rename(&direct, "u1").is_err());
        assert!(PermissionChecker::can_remove_member(&direct, "u1", &member()).is_err());
        assert!(PermissionChecker::can_rename(&group(), "u2").is_ok());
        assert!(PermissionChecker::can_rename(&group(), "u9").is_err());
    }
}
