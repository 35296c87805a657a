//! Group chat administration: rename, add and remove members.

use std::sync::Arc;

use chatzen_users::User;
use tracing::{error, info, warn};

use super::api::ChatApi;
use super::notices::NoticeLevel;
use super::state::SessionState;
use crate::entities::Chat;
use crate::types::{ChatError, ChatResult, GroupMemberRequest, RenameGroupRequest};
use crate::utils::{PermissionChecker, Validator};

#[derive(Clone)]
pub struct GroupService {
    api: Arc<dyn ChatApi>,
}

impl GroupService {
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self { api }
    }

    fn lookup(state: &SessionState, chat_id: &str) -> ChatResult<Chat> {
        state
            .selected()
            .filter(|chat| chat.id == chat_id)
            .or_else(|| state.chat(chat_id))
            .cloned()
            .ok_or_else(|| ChatError::chat_not_found(chat_id))
    }

    fn refuse(state: &SessionState, err: ChatError) -> ChatError {
        warn!(error = %err, "group operation refused");
        state
            .notices()
            .push(NoticeLevel::Error, err.user_message(), None);
        err
    }

    fn failed(state: &SessionState, err: ChatError) -> ChatError {
        error!(error = %err, "group operation failed");
        state.notices().error("Error Occurred!", err.user_message());
        err
    }

    /// Rename a group chat
    pub async fn rename(
        &self,
        state: &mut SessionState,
        chat_id: &str,
        name: &str,
    ) -> ChatResult<Chat> {
        let chat = Self::lookup(state, chat_id).map_err(|err| Self::refuse(state, err))?;
        PermissionChecker::can_rename(&chat, &state.user().id)
            .and_then(|()| Validator::group_name(name))
            .map_err(|err| Self::refuse(state, err))?;

        let request = RenameGroupRequest {
            chat_id: chat.id.clone(),
            chat_name: name.trim().to_string(),
        };
        let updated = self
            .api
            .rename_group(state.token(), &request)
            .await
            .map_err(|err| Self::failed(state, err))?;

        info!(chat_id = %updated.id, name = %request.chat_name, "group renamed");
        state.replace_chat(updated.clone());
        Ok(updated)
    }

    /// Add `user` to a group; only the admin may do this
    pub async fn add_member(
        &self,
        state: &mut SessionState,
        chat_id: &str,
        user: &User,
    ) -> ChatResult<Chat> {
        let chat = Self::lookup(state, chat_id).map_err(|err| Self::refuse(state, err))?;
        PermissionChecker::can_add_member(&chat, &state.user().id, user)
            .map_err(|err| Self::refuse(state, err))?;

        let request = GroupMemberRequest {
            chat_id: chat.id.clone(),
            user_id: user.id.clone(),
        };
        let updated = self
            .api
            .add_to_group(state.token(), &request)
            .await
            .map_err(|err| Self::failed(state, err))?;

        info!(chat_id = %updated.id, user_id = %user.id, "member added");
        state.replace_chat(updated.clone());
        Ok(updated)
    }

    /// Remove `user` from a group.
    ///
    /// Removing yourself leaves the group: the chat is deselected and dropped
    /// from the list.
    pub async fn remove_member(
        &self,
        state: &mut SessionState,
        chat_id: &str,
        user: &User,
    ) -> ChatResult<Chat> {
        let chat = Self::lookup(state, chat_id).map_err(|err| Self::refuse(state, err))?;
        let acting_user_id = state.user().id.clone();
        PermissionChecker::can_remove_member(&chat, &acting_user_id, user)
            .map_err(|err| Self::refuse(state, err))?;

        let request = GroupMemberRequest {
            chat_id: chat.id.clone(),
            user_id: user.id.clone(),
        };
        let updated = self
            .api
            .remove_from_group(state.token(), &request)
            .await
            .map_err(|err| Self::failed(state, err))?;

        if user.is(&acting_user_id) {
            info!(chat_id = %chat.id, "left group");
            state.remove_chat(&chat.id);
        } else {
            info!(chat_id = %updated.id, user_id = %user.id, "member removed");
            state.replace_chat(updated.clone());
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::MockChatApi;
    use crate::services::notices::NoticeBoard;
    use chatzen_users::AuthSession;

    fn ada() -> User {
        User::new("u1", "Ada")
    }

    fn grace() -> User {
        User::new("u2", "Grace")
    }

    fn linus() -> User {
        User::new("u3", "Linus")
    }

    fn team() -> Chat {
        Chat::group("g1", "Team", vec![ada(), grace()], ada())
    }

    fn state_for(user: User) -> SessionState {
        let auth = AuthSession::new(user.with_token("token-1")).unwrap();
        let mut state = SessionState::new(auth, NoticeBoard::default());
        state.set_chats(vec![team()]);
        state.select(Some(team()));
        state
    }

    #[tokio::test]
    async fn admin_adds_member() {
        let mut api = MockChatApi::new();
        api.expect_add_to_group().times(1).returning(|_, request| {
            assert_eq!(request.chat_id, "g1");
            assert_eq!(request.user_id, "u3");
            Ok(Chat::group("g1", "Team", vec![ada(), grace(), linus()], ada()))
        });
        let service = GroupService::new(Arc::new(api));
        let mut state = state_for(ada());

        service.add_member(&mut state, "g1", &linus()).await.unwrap();
        assert_eq!(state.selected().unwrap().users.len(), 3);
        assert_eq!(state.chats()[0].users.len(), 3);
    }

    #[tokio::test]
    async fn add_refusals_raise_notices_without_request() {
        let mut api = MockChatApi::new();
        api.expect_add_to_group().times(0);
        let service = GroupService::new(Arc::new(api));

        let mut state = state_for(ada());
        assert!(service.add_member(&mut state, "g1", &grace()).await.is_err());
        assert_eq!(state.notices().drain()[0].title, "User Already in group!");

        let mut state = state_for(grace());
        assert!(service.add_member(&mut state, "g1", &linus()).await.is_err());
        assert_eq!(state.notices().drain()[0].title, "Only admins can add someone!");
    }

    #[tokio::test]
    async fn non_admin_cannot_remove_others() {
        let mut api = MockChatApi::new();
        api.expect_remove_from_group().times(0);
        let service = GroupService::new(Arc::new(api));
        let mut state = state_for(grace());

        assert!(service.remove_member(&mut state, "g1", &ada()).await.is_err());
        assert_eq!(state.notices().drain()[0].title, "Only admins can remove someone!");
    }

    #[tokio::test]
    async fn leaving_group_clears_selection() {
        let mut api = MockChatApi::new();
        api.expect_remove_from_group()
            .times(1)
            .returning(|_, _| Ok(Chat::group("g1", "Team", vec![ada()], ada())));
        let service = GroupService::new(Arc::new(api));
        let mut state = state_for(grace());

        service.remove_member(&mut state, "g1", &grace()).await.unwrap();
        assert!(state.selected().is_none());
        assert!(state.chats().is_empty());
    }

    #[tokio::test]
    async fn rename_rejects_blank_and_direct_chats() {
        let mut api = MockChatApi::new();
        api.expect_rename_group().times(0);
        let service = GroupService::new(Arc::new(api));
        let mut state = state_for(ada());

        assert!(service.rename(&mut state, "g1", "  ").await.is_err());

        state.set_chats(vec![Chat::direct("c1", ada(), grace())]);
        assert!(service.rename(&mut state, "c1", "Pair").await.is_err());
        assert!(service.rename(&mut state, "missing", "Pair").await.is_err());
    }

    #[tokio::test]
    async fn rename_updates_selection_and_list() {
        let mut api = MockChatApi::new();
        api.expect_rename_group().times(1).returning(|_, request| {
            assert_eq!(request.chat_name, "Crew");
            let mut chat = team();
            chat.chat_name = Some(request.chat_name.clone());
            Ok(chat)
        });
        let service = GroupService::new(Arc::new(api));
        let mut state = state_for(ada());

        service.rename(&mut state, "g1", " Crew ").await.unwrap();
        assert_eq!(state.selected().unwrap().title("u1"), "Crew");
        assert_eq!(state.chats()[0].title("u1"), "Crew");
    }

    #[tokio::test]
    async fn backend_failure_raises_error_notice() {
        let mut api = MockChatApi::new();
        api.expect_add_to_group()
            .returning(|_, _| Err(ChatError::status(400, "User not found")));
        let service = GroupService::new(Arc::new(api));
        let mut state = state_for(ada());

        assert!(service.add_member(&mut state, "g1", &linus()).await.is_err());
        let notice = &state.notices().drain()[0];
        assert_eq!(notice.title, "Error Occurred!");
        assert_eq!(notice.description.as_deref(), Some("User not found"));
    }
}
