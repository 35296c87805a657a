//! Chat list: loading the user's chats and opening one-to-one chats.

use std::sync::Arc;

use tracing::{error, info};

use super::api::ChatApi;
use super::state::SessionState;
use crate::entities::Chat;
use crate::types::ChatResult;

/// Service for the chat list sidebar
#[derive(Clone)]
pub struct ChatListService {
    api: Arc<dyn ChatApi>,
}

impl ChatListService {
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self { api }
    }

    /// Reload the chat list from the backend
    pub async fn refresh<'a>(&self, state: &'a mut SessionState) -> ChatResult<&'a [Chat]> {
        match self.api.fetch_chats(state.token()).await {
            Ok(chats) => {
                info!(count = chats.len(), "loaded chats");
                state.set_chats(chats);
                Ok(state.chats())
            }
            Err(err) => {
                error!(error = %err, "failed to load chats");
                state
                    .notices()
                    .error("Error Occurred!", "Failed to Load the Chats");
                Err(err)
            }
        }
    }

    /// Open (or create) the one-to-one chat with `user_id` and select it
    pub async fn access_chat(&self, state: &mut SessionState, user_id: &str) -> ChatResult<Chat> {
        match self.api.access_chat(state.token(), user_id).await {
            Ok(chat) => {
                if state.prepend_if_missing(chat.clone()) {
                    info!(chat_id = %chat.id, "added chat to list");
                }
                state.select(Some(chat.clone()));
                Ok(chat)
            }
            Err(err) => {
                error!(user_id = %user_id, error = %err, "failed to access chat");
                state
                    .notices()
                    .error("Error fetching the chat", err.user_message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::MockChatApi;
    use crate::services::notices::{NoticeBoard, NoticeLevel};
    use crate::types::ChatError;
    use chatzen_users::{AuthSession, User};

    fn ada() -> User {
        User::new("u1", "Ada")
    }

    fn state() -> SessionState {
        let auth = AuthSession::new(ada().with_token("token-1")).unwrap();
        SessionState::new(auth, NoticeBoard::default())
    }

    #[tokio::test]
    async fn refresh_replaces_chat_list() {
        let mut api = MockChatApi::new();
        api.expect_fetch_chats().times(1).returning(|token| {
            assert_eq!(token, "token-1");
            Ok(vec![Chat::direct("c1", ada(), User::new("u2", "Grace"))])
        });
        let service = ChatListService::new(Arc::new(api));
        let mut state = state();

        let chats = service.refresh(&mut state).await.unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].title("u1"), "Grace");
    }

    #[tokio::test]
    async fn refresh_failure_raises_notice() {
        let mut api = MockChatApi::new();
        api.expect_fetch_chats()
            .returning(|_| Err(ChatError::status(500, "boom")));
        let service = ChatListService::new(Arc::new(api));
        let mut state = state();

        assert!(service.refresh(&mut state).await.is_err());
        let notices = state.notices().drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].description.as_deref(), Some("Failed to Load the Chats"));
    }

    #[tokio::test]
    async fn access_chat_prepends_once_and_selects() {
        let mut api = MockChatApi::new();
        api.expect_access_chat().times(2).returning(|_, user_id| {
            Ok(Chat::direct("c9", ada(), User::new(user_id, "Grace")))
        });
        let service = ChatListService::new(Arc::new(api));
        let mut state = state();
        state.set_chats(vec![Chat::direct("c1", ada(), User::new("u3", "Linus"))]);

        service.access_chat(&mut state, "u2").await.unwrap();
        service.access_chat(&mut state, "u2").await.unwrap();

        let ids: Vec<&str> = state.chats().iter().map(|chat| chat.id.as_str()).collect();
        assert_eq!(ids, vec!["c9", "c1"]);
        assert_eq!(state.selected().unwrap().id, "c9");
    }
}
