//! User search.

use std::sync::Arc;

use chatzen_users::User;
use tracing::{debug, error};

use super::api::ChatApi;
use super::state::SessionState;
use crate::types::ChatResult;
use crate::utils::Validator;

#[derive(Clone)]
pub struct SearchService {
    api: Arc<dyn ChatApi>,
}

impl SearchService {
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self { api }
    }

    /// Search users by name or email.
    ///
    /// A blank query only raises a warning notice and returns no results.
    pub async fn search(&self, state: &SessionState, query: &str) -> ChatResult<Vec<User>> {
        if let Err(err) = Validator::search_query(query) {
            state.notices().warning(err.user_message());
            return Ok(Vec::new());
        }

        match self.api.search_users(state.token(), query.trim()).await {
            Ok(users) => {
                debug!(query = %query, results = users.len(), "user search completed");
                Ok(users)
            }
            Err(err) => {
                error!(query = %query, error = %err, "user search failed");
                state
                    .notices()
                    .error("Error Occured!", "Failed to Load the Search Results");
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
    use chatzen_users::AuthSession;

    fn state() -> SessionState {
        let auth = AuthSession::new(User::new("u1", "Ada").with_token("token-1")).unwrap();
        SessionState::new(auth, NoticeBoard::default())
    }

    #[tokio::test]
    async fn blank_query_warns_without_request() {
        let mut api = MockChatApi::new();
        api.expect_search_users().times(0);
        let service = SearchService::new(Arc::new(api));
        let state = state();

        let users = service.search(&state, "   ").await.unwrap();
        assert!(users.is_empty());

        let notices = state.notices().drain();
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(notices[0].title, "Please Enter something in search");
    }

    #[tokio::test]
    async fn forwards_trimmed_query() {
        let mut api = MockChatApi::new();
        api.expect_search_users().times(1).returning(|token, query| {
            assert_eq!(token, "token-1");
            assert_eq!(query, "grace");
            Ok(vec![User::new("u2", "Grace")])
        });
        let service = SearchService::new(Arc::new(api));

        let users = service.search(&state(), " grace ").await.unwrap();
        assert_eq!(users[0].id, "u2");
    }

    #[tokio::test]
    async fn failure_raises_error_notice() {
        let mut api = MockChatApi::new();
        api.expect_search_users()
            .returning(|_, _| Err(ChatError::transport("connection refused")));
        let service = SearchService::new(Arc::new(api));
        let state = state();

        assert!(service.search(&state, "grace").await.is_err());
        let notices = state.notices().drain();
        assert_eq!(
            notices[0].description.as_deref(),
            Some("Failed to Load the Search Results")
        );
    }
}
