//! Per-user session state shared by the chat services.

use chatzen_users::{AuthSession, User};

use super::notices::NoticeBoard;
use crate::entities::Chat;

/// Everything the client knows about the logged-in user's chats.
///
/// Passed explicitly to the services instead of living in a global.
#[derive(Debug, Clone)]
pub struct SessionState {
    auth: AuthSession,
    chats: Vec<Chat>,
    selected: Option<Chat>,
    notices: NoticeBoard,
}

impl SessionState {
    pub fn new(auth: AuthSession, notices: NoticeBoard) -> Self {
        Self {
            auth,
            chats: Vec::new(),
            selected: None,
            notices,
        }
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn user(&self) -> &User {
        self.auth.user()
    }

    pub fn token(&self) -> &str {
        self.auth.token()
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn chat(&self, chat_id: &str) -> Option<&Chat> {
        self.chats.iter().find(|chat| chat.id == chat_id)
    }

    pub fn set_chats(&mut self, chats: Vec<Chat>) {
        self.chats = chats;
    }

    pub fn selected(&self) -> Option<&Chat> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, chat: Option<Chat>) {
        self.selected = chat;
    }

    /// Put `chat` at the front of the list unless it is already listed
    pub fn prepend_if_missing(&mut self, chat: Chat) -> bool {
        if self.chat(&chat.id).is_some() {
            return false;
        }
        self.chats.insert(0, chat);
        true
    }

    /// Replace the list entry and the selection carrying the same id
    pub fn replace_chat(&mut self, chat: Chat) {
        if let Some(entry) = self.chats.iter_mut().find(|entry| entry.id == chat.id) {
            *entry = chat.clone();
        }
        if self.selected.as_ref().map_or(false, |selected| selected.id == chat.id) {
            self.selected = Some(chat);
        }
    }

    /// Drop a chat from the list, clearing the selection if it pointed there
    pub fn remove_chat(&mut self, chat_id: &str) {
        self.chats.retain(|chat| chat.id != chat_id);
        if self.selected.as_ref().map_or(false, |selected| selected.id == chat_id) {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SessionState {
        let auth = AuthSession::new(User::new("u1", "Ada").with_token("token")).unwrap();
        SessionState::new(auth, NoticeBoard::default())
    }

    #[test]
    fn prepend_skips_known_chats() {
        let mut state = state();
        let ada = User::new("u1", "Ada");
        state.set_chats(vec![Chat::direct("c1", ada.clone(), User::new("u2", "Grace"))]);

        assert!(!state.prepend_if_missing(Chat::direct("c1", ada.clone(), User::new("u2", "Grace"))));
        assert!(state.prepend_if_missing(Chat::direct("c2", ada, User::new("u3", "Linus"))));
        assert_eq!(state.chats()[0].id, "c2");
    }

    #[test]
    fn replace_and_remove_keep_selection_consistent() {
        let mut state = state();
        let ada = User::new("u1", "Ada");
        let group = Chat::group("g1", "Team", vec![ada.clone(), User::new("u2", "Grace")], ada);
        state.set_chats(vec![group.clone()]);
        state.select(Some(group.clone()));

        let mut renamed = group;
        renamed.chat_name = Some("Crew".into());
        state.replace_chat(renamed);
        assert_eq!(state.selected().unwrap().chat_name.as_deref(), Some("Crew"));
        assert_eq!(state.chats()[0].chat_name.as_deref(), Some("Crew"));

        state.remove_chat("g1");
        assert!(state.selected().is_none());
        assert!(state.chats().is_empty());
    }
}
