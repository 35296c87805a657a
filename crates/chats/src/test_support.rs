//! In-process implementations of the realtime channel and the REST seam.
//!
//! Useful for embedding the controller without a backend and for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chatzen_users::User;
use chrono::Utc;

use crate::entities::{Chat, Message};
use crate::services::{ChatApi, EventHub, RealtimeChannel};
use crate::types::{
    ChatError, ChatResult, ClientEvent, GroupMemberRequest, RenameGroupRequest,
    SendMessageRequest, ServerEvent,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Channel that records emitted events and lets the caller inject inbound ones.
///
/// Clones share the same hub and record.
#[derive(Debug, Clone, Default)]
pub struct LoopbackChannel {
    hub: EventHub,
    emitted: Arc<Mutex<Vec<ClientEvent>>>,
}

impl LoopbackChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject an inbound event
    pub fn deliver(&self, event: ServerEvent) -> usize {
        self.hub.dispatch(event)
    }

    /// Everything emitted so far
    pub fn emitted(&self) -> Vec<ClientEvent> {
        lock(&self.emitted).clone()
    }

    /// Everything emitted since the last call
    pub fn take_emitted(&self) -> Vec<ClientEvent> {
        std::mem::take(&mut *lock(&self.emitted))
    }

    /// Simulate the connection going away
    pub fn close(&self) {
        self.hub.close();
    }
}

impl RealtimeChannel for LoopbackChannel {
    fn emit(&self, event: ClientEvent) {
        lock(&self.emitted).push(event);
    }

    fn hub(&self) -> &EventHub {
        &self.hub
    }
}

#[derive(Debug, Default)]
struct Backend {
    chats: Vec<Chat>,
    users: Vec<User>,
    history: HashMap<String, Vec<Message>>,
    next_message: u64,
    fail_sends: bool,
}

/// REST seam backed by in-memory data, acting as the user `me`
#[derive(Debug, Clone)]
pub struct InMemoryApi {
    me: User,
    backend: Arc<Mutex<Backend>>,
}

impl InMemoryApi {
    pub fn new(me: User) -> Self {
        Self {
            me: me.public_profile(),
            backend: Arc::new(Mutex::new(Backend::default())),
        }
    }

    pub fn with_chat(self, chat: Chat) -> Self {
        lock(&self.backend).chats.push(chat);
        self
    }

    pub fn with_user(self, user: User) -> Self {
        lock(&self.backend).users.push(user);
        self
    }

    pub fn with_history(self, chat_id: &str, messages: Vec<Message>) -> Self {
        lock(&self.backend)
            .history
            .insert(chat_id.to_string(), messages);
        self
    }

    /// Make subsequent sends fail with a transport error
    pub fn fail_sends(&self, fail: bool) {
        lock(&self.backend).fail_sends = fail;
    }

    /// Messages persisted for `chat_id`
    pub fn history(&self, chat_id: &str) -> Vec<Message> {
        lock(&self.backend)
            .history
            .get(chat_id)
            .cloned()
            .unwrap_or_default()
    }

    fn update_chat(&self, chat_id: &str, update: impl FnOnce(&mut Chat)) -> ChatResult<Chat> {
        let mut backend = lock(&self.backend);
        let chat = backend
            .chats
            .iter_mut()
            .find(|chat| chat.id == chat_id)
            .ok_or_else(|| ChatError::status(404, "Chat Not Found"))?;
        update(chat);
        Ok(chat.clone())
    }

    fn find_user(&self, user_id: &str) -> ChatResult<User> {
        lock(&self.backend)
            .users
            .iter()
            .find(|user| user.is(user_id))
            .cloned()
            .ok_or_else(|| ChatError::status(400, "UserId param not sent with request"))
    }
}

#[async_trait]
impl ChatApi for InMemoryApi {
    async fn fetch_chats(&self, _token: &str) -> ChatResult<Vec<Chat>> {
        let backend = lock(&self.backend);
        Ok(backend
            .chats
            .iter()
            .filter(|chat| chat.has_participant(&self.me.id))
            .cloned()
            .collect())
    }

    async fn access_chat(&self, _token: &str, user_id: &str) -> ChatResult<Chat> {
        let other = self.find_user(user_id)?;
        let mut backend = lock(&self.backend);
        if let Some(chat) = backend.chats.iter().find(|chat| {
            !chat.is_group_chat && chat.has_participant(&self.me.id) && chat.has_participant(user_id)
        }) {
            return Ok(chat.clone());
        }

        let chat = Chat::direct(
            format!("c{}", backend.chats.len() + 1),
            self.me.clone(),
            other,
        );
        backend.chats.push(chat.clone());
        Ok(chat)
    }

    async fn fetch_messages(&self, _token: &str, chat_id: &str) -> ChatResult<Vec<Message>> {
        Ok(self.history(chat_id))
    }

    async fn send_message(&self, _token: &str, request: &SendMessageRequest) -> ChatResult<Message> {
        let mut backend = lock(&self.backend);
        if backend.fail_sends {
            return Err(ChatError::transport("connection reset"));
        }
        backend.next_message += 1;
        let mut message = Message::new(
            format!("m{}", backend.next_message),
            self.me.clone(),
            request.content.clone(),
            request.chat_id.clone(),
        );
        message.created_at = Some(Utc::now());
        backend
            .history
            .entry(request.chat_id.clone())
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn search_users(&self, _token: &str, query: &str) -> ChatResult<Vec<User>> {
        let query = query.to_lowercase();
        Ok(lock(&self.backend)
            .users
            .iter()
            .filter(|user| {
                !user.is(&self.me.id)
                    && (user.name.to_lowercase().contains(&query)
                        || user
                            .email
                            .as_deref()
                            .map_or(false, |email| email.to_lowercase().contains(&query)))
            })
            .cloned()
            .collect())
    }

    async fn rename_group(&self, _token: &str, request: &RenameGroupRequest) -> ChatResult<Chat> {
        self.update_chat(&request.chat_id, |chat| {
            chat.chat_name = Some(request.chat_name.clone());
        })
    }

    async fn add_to_group(&self, _token: &str, request: &GroupMemberRequest) -> ChatResult<Chat> {
        let user = self.find_user(&request.user_id)?;
        self.update_chat(&request.chat_id, |chat| chat.users.push(user))
    }

    async fn remove_from_group(
        &self,
        _token: &str,
        request: &GroupMemberRequest,
    ) -> ChatResult<Chat> {
        self.update_chat(&request.chat_id, |chat| {
            chat.users.retain(|user| !user.is(&request.user_id));
        })
    }
}
