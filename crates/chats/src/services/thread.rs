//! Message thread controller for the selected chat.
//!
//! The controller is a plain state machine driven by its owner:
//!
//! - [`ThreadController::select_chat`] switches chats and returns a
//!   [`HistoryTicket`] for the history fetch.
//! - [`ThreadController::apply_history`] applies the fetched history, joins
//!   the chat's room and subscribes to its events. Results for a chat that
//!   is no longer selected are discarded.
//! - [`ThreadController::prepare_send`] and [`ThreadController::apply_sent`]
//!   bracket the REST call that persists an outgoing message.
//! - [`ThreadController::handle_event`] applies inbound realtime events.
//!
//! Splitting REST calls into two phases lets an embedding event loop keep
//! processing socket events while a request is in flight. [`open_chat`] and
//! [`send`] run both phases back to back.
//!
//! [`open_chat`]: ThreadController::open_chat
//! [`send`]: ThreadController::send

use std::collections::HashSet;
use std::time::Duration;

use chatzen_users::User;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::api::ChatApi;
use super::notices::NoticeBoard;
use super::realtime::{EventFilter, RealtimeChannel, Subscription};
use super::typing::{TypingIndicator, TypingSignal};
use crate::entities::{Chat, Message};
use crate::types::{
    ChatError, ChatId, ChatResult, ClientEvent, EventKind, MessageId, SendMessageRequest,
    ServerEvent,
};

/// Placeholder shown while no chat is selected
pub const IDLE_PLACEHOLDER: &str = "Click on a user to start chatting";

/// Where the thread is in its lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadPhase {
    /// No chat selected
    Idle,
    /// History fetch in flight, or failed with `error`
    Loading { chat: Chat, error: Option<String> },
    /// History shown and room joined
    Ready { chat: Chat },
}

impl ThreadPhase {
    pub fn chat(&self) -> Option<&Chat> {
        match self {
            ThreadPhase::Idle => None,
            ThreadPhase::Loading { chat, .. } | ThreadPhase::Ready { chat } => Some(chat),
        }
    }
}

/// Identifies one history fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    generation: u64,
    chat_id: ChatId,
}

impl HistoryTicket {
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

/// A message that left the input box and awaits persistence
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub request: SendMessageRequest,
}

/// What changed after an inbound event, for the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadUpdate {
    Connected,
    RemoteTyping(bool),
    Appended(Message),
}

pub struct ThreadController<C> {
    channel: C,
    user: User,
    notices: NoticeBoard,
    typing: TypingIndicator,
    phase: ThreadPhase,
    messages: Vec<Message>,
    seen: HashSet<MessageId>,
    input: String,
    generation: u64,
    lifecycle: Subscription,
    room: Option<Subscription>,
}

impl<C: RealtimeChannel> ThreadController<C> {
    /// Mount the controller on a connected channel for `user`
    pub fn new(channel: C, user: User, notices: NoticeBoard, quiet_window: Duration) -> Self {
        let lifecycle = channel.subscribe(EventFilter::kinds([EventKind::Connected]));
        let mut typing = TypingIndicator::new(quiet_window);
        typing.set_connected(channel.is_connected());

        Self {
            channel,
            user,
            notices,
            typing,
            phase: ThreadPhase::Idle,
            messages: Vec::new(),
            seen: HashSet::new(),
            input: String::new(),
            generation: 0,
            lifecycle,
            room: None,
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Unmount, handing the channel back
    pub fn into_channel(self) -> C {
        self.channel
    }

    pub fn phase(&self) -> &ThreadPhase {
        &self.phase
    }

    pub fn selected_chat(&self) -> Option<&Chat> {
        self.phase.chat()
    }

    fn ready_chat(&self) -> Option<&Chat> {
        match &self.phase {
            ThreadPhase::Ready { chat } => Some(chat),
            _ => None,
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        matches!(self.phase, ThreadPhase::Idle).then_some(IDLE_PLACEHOLDER)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Whether the server acknowledged our presence
    pub fn is_connected(&self) -> bool {
        self.typing.is_connected()
    }

    /// Another participant of the selected chat is typing
    pub fn remote_typing(&self) -> bool {
        self.typing.remote_typing()
    }

    /// Local typing state
    pub fn is_typing(&self) -> bool {
        self.typing.is_typing()
    }

    /// Switch the selected chat.
    ///
    /// Drops the previous room subscription and clears the thread. Returns the
    /// ticket for the history fetch of the new chat.
    pub fn select_chat(&mut self, chat: Option<&Chat>) -> Option<HistoryTicket> {
        if let Some(previous) = self.phase.chat().map(|chat| chat.id.clone()) {
            if self.typing.interrupt() {
                self.channel.emit(ClientEvent::StopTyping(previous.clone()));
            }
            self.channel.hub().set_room(None);
            debug!(chat_id = %previous, "leaving chat");
        }

        self.room = None;
        self.typing.reset();
        self.messages.clear();
        self.seen.clear();
        self.input.clear();
        self.generation += 1;

        match chat {
            None => {
                self.phase = ThreadPhase::Idle;
                None
            }
            Some(chat) => {
                info!(chat_id = %chat.id, "loading chat history");
                self.phase = ThreadPhase::Loading {
                    chat: chat.clone(),
                    error: None,
                };
                Some(HistoryTicket {
                    generation: self.generation,
                    chat_id: chat.id.clone(),
                })
            }
        }
    }

    /// Apply a history fetch. Returns `false` when the ticket is stale.
    pub fn apply_history(
        &mut self,
        ticket: HistoryTicket,
        result: ChatResult<Vec<Message>>,
    ) -> bool {
        let current = match &self.phase {
            ThreadPhase::Loading { chat, .. } if ticket.generation == self.generation => {
                chat.clone()
            }
            _ => {
                debug!(chat_id = %ticket.chat_id, "discarding stale history");
                return false;
            }
        };
        if current.id != ticket.chat_id {
            debug!(chat_id = %ticket.chat_id, "discarding history for another chat");
            return false;
        }

        match result {
            Ok(history) => {
                self.messages.clear();
                self.seen.clear();
                for message in history {
                    self.push_unique(message);
                }
                info!(chat_id = %current.id, count = self.messages.len(), "chat history loaded");

                self.channel.join_room(&current.id);
                self.room = Some(self.channel.subscribe(
                    EventFilter::kinds([
                        EventKind::Typing,
                        EventKind::StopTyping,
                        EventKind::MessageReceived,
                    ])
                    .in_room(current.id.clone()),
                ));
                self.phase = ThreadPhase::Ready { chat: current };
            }
            Err(err) => {
                error!(chat_id = %current.id, error = %err, "failed to load messages");
                self.notices
                    .error("Error Occured!", "Failed to Load the Messages");
                self.phase = ThreadPhase::Loading {
                    chat: current,
                    error: Some(err.user_message()),
                };
            }
        }
        true
    }

    fn push_unique(&mut self, message: Message) -> bool {
        if !self.seen.insert(message.id.clone()) {
            debug!(message_id = %message.id, "skipping duplicate message");
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Replace the draft, driving the typing indicator
    pub fn set_input(&mut self, text: impl Into<String>, now: Instant) {
        self.input = text.into();
        let Some(chat_id) = self.ready_chat().map(|chat| chat.id.clone()) else {
            return;
        };
        if let Some(TypingSignal::Started) = self.typing.on_keystroke(now) {
            self.channel.emit(ClientEvent::Typing(chat_id));
        }
    }

    /// When the typing indicator next needs polling
    pub fn typing_deadline(&self) -> Option<Instant> {
        self.typing.deadline()
    }

    /// Emit `stop typing` once the quiet window elapsed. Returns whether it did.
    pub fn poll_typing(&mut self, now: Instant) -> bool {
        match (self.typing.poll(now), self.ready_chat()) {
            (Some(TypingSignal::Stopped), Some(chat)) => {
                self.channel.emit(ClientEvent::StopTyping(chat.id.clone()));
                true
            }
            _ => false,
        }
    }

    /// Take the draft for sending.
    ///
    /// Blank drafts yield `None` and leave the input untouched. Otherwise the
    /// input is cleared and `stop typing` is emitted before the request is
    /// handed out.
    pub fn prepare_send(&mut self) -> ChatResult<Option<OutgoingMessage>> {
        let chat_id = self
            .ready_chat()
            .map(|chat| chat.id.clone())
            .ok_or_else(|| ChatError::validation("No chat is ready for sending"))?;
        if self.input.trim().is_empty() {
            return Ok(None);
        }

        let content = std::mem::take(&mut self.input);
        self.typing.interrupt();
        self.channel.emit(ClientEvent::StopTyping(chat_id.clone()));

        Ok(Some(OutgoingMessage {
            request: SendMessageRequest { content, chat_id },
        }))
    }

    /// Apply the outcome of persisting `outgoing`. Returns whether the message was appended.
    pub fn apply_sent(&mut self, outgoing: OutgoingMessage, result: ChatResult<Message>) -> bool {
        match result {
            Ok(message) => {
                info!(message_id = %message.id, chat_id = %message.chat_id(), "message sent");
                self.channel.emit(ClientEvent::NewMessage(message.clone()));
                let showing = self
                    .ready_chat()
                    .map_or(false, |chat| chat.id == message.chat_id());
                showing && self.push_unique(message)
            }
            Err(err) => {
                error!(chat_id = %outgoing.request.chat_id, error = %err, "failed to send message");
                self.notices
                    .error("Error Occured!", "Failed to send the Message");
                let same_chat = self
                    .selected_chat()
                    .map_or(false, |chat| chat.id == outgoing.request.chat_id);
                if same_chat && self.input.is_empty() {
                    self.input = outgoing.request.content;
                }
                false
            }
        }
    }

    /// Apply an inbound realtime event
    pub fn handle_event(&mut self, event: ServerEvent) -> Option<ThreadUpdate> {
        let selected = self.selected_chat().map(|chat| chat.id.clone());
        match event {
            ServerEvent::Connected => {
                self.typing.set_connected(true);
                info!(user_id = %self.user.id, "realtime channel connected");
                Some(ThreadUpdate::Connected)
            }
            ServerEvent::Typing(chat_id) => self
                .typing
                .set_remote(&chat_id, selected.as_deref(), true)
                .then_some(ThreadUpdate::RemoteTyping(true)),
            ServerEvent::StopTyping(chat_id) => self
                .typing
                .set_remote(&chat_id, selected.as_deref(), false)
                .then_some(ThreadUpdate::RemoteTyping(false)),
            ServerEvent::MessageReceived(message) => {
                if self.ready_chat().map(|chat| chat.id.as_str()) != Some(message.chat_id()) {
                    debug!(
                        message_id = %message.id,
                        chat_id = %message.chat_id(),
                        "ignoring message for another chat"
                    );
                    return None;
                }
                self.push_unique(message.clone())
                    .then_some(ThreadUpdate::Appended(message))
            }
        }
    }

    /// Wait for the next event of the channel or the joined room.
    ///
    /// `None` once the channel closed.
    pub async fn next_event(&mut self) -> Option<ServerEvent> {
        let lifecycle = &mut self.lifecycle;
        let room = &mut self.room;
        let event = tokio::select! {
            event = lifecycle.recv() => event,
            Some(event) = async {
                match room.as_mut() {
                    Some(subscription) => subscription.recv().await,
                    None => None,
                }
            } => Some(event),
        };
        if event.is_none() {
            warn!("realtime channel ended");
            self.typing.set_connected(false);
        }
        event
    }

    /// Select `chat` and load its history
    pub async fn open_chat(&mut self, api: &dyn ChatApi, token: &str, chat: &Chat) -> bool {
        let Some(ticket) = self.select_chat(Some(chat)) else {
            return false;
        };
        let result = api.fetch_messages(token, &chat.id).await;
        self.apply_history(ticket, result)
    }

    /// Send the current draft
    pub async fn send(&mut self, api: &dyn ChatApi, token: &str) -> ChatResult<bool> {
        let Some(outgoing) = self.prepare_send()? else {
            return Ok(false);
        };
        let result = api.send_message(token, &outgoing.request).await;
        Ok(self.apply_sent(outgoing, result))
    }
}

impl<C> std::fmt::Debug for ThreadController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadController")
            .field("phase", &self.phase)
            .field("messages", &self.messages.len())
            .field("generation", &self.generation)
            .finish()
    }
}
