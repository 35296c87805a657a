//! Realtime channel abstraction.
//!
//! A [`RealtimeChannel`] emits [`ClientEvent`]s fire-and-forget and hands
//! inbound [`ServerEvent`]s to [`Subscription`]s through an [`EventHub`]. The
//! hub also tracks the single room the client has joined and whether the
//! server has acknowledged our presence.
//!
//! Transports only push decoded events into the hub; subscribers pull them on
//! their own task, so event handling never runs concurrently.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::types::{ChatId, ClientEvent, EventKind, ServerEvent};

/// Connection to the backend's event bus
pub trait RealtimeChannel: Send + Sync {
    /// Send an event without waiting for delivery. Failures are logged, never returned.
    fn emit(&self, event: ClientEvent);

    /// Hub that receives the decoded inbound events of this connection
    fn hub(&self) -> &EventHub;

    /// Receive events matching `filter` until the handle is dropped
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.hub().subscribe(filter)
    }

    /// Whether the server acknowledged our `setup`
    fn is_connected(&self) -> bool {
        self.hub().is_connected()
    }

    /// Join the room of `chat_id`, replacing any previously joined room
    fn join_room(&self, chat_id: &str) {
        self.emit(ClientEvent::JoinChat(chat_id.to_string()));
        if let Some(previous) = self.hub().set_room(Some(chat_id.to_string())) {
            debug!(previous = %previous, chat_id = %chat_id, "replaced active room");
        }
        info!(chat_id = %chat_id, "joined chat room");
    }

    /// Room currently joined, if any
    fn active_room(&self) -> Option<ChatId> {
        self.hub().room()
    }
}

/// Selects which inbound events a subscription receives
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    kinds: Vec<EventKind>,
    room: Option<ChatId>,
}

impl EventFilter {
    /// Every event
    pub fn all() -> Self {
        Self::default()
    }

    /// Only the listed kinds
    pub fn kinds(kinds: impl IntoIterator<Item = EventKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            room: None,
        }
    }

    /// Restrict chat-scoped events to the room of `chat_id`
    pub fn in_room(mut self, chat_id: impl Into<ChatId>) -> Self {
        self.room = Some(chat_id.into());
        self
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn matches(&self, event: &ServerEvent) -> bool {
        if !self.kinds.is_empty() && !self.kinds.contains(&event.kind()) {
            return false;
        }
        match (&self.room, event.chat_id()) {
            (Some(room), Some(chat_id)) => room == chat_id,
            _ => true,
        }
    }
}

struct Subscriber {
    id: u64,
    filter: EventFilter,
    sender: mpsc::UnboundedSender<ServerEvent>,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    subscribers: Vec<Subscriber>,
    room: Option<ChatId>,
    connected: bool,
    closed: bool,
}

/// Fan-out point between a transport and its subscribers
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Arc<Mutex<HubInner>>,
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("EventHub")
            .field("subscribers", &inner.subscribers.len())
            .field("room", &inner.room)
            .field("connected", &inner.connected)
            .field("closed", &inner.closed)
            .finish()
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a subscriber. On a closed hub the subscription ends immediately.
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        if inner.closed {
            debug!(subscription = id, "subscribed to closed hub");
        } else {
            inner.subscribers.push(Subscriber { id, filter, sender });
        }

        Subscription {
            id,
            receiver,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an inbound event to every matching subscriber, returning how many got it
    pub fn dispatch(&self, event: ServerEvent) -> usize {
        let mut inner = self.lock();
        if inner.closed {
            debug!(event = event.name(), "dropping event on closed hub");
            return 0;
        }
        if matches!(event, ServerEvent::Connected) {
            inner.connected = true;
        }

        let mut delivered = 0;
        inner.subscribers.retain(|subscriber| {
            if !subscriber.filter.matches(&event) {
                return true;
            }
            match subscriber.sender.send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        debug!(event = event.name(), delivered, "dispatched event");
        delivered
    }

    /// Mark the connection as gone and end every subscription
    pub fn close(&self) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        inner.connected = false;
        inner.room = None;
        let dropped = inner.subscribers.len();
        inner.subscribers.clear();
        warn!(subscriptions = dropped, "realtime channel closed");
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Replace the active room, returning the previous one
    pub fn set_room(&self, room: Option<ChatId>) -> Option<ChatId> {
        std::mem::replace(&mut self.lock().room, room)
    }

    pub fn room(&self) -> Option<ChatId> {
        self.lock().room.clone()
    }
}

/// Handle yielding subscribed events in arrival order.
///
/// Dropping it unregisters the subscriber.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: mpsc::UnboundedReceiver<ServerEvent>,
    hub: Weak<Mutex<HubInner>>,
}

impl Subscription {
    /// Wait for the next event; `None` once the channel closed
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        self.receiver.recv().await
    }

    /// Next already-delivered event, if any
    pub fn try_recv(&mut self) -> Option<ServerEvent> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.subscribers.retain(|subscriber| subscriber.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Message;
    use chatzen_users::User;

    fn received(chat_id: &str, id: &str) -> ServerEvent {
        ServerEvent::MessageReceived(Message::new(id, User::new("u2", "Grace"), "hi", chat_id))
    }

    #[test]
    fn filters_by_kind_and_room() {
        let filter = EventFilter::kinds([EventKind::MessageReceived]).in_room("c1");

        assert!(filter.matches(&received("c1", "m1")));
        assert!(!filter.matches(&received("c2", "m1")));
        assert!(!filter.matches(&ServerEvent::Typing("c1".into())));
        assert!(EventFilter::all().in_room("c1").matches(&ServerEvent::Connected));
    }

    #[tokio::test]
    async fn delivers_in_arrival_order() {
        let hub = EventHub::new();
        let mut subscription = hub.subscribe(EventFilter::all());

        hub.dispatch(ServerEvent::Connected);
        hub.dispatch(received("c1", "m1"));
        hub.dispatch(received("c1", "m2"));

        assert_eq!(subscription.recv().await, Some(ServerEvent::Connected));
        assert_eq!(subscription.recv().await, Some(received("c1", "m1")));
        assert_eq!(subscription.try_recv(), Some(received("c1", "m2")));
        assert_eq!(subscription.try_recv(), None);
        assert!(hub.is_connected());
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let hub = EventHub::new();
        let first = hub.subscribe(EventFilter::all());
        let _second = hub.subscribe(EventFilter::all());
        assert_eq!(hub.subscriber_count(), 2);

        drop(first);
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(hub.dispatch(ServerEvent::Connected), 1);
    }

    #[tokio::test]
    async fn close_ends_subscriptions() {
        let hub = EventHub::new();
        let mut subscription = hub.subscribe(EventFilter::all());
        hub.dispatch(ServerEvent::Connected);
        hub.set_room(Some("c1".into()));

        hub.close();

        assert_eq!(subscription.recv().await, Some(ServerEvent::Connected));
        assert_eq!(subscription.recv().await, None);
        assert!(!hub.is_connected());
        assert_eq!(hub.room(), None);
        assert_eq!(hub.dispatch(ServerEvent::Connected), 0);

        let mut late = hub.subscribe(EventFilter::all());
        assert_eq!(late.recv().await, None);
    }

    #[test]
    fn set_room_replaces_previous() {
        let hub = EventHub::new();
        assert_eq!(hub.set_room(Some("a".into())), None);
        assert_eq!(hub.set_room(Some("b".into())), Some("a".into()));
        assert_eq!(hub.room().as_deref(), Some("b"));
    }
}
