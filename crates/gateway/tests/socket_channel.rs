use std::time::Duration;

use chatzen_chats::{EventFilter, EventKind, RealtimeChannel, ServerEvent};
use chatzen_gateway::SocketChannel;
use chatzen_users::{AuthSession, SessionError, User};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

fn session() -> AuthSession {
    AuthSession::new(User::new("u1", "Ada").with_token("token-1")).unwrap()
}

/// Loopback server: forwards every text frame it receives to the test and
/// plays back the frames the test pushes.
async fn start_server() -> (String, mpsc::UnboundedReceiver<Value>, mpsc::UnboundedSender<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}", listener.local_addr().unwrap());
    let (seen_tx, seen_rx) = mpsc::unbounded_channel();
    let (push_tx, mut push_rx) = mpsc::unbounded_channel::<Value>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let socket = accept_async(stream).await.unwrap();
        let (mut write, mut read) = socket.split();

        loop {
            tokio::select! {
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        let value: Value = serde_json::from_str(&text).unwrap();
                        if seen_tx.send(value).is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                },
                Some(value) = push_rx.recv() => {
                    if write.send(Message::Text(value.to_string())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    (url, seen_rx, push_tx)
}

async fn next_frame(frames: &mut mpsc::UnboundedReceiver<Value>) -> Value {
    tokio::time::timeout(Duration::from_secs(5), frames.recv())
        .await
        .expect("frame expected")
        .expect("server alive")
}

#[tokio::test]
async fn connect_announces_public_profile() {
    let (url, mut frames, _push) = start_server().await;
    let session = session();

    let channel = SocketChannel::connect(&url, &session).await.unwrap();

    let setup = next_frame(&mut frames).await;
    assert_eq!(setup["event"], "setup");
    assert_eq!(setup["data"]["_id"], "u1");
    assert!(setup["data"].get("token").is_none());
    assert!(session.realtime_mounted());

    drop(channel);
    assert!(!session.realtime_mounted());
}

#[tokio::test]
async fn second_connection_for_same_session_is_refused() {
    let (url, _frames, _push) = start_server().await;
    let session = session();

    let _channel = SocketChannel::connect(&url, &session).await.unwrap();
    let err = SocketChannel::connect(&url, &session).await.unwrap_err();

    assert!(matches!(
        err,
        chatzen_gateway::GatewayError::Session(SessionError::RealtimeAlreadyMounted)
    ));
}

#[tokio::test]
async fn room_subscription_receives_only_its_chat() {
    let (url, mut frames, push) = start_server().await;
    let channel = SocketChannel::connect(&url, &session()).await.unwrap();
    next_frame(&mut frames).await;

    let mut lifecycle = channel.subscribe(EventFilter::kinds([EventKind::Connected]));
    push.send(json!({"event": "connected"})).unwrap();
    assert_eq!(lifecycle.recv().await, Some(ServerEvent::Connected));
    assert!(channel.is_connected());

    channel.join_room("c1");
    let join = next_frame(&mut frames).await;
    assert_eq!(join, json!({"event": "join chat", "data": "c1"}));
    assert_eq!(channel.active_room().as_deref(), Some("c1"));

    let mut room = channel.subscribe(
        EventFilter::kinds([EventKind::MessageReceived, EventKind::Typing]).in_room("c1"),
    );
    push.send(json!({"event": "typing", "data": "c2"})).unwrap();
    push.send(json!({"event": "reaction", "data": {"emoji": "+1"}})).unwrap();
    push.send(json!({
        "event": "message received",
        "data": {"_id": "m1", "content": "hi", "sender": {"_id": "u2", "name": "Grace"}, "chat": "c1"}
    }))
    .unwrap();

    match room.recv().await {
        Some(ServerEvent::MessageReceived(message)) => assert_eq!(message.id, "m1"),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn server_close_ends_subscriptions() {
    let (url, mut frames, push) = start_server().await;
    let channel = SocketChannel::connect(&url, &session()).await.unwrap();
    next_frame(&mut frames).await;

    let mut events = channel.subscribe(EventFilter::all());
    drop(push);
    drop(frames);
    // The server task stops once the test stops listening; provoke it with a frame.
    channel.join_room("c1");

    let ended = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("subscription should end");
    assert_eq!(ended, None);
    assert!(!channel.is_connected());
}

#[tokio::test]
async fn disconnect_sends_close() {
    let (url, mut frames, _push) = start_server().await;
    let session = session();
    let channel = SocketChannel::connect(&url, &session).await.unwrap();
    next_frame(&mut frames).await;

    channel.disconnect().await;

    assert!(!session.realtime_mounted());
    let closed = tokio::time::timeout(Duration::from_secs(5), frames.recv())
        .await
        .expect("server should notice close");
    assert_eq!(closed, None);
}
