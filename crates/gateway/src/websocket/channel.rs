//! WebSocket implementation of the realtime channel.
//!
//! One writer task drains an unbounded queue into the socket and one reader
//! task decodes inbound frames into the [`EventHub`]. Nothing else runs on
//! the connection's behalf.

use chatzen_chats::{ClientEvent, EventHub, RealtimeChannel};
use chatzen_users::{AuthSession, RealtimeLease};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use super::frames::{decode_frame, encode_frame};
use crate::error::GatewayResult;

/// Realtime channel over a WebSocket connection.
///
/// Holds the session's realtime lease for as long as it lives. Dropping it
/// closes the socket and ends every subscription.
#[derive(Debug)]
pub struct SocketChannel {
    hub: EventHub,
    outgoing: mpsc::UnboundedSender<Message>,
    reader: JoinHandle<()>,
    writer: Option<JoinHandle<()>>,
    _lease: RealtimeLease,
}

impl SocketChannel {
    /// Connect to `url` and announce `session`'s user with `setup`
    pub async fn connect(url: &str, session: &AuthSession) -> GatewayResult<Self> {
        let lease = session.claim_realtime()?;
        let (stream, _) = connect_async(url).await?;
        info!(url = %url, user_id = %session.user_id(), "socket connected");

        let (mut write, mut read) = stream.split();
        let (outgoing, mut queue) = mpsc::unbounded_channel::<Message>();
        let hub = EventHub::new();

        let writer = tokio::spawn(async move {
            while let Some(message) = queue.recv().await {
                let closing = matches!(message, Message::Close(_));
                if let Err(err) = write.send(message).await {
                    warn!(error = %err, "socket write failed");
                    break;
                }
                if closing {
                    break;
                }
            }
            debug!("socket writer finished");
        });

        let reader_hub = hub.clone();
        let reader = tokio::spawn(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => match decode_frame(&text) {
                        Ok(Some(event)) => {
                            reader_hub.dispatch(event);
                        }
                        Ok(None) => {}
                        Err(err) => warn!(error = %err, "dropping malformed frame"),
                    },
                    Ok(Message::Close(_)) => {
                        info!("server closed the socket");
                        break;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        error!(error = %err, "socket read failed");
                        break;
                    }
                }
            }
            reader_hub.close();
        });

        let channel = Self {
            hub,
            outgoing,
            reader,
            writer: Some(writer),
            _lease: lease,
        };
        channel.emit(ClientEvent::Setup(session.user().public_profile()));
        Ok(channel)
    }

    /// Close the socket and wait for pending frames to flush
    pub async fn disconnect(mut self) {
        let _ = self.outgoing.send(Message::Close(None));
        if let Some(writer) = self.writer.take() {
            if let Err(err) = writer.await {
                warn!(error = %err, "socket writer task failed");
            }
        }
        info!("socket disconnected");
    }
}

impl RealtimeChannel for SocketChannel {
    fn emit(&self, event: ClientEvent) {
        let name = event.name();
        let frame = match encode_frame(&event) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(event = name, error = %err, "failed to encode event");
                return;
            }
        };
        if self.outgoing.send(Message::Text(frame)).is_err() {
            warn!(event = name, "socket is closed, event dropped");
            return;
        }
        debug!(event = name, "event queued");
    }

    fn hub(&self) -> &EventHub {
        &self.hub
    }
}

impl Drop for SocketChannel {
    fn drop(&mut self) {
        if self.writer.is_some() {
            let _ = self.outgoing.send(Message::Close(None));
        }
        self.reader.abort();
        self.hub.close();
    }
}
