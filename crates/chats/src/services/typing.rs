//! Typing indicator state machine.
//!
//! Local typing is driven by keystroke timestamps: the first keystroke emits
//! `typing`, and once no keystroke arrived for the quiet window the indicator
//! asks for exactly one `stop typing`. Remote typing is a flag toggled by
//! events for the selected chat.

use std::time::Duration;

use tokio::time::Instant;

/// Default quiet window after the last keystroke
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(3000);

/// Signal the owner should emit on the realtime channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingSignal {
    Started,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct TypingIndicator {
    quiet_window: Duration,
    connected: bool,
    typing: bool,
    last_keystroke: Option<Instant>,
    remote_typing: bool,
}

impl Default for TypingIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_WINDOW)
    }
}

impl TypingIndicator {
    pub fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window,
            connected: false,
            typing: false,
            last_keystroke: None,
            remote_typing: false,
        }
    }

    pub fn quiet_window(&self) -> Duration {
        self.quiet_window
    }

    /// Arm or disarm the indicator. Keystrokes are dropped while disarmed.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
        if !connected {
            self.typing = false;
            self.last_keystroke = None;
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Local user is typing
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Record a keystroke at `now`
    pub fn on_keystroke(&mut self, now: Instant) -> Option<TypingSignal> {
        if !self.connected {
            return None;
        }
        self.last_keystroke = Some(now);
        if self.typing {
            return None;
        }
        self.typing = true;
        Some(TypingSignal::Started)
    }

    /// When the quiet window of the latest keystroke elapses
    pub fn deadline(&self) -> Option<Instant> {
        if !self.typing {
            return None;
        }
        self.last_keystroke.map(|last| last + self.quiet_window)
    }

    /// Stop typing once the quiet window has elapsed at `now`
    pub fn poll(&mut self, now: Instant) -> Option<TypingSignal> {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.typing = false;
                self.last_keystroke = None;
                Some(TypingSignal::Stopped)
            }
            _ => None,
        }
    }

    /// Stop typing immediately, returning whether typing was in progress
    pub fn interrupt(&mut self) -> bool {
        let was_typing = self.typing;
        self.typing = false;
        self.last_keystroke = None;
        was_typing
    }

    /// Apply a remote `typing`/`stop typing` event. Events for other chats are ignored.
    pub fn set_remote(&mut self, chat_id: &str, selected_chat_id: Option<&str>, typing: bool) -> bool {
        if selected_chat_id != Some(chat_id) {
            return false;
        }
        let changed = self.remote_typing != typing;
        self.remote_typing = typing;
        changed
    }

    /// Another participant of the selected chat is typing
    pub fn remote_typing(&self) -> bool {
        self.remote_typing
    }

    /// Forget local and remote typing state, keeping the connection flag
    pub fn reset(&mut self) {
        self.typing = false;
        self.last_keystroke = None;
        self.remote_typing = false;
    }
}
