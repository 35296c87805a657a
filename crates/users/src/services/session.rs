//! Authenticated session and its realtime lease.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::entities::User;
use crate::types::{SessionError, SessionResult};

/// The logged-in user together with the bearer token used for every request.
///
/// Clones share the realtime lease, so at most one socket connection can be
/// mounted per session no matter how many handles exist.
#[derive(Debug, Clone)]
pub struct AuthSession {
    user: User,
    token: String,
    realtime_mounted: Arc<AtomicBool>,
}

impl AuthSession {
    /// Build a session from a stored user record
    pub fn new(user: User) -> SessionResult<Self> {
        let token = user
            .token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .ok_or(SessionError::MissingToken)?;

        Ok(Self {
            user,
            token,
            realtime_mounted: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The logged-in user, including the token
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    /// Bearer token for REST calls
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Claim the single realtime connection slot of this session
    pub fn claim_realtime(&self) -> SessionResult<RealtimeLease> {
        if self
            .realtime_mounted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SessionError::RealtimeAlreadyMounted);
        }

        tracing::debug!(user_id = %self.user.id, "realtime lease claimed");
        Ok(RealtimeLease {
            flag: Arc::clone(&self.realtime_mounted),
        })
    }

    /// Whether a realtime connection currently holds the lease
    pub fn realtime_mounted(&self) -> bool {
        self.realtime_mounted.load(Ordering::Acquire)
    }
}

/// Proof that the holder owns the session's realtime connection slot.
///
/// Released when dropped.
#[derive(Debug)]
pub struct RealtimeLease {
    flag: Arc<AtomicBool>,
}

impl Drop for RealtimeLease {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        tracing::debug!("realtime lease released");
    }
}
