use std::sync::Arc;

use anyhow::{Context, Result};
use chatzen_chats::{
    ChatApi, ChatListService, GroupService, NoticeBoard, SearchService, SessionState,
    ThreadController,
};
use chatzen_config::ClientConfig;
use chatzen_gateway::{RestClient, SocketChannel};
use chatzen_users::{AuthSession, SessionError, SessionStore, User};
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global subscriber. Logs go to stderr so they do not mix
    /// with thread output on stdout.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::TRACE)
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Everything a client front end needs, wired from configuration
#[derive(Clone)]
pub struct ClientServices {
    pub config: ClientConfig,
    pub api: Arc<dyn ChatApi>,
    pub store: SessionStore,
    pub notices: NoticeBoard,
}

impl ClientServices {
    pub fn initialise(config: &ClientConfig) -> Result<Self> {
        let rest = RestClient::new(&config.api.base_url, config.api.request_timeout())
            .context("failed to build REST client")?;
        let store = SessionStore::new(&config.session.storage_dir);
        info!(
            base_url = %config.api.base_url,
            storage = %store.path().display(),
            "client services ready"
        );

        Ok(Self {
            config: config.clone(),
            api: Arc::new(rest),
            store,
            notices: NoticeBoard::new(config.notifications.duration()),
        })
    }

    /// Session restored from storage, if a user is logged in
    pub async fn restore_session(&self) -> Result<Option<SessionState>> {
        let auth = self
            .store
            .restore()
            .await
            .context("failed to read stored session")?;
        Ok(auth.map(|auth| SessionState::new(auth, self.notices.clone())))
    }

    /// Session restored from storage, failing when nobody is logged in
    pub async fn require_session(&self) -> Result<SessionState> {
        self.restore_session()
            .await?
            .ok_or(SessionError::NotLoggedIn)
            .context("run `chatzen login` first")
    }

    /// Store `user` as the logged-in user
    pub async fn login(&self, user: User) -> Result<SessionState> {
        let auth = AuthSession::new(user.clone()).context("cannot log in")?;
        self.store
            .save(&user)
            .await
            .context("failed to store session")?;
        info!(user_id = %user.id, "logged in");
        Ok(SessionState::new(auth, self.notices.clone()))
    }

    pub async fn logout(&self) -> Result<()> {
        self.store
            .clear()
            .await
            .context("failed to clear stored session")?;
        info!("logged out");
        Ok(())
    }

    /// Open the realtime socket for `session`
    pub async fn connect_realtime(&self, session: &AuthSession) -> Result<SocketChannel> {
        SocketChannel::connect(&self.config.realtime.url, session)
            .await
            .with_context(|| format!("failed to connect to {}", self.config.realtime.url))
    }

    /// Mount a thread controller on `channel`
    pub fn thread(&self, channel: SocketChannel, user: &User) -> ThreadController<SocketChannel> {
        ThreadController::new(
            channel,
            user.clone(),
            self.notices.clone(),
            self.config.realtime.typing_quiet_window(),
        )
    }

    pub fn chat_list(&self) -> ChatListService {
        ChatListService::new(self.api.clone())
    }

    pub fn search(&self) -> SearchService {
        SearchService::new(self.api.clone())
    }

    pub fn groups(&self) -> GroupService {
        GroupService::new(self.api.clone())
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
