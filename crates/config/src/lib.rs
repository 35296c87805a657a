use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "chatzen.toml",
    "config/chatzen.toml",
    ".chatzen/chatzen.toml",
    "../chatzen.toml",
    "../config/chatzen.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub realtime: RealtimeConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "ApiConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl ApiConfig {
    const fn default_request_timeout() -> u64 {
        30
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

/// Realtime socket settings.
///
/// ```
/// use chatzen_config::RealtimeConfig;
///
/// let realtime = RealtimeConfig::default();
/// assert_eq!(realtime.url, "ws://localhost:5000/ws");
/// assert_eq!(realtime.typing_quiet_window().as_millis(), 3000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    pub url: String,
    #[serde(default = "RealtimeConfig::default_quiet_window")]
    pub typing_quiet_window_ms: u64,
}

impl RealtimeConfig {
    const fn default_quiet_window() -> u64 {
        3_000
    }

    pub fn typing_quiet_window(&self) -> Duration {
        Duration::from_millis(self.typing_quiet_window_ms)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:5000/ws".to_string(),
            typing_quiet_window_ms: Self::default_quiet_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub storage_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".chatzen"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "NotificationConfig::default_duration")]
    pub duration_ms: u64,
}

impl NotificationConfig {
    const fn default_duration() -> u64 {
        5_000
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            duration_ms: Self::default_duration(),
        }
    }
}

fn clamp_to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Load the client configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use chatzen_config::load;
///
/// std::env::remove_var("CHATZEN_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.api.base_url.is_empty());
/// ```
pub fn load() -> anyhow::Result<ClientConfig> {
    let defaults = ClientConfig::default();

    let mut builder = config::Config::builder()
        .set_default("api.base_url", defaults.api.base_url.clone())?
        .set_default(
            "api.request_timeout_seconds",
            clamp_to_i64(defaults.api.request_timeout_seconds),
        )?
        .set_default("realtime.url", defaults.realtime.url.clone())?
        .set_default(
            "realtime.typing_quiet_window_ms",
            clamp_to_i64(defaults.realtime.typing_quiet_window_ms),
        )?
        .set_default(
            "session.storage_dir",
            defaults.session.storage_dir.to_string_lossy().into_owned(),
        )?
        .set_default(
            "notifications.duration_ms",
            clamp_to_i64(defaults.notifications.duration_ms),
        )?;

    let environment_overrides = config::Environment::with_prefix("CHATZEN").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("CHATZEN_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via CHATZEN_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<ClientConfig>()
        .context("invalid configuration")?;

    if config.realtime.typing_quiet_window_ms == 0 {
        anyhow::bail!("invalid configuration: realtime.typing_quiet_window_ms must be positive");
    }

    debug!(?config, "loaded client configuration");
    Ok(config)
}
