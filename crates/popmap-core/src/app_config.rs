use std::net::SocketAddr;
use std::path::PathBuf;

use crate::view::ViewConfig;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Client id and secret for the Naver local search API.
#[derive(Clone)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for NaverCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaverCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Remote snapshot; when unset the local snapshot file is read instead.
    pub snapshot_url: Option<String>,
    pub snapshot_path: PathBuf,
    /// Replaces the bundled fallback stores when set.
    pub fallback_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub refresh_cron: Option<String>,
    pub view: ViewConfig,
    pub collect_config_path: PathBuf,
    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,
    pub collect_delay_ms: u64,
    pub collect_max_retries: u32,
    pub collect_backoff_base_ms: u64,
}

impl AppConfig {
    /// Naver credentials, required only by the collector.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first absent variable.
    pub fn naver_credentials(&self) -> Result<NaverCredentials, ConfigError> {
        let client_id = self
            .naver_client_id
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("NAVER_CLIENT_ID".to_string()))?;
        let client_secret = self
            .naver_client_secret
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("NAVER_CLIENT_SECRET".to_string()))?;
        Ok(NaverCredentials {
            client_id,
            client_secret,
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("snapshot_url", &self.snapshot_url)
            .field("snapshot_path", &self.snapshot_path)
            .field("fallback_path", &self.fallback_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("refresh_cron", &self.refresh_cron)
            .field("view", &self.view)
            .field("collect_config_path", &self.collect_config_path)
            .field("naver_client_id", &self.naver_client_id)
            .field(
                "naver_client_secret",
                &self.naver_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("collect_delay_ms", &self.collect_delay_ms)
            .field("collect_max_retries", &self.collect_max_retries)
            .field("collect_backoff_base_ms", &self.collect_backoff_base_ms)
            .finish()
    }
}
