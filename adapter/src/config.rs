//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables. Nothing here is held
//! in a global: callers load a [`Config`] once and pass it, or the
//! [`AppCredentials`] taken from it, to whatever needs it.

use std::env;
use std::str::FromStr;

use tracing::warn;

/// Default platform API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.weixin.qq.com";

/// Default reply sent to users who just followed the account.
pub const DEFAULT_WELCOME_MESSAGE: &str = "Thanks for subscribing!";

/// App id and secret of one official account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_secret: String,
}

impl AppCredentials {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared token for webhook signature verification
    pub wechat_token: Option<String>,

    /// Official account app id
    pub app_id: Option<String>,

    /// Official account app secret
    pub app_secret: Option<String>,

    /// Base URL of the platform API
    pub api_base_url: String,

    /// HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Reply text for subscribe events
    pub welcome_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            wechat_token: None,
            app_id: None,
            app_secret: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: 8000,
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            port: parse_var("PORT", defaults.port),

            wechat_token: non_empty_var("WECHAT_TOKEN"),

            app_id: non_empty_var("WECHAT_APP_ID"),

            app_secret: non_empty_var("WECHAT_APP_SECRET"),

            api_base_url: non_empty_var("WECHAT_API_BASE_URL")
                .unwrap_or(defaults.api_base_url),

            request_timeout_ms: parse_var("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),

            welcome_message: env::var("WELCOME_MESSAGE").unwrap_or(defaults.welcome_message),
        }
    }

    /// App credentials, if both the id and the secret are configured.
    pub fn credentials(&self) -> Option<AppCredentials> {
        match (&self.app_id, &self.app_secret) {
            (Some(id), Some(secret)) => Some(AppCredentials::new(id.clone(), secret.clone())),
            _ => None,
        }
    }
}

/// Parse an environment variable, falling back to `default` when it is unset
/// or does not parse.
fn parse_var<T: FromStr + Copy>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

/// Read an environment variable, treating blank values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
