use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// City used when a request or the client does not name one
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Base URL of the upstream weather API
    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,

    /// Base URL of the proxy gateway the client falls back to
    #[serde(default = "default_proxy_base_url")]
    pub proxy_base_url: String,

    /// Per-request upstream timeout used by the gateway
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Directory holding index.html and other static assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Unit the upstream reports feels-like temperature in
    #[serde(default)]
    pub feels_like_unit: FeelsLikeUnit,
}

/// The upstream returns the feels-like reading in Fahrenheit while every other
/// temperature is Celsius. `Celsius` skips the conversion for payloads that
/// are already consistent.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeelsLikeUnit {
    #[default]
    Fahrenheit,
    Celsius,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_city() -> String {
    "福清".to_string()
}

fn default_upstream_base_url() -> String {
    "https://60s-cf.viki.moe".to_string()
}

fn default_proxy_base_url() -> String {
    "http://127.0.0.1:3001".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("default_city", default_city())?
            .set_default("upstream_base_url", default_upstream_base_url())?
            .set_default("proxy_base_url", default_proxy_base_url())?
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // TIANQI_DEFAULT_CITY -> default_city etc.
            .add_source(
                Environment::with_prefix("TIANQI")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_city: default_city(),
            upstream_base_url: default_upstream_base_url(),
            proxy_base_url: default_proxy_base_url(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
            static_dir: default_static_dir(),
            feels_like_unit: FeelsLikeUnit::default(),
        }
    }
}
