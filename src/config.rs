//! Configuration loading and types for cloudapi.
//!
//! Configuration is read from a YAML file and deserialized into the
//! [`Config`] struct.  Each subsection governs a different part of the
//! system: credentials, the EC2 query endpoint, HTTP behavior, the GleSYS
//! endpoint, logging, and metrics.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// AWS-style credentials used to sign EC2 requests.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// EC2 query API settings.
    #[serde(default)]
    pub ec2: Ec2Config,

    /// HTTP transport settings shared by every provider.
    #[serde(default)]
    pub http: HttpConfig,

    /// GleSYS JSON API settings.
    #[serde(default)]
    pub glesys: GlesysConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Access key pair.
///
/// Field names also accept the `access_key_id` / `secret_access_key`
/// spellings used by the AWS tooling.
#[derive(Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    /// Access key id, sent as `AWSAccessKeyId`.
    #[serde(alias = "access_key_id", default)]
    pub access_key: String,

    /// Secret key used as the HMAC key. Never logged.
    #[serde(alias = "secret_access_key", default)]
    pub secret_key: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl CredentialsConfig {
    /// Fill empty fields from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`.
    pub fn with_env_fallback(mut self) -> Self {
        if self.access_key.is_empty() {
            if let Ok(key) = std::env::var("AWS_ACCESS_KEY_ID") {
                self.access_key = key;
            }
        }
        if self.secret_key.is_empty() {
            if let Ok(secret) = std::env::var("AWS_SECRET_ACCESS_KEY") {
                self.secret_key = secret;
            }
        }
        self
    }
}

/// EC2 query API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Ec2Config {
    /// Endpoint used when a call does not name a region.
    #[serde(default = "default_ec2_endpoint")]
    pub endpoint: String,

    /// Region assumed when a call does not name one.
    #[serde(default = "default_region")]
    pub default_region: String,

    /// Value of the `Version` form parameter.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Region name to endpoint overrides.
    #[serde(default)]
    pub regions: BTreeMap<String, String>,
}

impl Default for Ec2Config {
    fn default() -> Self {
        Self {
            endpoint: default_ec2_endpoint(),
            default_region: default_region(),
            api_version: default_api_version(),
            regions: BTreeMap::new(),
        }
    }
}

impl Ec2Config {
    /// Resolve the endpoint for `region`, falling back to the default
    /// endpoint when no region is given.
    pub fn endpoint_for_region(&self, region: Option<&str>) -> String {
        match region {
            None => self.endpoint.clone(),
            Some(region) => self
                .regions
                .get(region)
                .cloned()
                .unwrap_or_else(|| format!("https://ec2.{region}.amazonaws.com")),
        }
    }
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Retries after the first attempt for retryable failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Base delay for exponential backoff, in milliseconds.
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay(),
        }
    }
}

/// GleSYS API configuration.
#[derive(Clone, Deserialize)]
pub struct GlesysConfig {
    /// Base URL of the JSON API.
    #[serde(default = "default_glesys_endpoint")]
    pub endpoint: String,

    /// Account name (`clNNNNN`).
    #[serde(default)]
    pub username: String,

    /// API key. Never logged.
    #[serde(default)]
    pub api_key: String,
}

impl Default for GlesysConfig {
    fn default() -> Self {
        Self {
            endpoint: default_glesys_endpoint(),
            username: String::new(),
            api_key: String::new(),
        }
    }
}

impl std::fmt::Debug for GlesysConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlesysConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: text or json.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    /// Install a Prometheus recorder for per-call metrics.
    #[serde(default)]
    pub metrics: bool,
}

// -- Defaults ----------------------------------------------------------------

fn default_ec2_endpoint() -> String {
    "https://ec2.us-east-1.amazonaws.com".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_api_version() -> String {
    "2011-05-15".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_retries() -> usize {
    5
}

fn default_retry_base_delay() -> u64 {
    50
}

fn default_glesys_endpoint() -> String {
    "https://api.glesys.com".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

// -- Loader ------------------------------------------------------------------

/// Load and parse configuration from a YAML file at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config: Config = serde_yaml::from_str(&contents)?;
    Ok(config)
}
