//! Server configuration

use serde::{Deserialize, Serialize};

/// Rules engine configuration: where packages come from and how the
/// container behaves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesEngineConfig {
    /// Base URL of the artifact registry
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// Optional registry API key (Bearer token)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Artifact group (namespace)
    #[serde(default = "default_group_id")]
    pub group_id: String,

    /// Artifact name
    #[serde(default = "default_artifact_id")]
    pub artifact_id: String,

    /// Version selector: "LATEST" or an exact version
    #[serde(default = "default_version")]
    pub version: String,

    /// Rule group sessions evaluate against
    #[serde(default = "default_entry_point")]
    pub entry_point: String,

    /// Whether to poll for newer versions in the background
    #[serde(default = "default_auto_reload")]
    pub auto_reload: bool,

    /// Seconds between registry polls (default: 10)
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
}

fn default_registry_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_group_id() -> String {
    "io.shaama".to_string()
}

fn default_artifact_id() -> String {
    "offer-rules".to_string()
}

fn default_version() -> String {
    "LATEST".to_string()
}

fn default_entry_point() -> String {
    "offer-session".to_string()
}

fn default_auto_reload() -> bool {
    true
}

fn default_poll_interval_seconds() -> u64 {
    10
}

impl Default for RulesEngineConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            api_key: None,
            group_id: default_group_id(),
            artifact_id: default_artifact_id(),
            version: default_version(),
            entry_point: default_entry_point(),
            auto_reload: default_auto_reload(),
            poll_interval_seconds: default_poll_interval_seconds(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Rules engine configuration
    #[serde(default)]
    pub rules: RulesEngineConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            rules: RulesEngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/server").required(false))
            .add_source(config::Environment::with_prefix("OFFER").separator("__"))
            .build();

        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(_) => {
                tracing::info!("No config file found, using default configuration");
                Ok(Self::default())
            }
        }
    }
}
