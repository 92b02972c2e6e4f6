use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct JourneyConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub explainer: ExplainerConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub timeline_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            timeline_path: "data/sample_journey.json".to_string(),
        }
    }
}

/// Decision explainer settings.
///
/// `endpoint` is the base URL of an explanation service exposing
/// `POST /api/explain-decision`. When it is absent the local keyword
/// fallback answers instead.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExplainerConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: u64,
    pub fallback_delay_ms: u64,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_seconds: 30,
            fallback_delay_ms: 1500,
        }
    }
}

impl ExplainerConfig {
    /// The configured endpoint, ignoring blank values.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct IdentityConfig {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8766,
            cors: true,
        }
    }
}

impl JourneyConfig {
    /// Load from a TOML file (optional) layered under `JOURNEY__*` env vars,
    /// e.g. `JOURNEY__EXPLAINER__ENDPOINT`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("JOURNEY").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// Parse a TOML document directly, without environment overrides.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        s.try_deserialize()
    }
}
