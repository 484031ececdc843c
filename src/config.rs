use leptos::prelude::*;
use serde::{Deserialize, Serialize};

/// Bundled defaults, compiled into the binary.
const EMBEDDED_CONFIG: &str = include_str!("../config/findjob.toml");

/// Build-time override for the API origin.
const API_BASE_URL_OVERRIDE: Option<&str> = option_env!("FINDJOB_API_BASE_URL");

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

/// REST API location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Origin the `/api/...` paths are resolved against.
    pub base_url: String,
}

/// Search page and chip input tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Job posts per result page.
    pub page_size: u32,
    /// Upper bound on suggestions shown at once.
    pub max_suggestions: usize,
    /// Quiet period before a typed location query is sent.
    pub debounce_ms: u32,
    /// Delay between blur and closing a suggestion panel.
    pub blur_grace_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace`, `debug`, `info`, `warn` or `error`.
    pub level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://findjob.nu".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_suggestions: 8,
            debounce_ms: 200,
            blur_grace_ms: 150,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load the bundled configuration, applying build-time overrides.
    ///
    /// Falls back to defaults if the bundled file does not parse. The parse
    /// error is handed back so it can be logged once logging is set up.
    pub fn load() -> (Self, Option<toml::de::Error>) {
        Self::load_from(EMBEDDED_CONFIG, API_BASE_URL_OVERRIDE)
    }

    fn load_from(contents: &str, base_url_override: Option<&str>) -> (Self, Option<toml::de::Error>) {
        let (mut config, error) = match Self::from_toml_str(contents) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        };
        if let Some(base_url) = base_url_override.filter(|url| !url.trim().is_empty()) {
            config.api.base_url = base_url.trim().to_string();
        }
        (config, error)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Provide the configuration to the component tree.
pub fn provide_app_config(config: AppConfig) {
    provide_context(config);
}

/// Retrieve the configuration from context.
pub fn use_app_config() -> AppConfig {
    expect_context::<AppConfig>()
}
