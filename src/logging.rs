//! Browser console logging via `tracing-wasm`.

use tracing::Level;
use tracing_wasm::WASMLayerConfigBuilder;

use crate::config::LoggingConfig;

/// Level named in config; unknown names fall back to `INFO`.
pub fn max_level(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::INFO)
}

/// Install the global subscriber. Call once, at start-up.
pub fn init(config: &LoggingConfig) {
    let layer_config = WASMLayerConfigBuilder::new()
        .set_max_level(max_level(&config.level))
        .build();
    tracing_wasm::set_as_global_default_with_config(layer_config);
}
