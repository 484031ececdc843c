#![allow(non_snake_case)]

pub mod bindings;
pub mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod services;

mod app;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::config::AppConfig;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = AppConfig::load();
    logging::init(&config.logging);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "failed to parse bundled config, using defaults");
    }
    tracing::info!(version = VERSION, api = %config.api.base_url, "starting FindJob frontend");

    // Remove loading spinner
    if let Some(loader) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("app-loading"))
    {
        loader.remove();
    }

    leptos::mount::mount_to_body(move || view! { <App config=config.clone() /> });
}
