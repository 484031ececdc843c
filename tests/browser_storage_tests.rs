//! Local storage binding, run in a headless browser:
//!
//! ```bash
//! wasm-pack test --headless --firefox
//! ```

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use findjob_frontend::bindings::BrowserStorage;
use findjob_frontend::services::consent::{
    ConsentChoice, ConsentManager, ConsentSignalSink, ConsentSignals, ConsentStatus, ConsentStorage,
    CONSENT_STORAGE_KEY,
};

wasm_bindgen_test_configure!(run_in_browser);

struct NoopSink;

impl ConsentSignalSink for NoopSink {
    fn notify(&self, _signals: &ConsentSignals) {}
}

#[wasm_bindgen_test]
fn storage_round_trip() {
    let storage = BrowserStorage;
    storage.set("fj-test-key", "value").unwrap();
    assert_eq!(storage.get("fj-test-key").unwrap().as_deref(), Some("value"));

    storage.remove("fj-test-key").unwrap();
    assert_eq!(storage.get("fj-test-key").unwrap(), None);
}

#[wasm_bindgen_test]
fn consent_survives_reload() {
    BrowserStorage.remove(CONSENT_STORAGE_KEY).unwrap();

    let mut manager = ConsentManager::load(BrowserStorage, NoopSink);
    assert_eq!(manager.status(), ConsentStatus::Unknown);
    manager.update_consent(ConsentChoice { ads: true, analytics: false });

    let reloaded = ConsentManager::load(BrowserStorage, NoopSink);
    assert_eq!(reloaded.status(), ConsentStatus::Saved);
    assert_eq!(reloaded.signals(), ConsentSignals::from_choice(ConsentChoice { ads: true, analytics: false }));

    BrowserStorage.remove(CONSENT_STORAGE_KEY).unwrap();
}
