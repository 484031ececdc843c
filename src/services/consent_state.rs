//! Consent state shared through Leptos context.
//!
//! Wraps the browser-backed [`ConsentManager`] and mirrors what the views
//! need into signals.

use leptos::prelude::*;

use crate::bindings::{BrowserStorage, GtagSignal};
use crate::services::consent::{ConsentChoice, ConsentManager, ConsentRecord, ConsentStatus};

type BrowserConsentManager = ConsentManager<BrowserStorage, GtagSignal>;

#[derive(Clone, Copy)]
pub struct ConsentState {
    manager: StoredValue<BrowserConsentManager, LocalStorage>,
    pub consent: RwSignal<Option<ConsentRecord>>,
    pub status: RwSignal<ConsentStatus>,
    pub manager_open: RwSignal<bool>,
}

impl ConsentState {
    /// Load saved consent from local storage
    pub fn new() -> Self {
        let manager = ConsentManager::load(BrowserStorage, GtagSignal);
        Self {
            consent: RwSignal::new(manager.consent().cloned()),
            status: RwSignal::new(manager.status()),
            manager_open: RwSignal::new(manager.is_manager_open()),
            manager: StoredValue::new_local(manager),
        }
    }

    /// Whether the consent banner should be on screen
    pub fn should_show(&self) -> bool {
        self.manager_open.get() || self.status.get() == ConsentStatus::Unknown
    }

    pub fn open_manager(&self) {
        self.apply(|m| m.open_manager());
    }

    pub fn close_manager(&self) {
        self.apply(|m| m.close_manager());
    }

    pub fn update_consent(&self, choice: ConsentChoice) {
        self.apply(|m| m.update_consent(choice));
    }

    pub fn reset_consent(&self) {
        self.apply(|m| m.reset_consent());
    }

    fn apply(&self, change: impl FnOnce(&mut BrowserConsentManager)) {
        let snapshot = self.manager.try_update_value(|m| {
            change(m);
            (m.consent().cloned(), m.status(), m.is_manager_open())
        });
        if let Some((consent, status, open)) = snapshot {
            self.consent.set(consent);
            self.status.set(status);
            self.manager_open.set(open);
        }
    }
}

impl Default for ConsentState {
    fn default() -> Self {
        Self::new()
    }
}

/// Provide ConsentState to the component tree
pub fn provide_consent_state() {
    provide_context(ConsentState::new());
}

/// Retrieve the ConsentState from context
pub fn use_consent_state() -> ConsentState {
    expect_context::<ConsentState>()
}
