//! Consent State
//!
//! Cookie / ad consent as a small state machine over two injected ports:
//! a string key-value store for persistence and a sink that receives the
//! derived consent signals (Google consent mode). Nothing here touches the
//! browser directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Local storage key holding the saved record
pub const CONSENT_STORAGE_KEY: &str = "fj-consent-preferences";

// ============================================================================
// Records
// ============================================================================

/// Saved consent preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    /// Always true for a valid record
    pub necessary: bool,
    pub ads: bool,
    pub analytics: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ConsentRecord {
    pub fn new(choice: ConsentChoice, updated_at: DateTime<Utc>) -> Self {
        Self {
            necessary: true,
            ads: choice.ads,
            analytics: choice.analytics,
            updated_at: Some(updated_at),
        }
    }

    /// Parse a stored record. Anything malformed, including a record that
    /// does not mark necessary cookies as on, counts as no record.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str::<Self>(raw)
            .ok()
            .filter(|record| record.necessary)
    }

    pub fn encode(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn choice(&self) -> ConsentChoice {
        ConsentChoice {
            ads: self.ads,
            analytics: self.analytics,
        }
    }
}

/// The two optional categories a user decides on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsentChoice {
    pub ads: bool,
    pub analytics: bool,
}

impl ConsentChoice {
    pub const ACCEPT_ALL: Self = Self { ads: true, analytics: true };
    pub const REJECT_ALL: Self = Self { ads: false, analytics: false };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentStatus {
    /// No valid record; the user must be asked
    Unknown,
    Saved,
}

// ============================================================================
// Signals
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grant {
    Granted,
    Denied,
}

impl From<bool> for Grant {
    fn from(value: bool) -> Self {
        if value {
            Grant::Granted
        } else {
            Grant::Denied
        }
    }
}

/// Consent-mode values sent to the ad/analytics tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentSignals {
    pub ad_storage: Grant,
    pub ad_user_data: Grant,
    pub ad_personalization: Grant,
    pub analytics_storage: Grant,
    pub functionality_storage: Grant,
    pub security_storage: Grant,
}

impl ConsentSignals {
    pub fn from_choice(choice: ConsentChoice) -> Self {
        let ads = Grant::from(choice.ads);
        Self {
            ad_storage: ads,
            ad_user_data: ads,
            ad_personalization: ads,
            analytics_storage: Grant::from(choice.analytics),
            functionality_storage: Grant::Granted,
            security_storage: Grant::Granted,
        }
    }

    /// Signals while nothing has been decided
    pub fn default_deny() -> Self {
        Self::from_choice(ConsentChoice::REJECT_ALL)
    }
}

// ============================================================================
// Ports
// ============================================================================

/// Persistent string key-value storage
pub trait ConsentStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Receiver of consent signal updates
pub trait ConsentSignalSink {
    fn notify(&self, signals: &ConsentSignals);
}

// ============================================================================
// Manager
// ============================================================================

pub struct ConsentManager<S, K> {
    storage: S,
    sink: K,
    consent: Option<ConsentRecord>,
    manager_open: bool,
}

impl<S: ConsentStorage, K: ConsentSignalSink> ConsentManager<S, K> {
    /// Restore saved consent and push the effective signals to `sink`.
    ///
    /// Storage failures and malformed records both leave consent unknown,
    /// which opens the manager.
    pub fn load(storage: S, sink: K) -> Self {
        let consent = match storage.get(CONSENT_STORAGE_KEY) {
            Ok(Some(raw)) => {
                let record = ConsentRecord::decode(&raw);
                if record.is_none() {
                    tracing::debug!("ignoring malformed consent record");
                }
                record
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read consent");
                None
            }
        };

        let manager = Self {
            manager_open: consent.is_none(),
            storage,
            sink,
            consent,
        };
        manager.propagate();
        manager
    }

    pub fn status(&self) -> ConsentStatus {
        if self.consent.is_some() {
            ConsentStatus::Saved
        } else {
            ConsentStatus::Unknown
        }
    }

    pub fn consent(&self) -> Option<&ConsentRecord> {
        self.consent.as_ref()
    }

    pub fn is_manager_open(&self) -> bool {
        self.manager_open
    }

    /// The prompt stays up until a choice exists
    pub fn should_show_manager(&self) -> bool {
        self.manager_open || self.consent.is_none()
    }

    pub fn open_manager(&mut self) {
        self.manager_open = true;
    }

    pub fn close_manager(&mut self) {
        self.manager_open = false;
    }

    /// Effective signals; default-deny until a choice is saved
    pub fn signals(&self) -> ConsentSignals {
        self.consent
            .as_ref()
            .map(|record| ConsentSignals::from_choice(record.choice()))
            .unwrap_or_else(ConsentSignals::default_deny)
    }

    pub fn update_consent(&mut self, choice: ConsentChoice) {
        self.update_consent_at(choice, Utc::now());
    }

    /// Replace the record, persist it, close the manager and propagate.
    ///
    /// A failed write is logged; the in-memory choice still applies.
    pub fn update_consent_at(&mut self, choice: ConsentChoice, now: DateTime<Utc>) {
        let record = ConsentRecord::new(choice, now);
        if let Err(e) = record
            .encode()
            .and_then(|raw| self.storage.set(CONSENT_STORAGE_KEY, &raw))
        {
            tracing::warn!(error = %e, "could not persist consent");
        }
        tracing::info!(ads = choice.ads, analytics = choice.analytics, "consent updated");

        self.consent = Some(record);
        self.manager_open = false;
        self.propagate();
    }

    /// Forget the saved choice and ask again
    pub fn reset_consent(&mut self) {
        if let Err(e) = self.storage.remove(CONSENT_STORAGE_KEY) {
            tracing::warn!(error = %e, "could not clear consent");
        }
        self.consent = None;
        self.manager_open = true;
        self.propagate();
    }

    fn propagate(&self) {
        self.sink.notify(&self.signals());
    }
}
