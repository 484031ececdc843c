//! Suggestion Sources
//!
//! Two ways of producing candidate chips for a partial input:
//! - local: substring filter over an in-memory list (categories)
//! - remote: async lookup through the [`LocationLookup`] port (locations)

use std::rc::Rc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::services::chips::{Chip, ChipId, ChipSource};

/// Upper bound on suggestions offered at once
pub const MAX_SUGGESTIONS: usize = 8;

// ============================================================================
// Local list
// ============================================================================

/// Candidates whose label or value contains `query`, ignoring case.
///
/// An empty query matches everything. Never allocates more than `max` chips.
pub fn filter_local(candidates: &[Chip], query: &str, max: usize) -> Vec<Chip> {
    let query = query.to_lowercase();
    candidates
        .iter()
        .filter(|c| {
            query.is_empty()
                || c.label.to_lowercase().contains(&query)
                || c.value.to_lowercase().contains(&query)
        })
        .take(max)
        .cloned()
        .collect()
}

// ============================================================================
// Remote lookup
// ============================================================================

/// City record as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Location {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Location {
    /// Chip for this location, or `None` when it has no usable name
    pub fn to_chip(&self) -> Option<Chip> {
        let name = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
        let key = match self.id {
            Some(id) => format!("city-{id}"),
            None => format!("city-{name}"),
        };
        Some(Chip::new(ChipId::Key(key), name, name).with_source(ChipSource::Location(self.clone())))
    }
}

/// Remote location reads
#[async_trait(?Send)]
pub trait LocationLookup {
    /// Default / most relevant locations, used for an empty query
    async fn top_locations(&self) -> Result<Vec<Location>, ApiError>;

    /// Locations matching a free-text query
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ApiError>;
}

#[async_trait(?Send)]
impl<T: LocationLookup + ?Sized> LocationLookup for Rc<T> {
    async fn top_locations(&self) -> Result<Vec<Location>, ApiError> {
        (**self).top_locations().await
    }

    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ApiError> {
        (**self).search_locations(query).await
    }
}

/// Remote-query suggestion source
pub struct RemoteSuggestions<L> {
    lookup: L,
    max: usize,
}

impl<L: LocationLookup> RemoteSuggestions<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            max: MAX_SUGGESTIONS,
        }
    }

    pub fn with_max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    /// Suggestions for `query`. Lookup failures degrade to an empty list.
    pub async fn suggest(&self, query: &str) -> Vec<Chip> {
        let query = query.trim();
        let result = if query.is_empty() {
            self.lookup.top_locations().await
        } else {
            self.lookup.search_locations(query).await
        };

        match result {
            Ok(locations) => locations
                .iter()
                .take(self.max)
                .filter_map(Location::to_chip)
                .collect(),
            Err(e) => {
                tracing::warn!(query, error = %e, "location lookup failed");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Highlighting
// ============================================================================

/// Split `text` around the first case-insensitive occurrence of `query`.
///
/// Returns `None` when there is nothing to highlight.
pub fn highlight<'a>(text: &'a str, query: &str) -> Option<(&'a str, &'a str, &'a str)> {
    if query.is_empty() || text.is_empty() {
        return None;
    }
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();

    // Walk char boundaries so multi-byte letters (æ, ø, å) never split
    for (start, _) in text.char_indices() {
        let mut matched = 0;
        for (offset, ch) in text[start..].char_indices() {
            let lowered: Vec<char> = ch.to_lowercase().collect();
            if needle.len() < matched + lowered.len()
                || needle[matched..matched + lowered.len()] != lowered[..]
            {
                break;
            }
            matched += lowered.len();
            if matched == needle.len() {
                let end = start + offset + ch.len_utf8();
                return Some((&text[..start], &text[start..end], &text[end..]));
            }
        }
    }
    None
}
