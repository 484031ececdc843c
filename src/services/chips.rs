//! Chip Collection
//!
//! Ordered set of confirmed selections inside a multi-value input.
//! Owns add/remove/dedup; knows nothing about rendering or suggestions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::services::categories::CategoryOption;
use crate::services::suggestions::Location;

// ============================================================================
// Types
// ============================================================================

/// Identity of a chip within one collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChipId {
    Number(i64),
    Key(String),
}

impl ChipId {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            ChipId::Number(n) => Some(*n),
            ChipId::Key(_) => None,
        }
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChipId::Number(n) => write!(f, "{n}"),
            ChipId::Key(k) => f.write_str(k),
        }
    }
}

impl From<i64> for ChipId {
    fn from(value: i64) -> Self {
        ChipId::Number(value)
    }
}

impl From<&str> for ChipId {
    fn from(value: &str) -> Self {
        ChipId::Key(value.to_string())
    }
}

/// Record a chip was created from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChipSource {
    Location(Location),
    Category(CategoryOption),
}

/// A confirmed selection (or a suggestion before it is selected)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chip {
    pub id: ChipId,
    /// Display text
    pub label: String,
    /// Value used for submission and filtering
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ChipSource>,
}

impl Chip {
    pub fn new(id: impl Into<ChipId>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: ChipSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Chip typed directly by the user.
    ///
    /// The id is derived from the lower-cased trimmed text, so the same text
    /// always maps to the same chip.
    pub fn free_text(text: &str) -> Self {
        let trimmed = text.trim();
        Self {
            id: ChipId::Key(free_text_key(trimmed)),
            label: trimmed.to_string(),
            value: trimmed.to_string(),
            source: None,
        }
    }
}

const FREE_TEXT_PREFIX: &str = "freetext-";

/// Namespaced key for free-text chips
pub fn free_text_key(text: &str) -> String {
    format!("{FREE_TEXT_PREFIX}{}", text.trim().to_lowercase())
}

/// How duplicates are detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupPolicy {
    /// Same `id` only
    #[default]
    ById,
    /// Same `id`, or same `value` ignoring case
    ByIdOrValue,
}

// ============================================================================
// Collection
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChipCollection {
    chips: Vec<Chip>,
    policy: DedupPolicy,
}

impl ChipCollection {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            chips: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    pub fn as_slice(&self) -> &[Chip] {
        &self.chips
    }

    pub fn to_vec(&self) -> Vec<Chip> {
        self.chips.clone()
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn last(&self) -> Option<&Chip> {
        self.chips.last()
    }

    /// Whether `candidate` duplicates a chip already in the collection
    pub fn excludes(&self, candidate: &Chip) -> bool {
        self.chips.iter().any(|chip| {
            chip.id == candidate.id
                || (self.policy == DedupPolicy::ByIdOrValue
                    && chip.value.to_lowercase() == candidate.value.to_lowercase())
        })
    }

    /// Append `item` unless it duplicates an existing chip.
    ///
    /// Returns `true` when the collection changed.
    pub fn add(&mut self, item: Chip) -> bool {
        if self.excludes(&item) {
            return false;
        }
        self.chips.push(item);
        true
    }

    pub fn remove(&mut self, id: &ChipId) -> bool {
        let before = self.chips.len();
        self.chips.retain(|chip| &chip.id != id);
        before != self.chips.len()
    }

    pub fn remove_last(&mut self) -> Option<Chip> {
        self.chips.pop()
    }

    /// Replace the whole collection, dropping duplicates while keeping the
    /// first occurrence of each.
    pub fn replace(&mut self, chips: Vec<Chip>) {
        self.chips.clear();
        for chip in chips {
            self.add(chip);
        }
    }

    pub fn clear(&mut self) {
        self.chips.clear();
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.chips.iter().map(|c| c.value.as_str())
    }
}
