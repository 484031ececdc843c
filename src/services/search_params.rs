//! Search form state and the parameters it submits.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::categories::{resolve_category_ids, CategoryOption};
use crate::services::chips::Chip;
use crate::services::dates::{parse_danish_date, to_api_date};

/// Filters sent to the job search endpoint. Empty filters are absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_terms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<Vec<i64>>,
    /// Serialized as `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_after: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_before: Option<NaiveDate>,
}

impl SearchParams {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Only the category filter, as used when arriving with `?category=`
    pub fn for_category(id: i64) -> Self {
        Self {
            category_ids: Some(vec![id]),
            ..Self::default()
        }
    }

    /// Query-string pairs; list filters repeat their key
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for term in self.search_terms.iter().flatten() {
            pairs.push(("searchTerms", term.clone()));
        }
        for location in self.locations.iter().flatten() {
            pairs.push(("locations", location.clone()));
        }
        for id in self.category_ids.iter().flatten() {
            pairs.push(("categoryIds", id.to_string()));
        }
        if let Some(date) = self.posted_after {
            pairs.push(("postedAfter", to_api_date(date)));
        }
        if let Some(date) = self.posted_before {
            pairs.push(("postedBefore", to_api_date(date)));
        }
        pairs
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

/// Chip values plus the un-committed text, if it adds something
fn values_with_pending(chips: &[Chip], pending: &str) -> Vec<String> {
    let mut values: Vec<String> = chips
        .iter()
        .map(|c| c.value.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();

    let pending = pending.trim().trim_end_matches(',').trim();
    let lowered = pending.to_lowercase();
    if !pending.is_empty() && !values.iter().any(|v| v.to_lowercase() == lowered) {
        values.push(pending.to_string());
    }
    values
}

/// Everything the search form holds between submits
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchFormState {
    pub search_terms: Vec<Chip>,
    /// Text typed in the search-term input but not turned into a chip
    pub pending_term: String,
    pub locations: Vec<Chip>,
    pub pending_location: String,
    pub categories: Vec<Chip>,
    /// Raw `dd/mm/yyyy` input
    pub posted_after: String,
    pub posted_before: String,
}

impl SearchFormState {
    /// Build the submitted parameters.
    ///
    /// Invalid dates are left out rather than blocking the search.
    pub fn to_params(&self, options: &[CategoryOption]) -> SearchParams {
        SearchParams {
            search_terms: non_empty(values_with_pending(&self.search_terms, &self.pending_term)),
            locations: non_empty(values_with_pending(&self.locations, &self.pending_location)),
            category_ids: non_empty(resolve_category_ids(&self.categories, options)),
            posted_after: parse_danish_date(&self.posted_after),
            posted_before: parse_danish_date(&self.posted_before),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
