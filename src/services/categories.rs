//! Job categories: payload normalization and chip mapping.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::chips::{Chip, ChipId, ChipSource};

/// A selectable job category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub id: Option<i64>,
    pub name: String,
    /// Display label, usually `"{name} ({count})"`
    pub label: String,
    pub count: Option<u64>,
}

impl CategoryOption {
    pub fn new(id: i64, name: impl Into<String>, count: u64) -> Self {
        let name = name.into();
        Self {
            id: Some(id),
            label: format!("{name} ({count})"),
            name,
            count: Some(count),
        }
    }

    /// Build an option from a bare label such as `"Engineering (12)"`.
    pub fn from_label(raw: &str) -> Self {
        let (name, count) = split_count_suffix(raw);
        Self {
            id: None,
            name: name.to_string(),
            label: raw.to_string(),
            count,
        }
    }
}

/// Split a trailing `" (N)"` off a label
fn split_count_suffix(raw: &str) -> (&str, Option<u64>) {
    let trimmed = raw.trim_end();
    if let Some(inner) = trimmed.strip_suffix(')') {
        if let Some(open) = inner.rfind('(') {
            let digits = &inner[open + 1..];
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return (inner[..open].trim(), digits.parse().ok());
            }
        }
    }
    (raw.trim(), None)
}

/// Normalize the loosely shaped categories payload.
///
/// The list is taken from `categories`, `items` or `data` (first present),
/// or the payload itself when it is an array. Object entries without an
/// integer id or a name are dropped; plain string entries are read as labels
/// and carry no id.
pub fn parse_categories(payload: &Value) -> Vec<CategoryOption> {
    let list = ["categories", "items", "data"]
        .iter()
        .find_map(|key| payload.get(key).filter(|v| !v.is_null()))
        .unwrap_or(payload);

    let Some(entries) = list.as_array() else {
        return Vec::new();
    };

    entries.iter().filter_map(parse_entry).collect()
}

fn parse_entry(entry: &Value) -> Option<CategoryOption> {
    if let Some(raw) = entry.as_str() {
        return Some(CategoryOption::from_label(raw)).filter(|o| !o.name.is_empty());
    }
    // A zero id is treated as missing
    let id = entry.get("id").and_then(Value::as_i64).filter(|id| *id != 0)?;
    let name = ["name", "category", "categoryName"]
        .iter()
        .filter_map(|key| entry.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())?;
    let count = ["numberOfJobs", "jobCount", "count"]
        .iter()
        .filter_map(|key| entry.get(key))
        .find(|v| v.is_number())
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
        .unwrap_or(0);

    Some(CategoryOption::new(id, name, count))
}

/// Chip representing `option`
pub fn category_chip(option: &CategoryOption) -> Chip {
    let id = match option.id {
        Some(id) => ChipId::Number(id),
        None => ChipId::Key(format!("cat-{}", option.name)),
    };
    Chip::new(id, option.label.clone(), option.name.clone()).with_source(ChipSource::Category(option.clone()))
}

/// Option matching a category given as an id or a name (e.g. from the URL)
pub fn preselect_category<'a>(raw: &str, options: &'a [CategoryOption]) -> Option<&'a CategoryOption> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i64>() {
        Ok(id) => options.iter().find(|o| o.id == Some(id)),
        Err(_) => options.iter().find(|o| o.name == raw || o.label == raw),
    }
}

/// Category ids for the selected chips, unique and in chip order.
///
/// Numeric chip ids are used directly; other chips are matched by name or
/// label against the known options.
pub fn resolve_category_ids(chips: &[Chip], options: &[CategoryOption]) -> Vec<i64> {
    let mut ids = Vec::new();
    for chip in chips {
        let id = chip.id.as_number().filter(|id| *id != 0).or_else(|| {
            options
                .iter()
                .find(|o| o.name == chip.value || o.label == chip.label)
                .and_then(|o| o.id)
        });
        if let Some(id) = id {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}
