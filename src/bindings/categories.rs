use serde_json::Value;

use super::core::fetch_json;
use crate::error::ApiError;
use crate::services::categories::{parse_categories, CategoryOption};

/// Job categories with their post counts
pub async fn fetch_job_categories(base_url: &str) -> Result<Vec<CategoryOption>, ApiError> {
    let payload: Value = fetch_json(base_url, "/api/jobindexposts/categories", &[]).await?;
    Ok(parse_categories(&payload))
}
