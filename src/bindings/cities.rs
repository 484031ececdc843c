use async_trait::async_trait;

use super::core::fetch_json;
use crate::error::ApiError;
use crate::services::suggestions::{Location, LocationLookup};

/// City lookups against the REST API
#[derive(Debug, Clone)]
pub struct ApiLocationLookup {
    base_url: String,
}

impl ApiLocationLookup {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait(?Send)]
impl LocationLookup for ApiLocationLookup {
    async fn top_locations(&self) -> Result<Vec<Location>, ApiError> {
        let cities: Option<Vec<Location>> = fetch_json(&self.base_url, "/api/cities", &[]).await?;
        Ok(cities.unwrap_or_default())
    }

    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ApiError> {
        let cities: Option<Vec<Location>> = fetch_json(
            &self.base_url,
            "/api/cities/search",
            &[("query", query.to_string())],
        )
        .await?;
        Ok(cities.unwrap_or_default())
    }
}
