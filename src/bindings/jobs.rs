use serde::{Deserialize, Serialize};

use super::core::fetch_json;
use crate::error::ApiError;
use crate::services::search_params::SearchParams;

/// A job posting as listed by the API
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobPost {
    #[serde(rename = "jobID", alias = "jobId", alias = "id")]
    pub job_id: Option<i64>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_location: Option<String>,
    pub job_url: Option<String>,
    pub job_description: Option<String>,
    /// ISO date-time string as sent by the API
    pub published: Option<String>,
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobPage {
    pub items: Vec<JobPost>,
    pub total_count: u64,
}

fn page_query(page: u32, page_size: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("pageSize", page_size.to_string())]
}

/// Unfiltered listing, newest first
pub async fn list_job_posts(base_url: &str, page: u32, page_size: u32) -> Result<JobPage, ApiError> {
    let result: Option<JobPage> =
        fetch_json(base_url, "/api/jobindexposts", &page_query(page, page_size)).await?;
    Ok(result.unwrap_or_default())
}

/// Filtered search
pub async fn search_job_posts(
    base_url: &str,
    params: &SearchParams,
    page: u32,
    page_size: u32,
) -> Result<JobPage, ApiError> {
    let mut query = params.query_pairs();
    query.extend(page_query(page, page_size));
    let result: Option<JobPage> = fetch_json(base_url, "/api/jobindexposts/search", &query).await?;
    Ok(result.unwrap_or_default())
}
