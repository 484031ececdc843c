use serde::de::DeserializeOwned;
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::error::{js_message, ApiError};

// ============================================================================
// REST
// ============================================================================

/// Resolve `path` against the API origin and append query pairs in order.
///
/// Repeated keys are kept, which is how list filters are sent.
pub fn build_url(base: &str, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
    let mut url = Url::parse(base)?.join(path)?;
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
    }
    Ok(url)
}

/// GET a JSON resource from the API
pub async fn fetch_json<R: DeserializeOwned>(
    base: &str,
    path: &str,
    query: &[(&str, String)],
) -> Result<R, ApiError> {
    let url = build_url(base, path, query)?;
    let window = web_sys::window().ok_or(ApiError::NoWindow)?;

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url.as_str(), &init)
        .map_err(|e| ApiError::Network(js_message(&e)))?;
    request
        .headers()
        .set("Accept", "application/json")
        .map_err(|e| ApiError::Network(js_message(&e)))?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| ApiError::Network(js_message(&e)))?
        .dyn_into()
        .map_err(|e| ApiError::Decode(js_message(&e)))?;

    if !response.ok() {
        return Err(ApiError::Status {
            status: response.status(),
        });
    }

    let text = JsFuture::from(response.text().map_err(|e| ApiError::Decode(js_message(&e)))?)
        .await
        .map_err(|e| ApiError::Network(js_message(&e)))?
        .as_string()
        .unwrap_or_default();

    tracing::trace!(%url, bytes = text.len(), "api response");
    decode_body(&text)
}

/// Decode a response body; an empty body reads as JSON `null`
pub(crate) fn decode_body<R: DeserializeOwned>(text: &str) -> Result<R, ApiError> {
    let body = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
