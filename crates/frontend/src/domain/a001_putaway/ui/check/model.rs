//! Put-away check - API layer

use super::view_model::PutAwayApi;
use crate::shared::api_utils::api_url;
use async_trait::async_trait;
use contracts::domain::a001_putaway::PutAway;
use contracts::shared::request_codec::{flatten_request, parse_response};
use gloo_net::http::Request;
use serde::Deserialize;

const PUTAWAYS_PATH: &str = "/openboxes/api/putaways";

/// Response envelope: the put-away comes back under `data`
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    data: serde_json::Value,
}

/// Path of the completion request, scoped by location
pub fn completion_path(location_id: &str) -> String {
    format!(
        "{}?location.id={}",
        PUTAWAYS_PATH,
        urlencoding::encode(location_id)
    )
}

/// Request body: the put-away in path-key form
pub fn encode_completion_body(put_away: &PutAway) -> Result<serde_json::Value, String> {
    let value = serde_json::to_value(put_away)
        .map_err(|e| format!("Failed to serialize put-away: {}", e))?;
    Ok(flatten_request(&value))
}

pub fn decode_completion_body(text: &str) -> Result<PutAway, String> {
    let envelope: ApiEnvelope =
        serde_json::from_str(text).map_err(|e| format!("Failed to parse response: {}", e))?;
    let value = parse_response(envelope.data).map_err(|e| format!("Bad response data: {}", e))?;
    serde_json::from_value(value).map_err(|e| format!("Failed to parse put-away: {}", e))
}

pub async fn post_completion(location_id: &str, put_away: &PutAway) -> Result<PutAway, String> {
    let url = api_url(&completion_path(location_id));
    let body = encode_completion_body(put_away)?;

    let response = Request::post(&url)
        .json(&body)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send: {}", e))?;

    if !response.ok() {
        return Err(format!("Server error: {}", response.status()));
    }

    let text = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;
    decode_completion_body(&text)
}

/// `PutAwayApi` over the browser fetch API
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpPutAwayApi;

#[async_trait(?Send)]
impl PutAwayApi for HttpPutAwayApi {
    async fn complete_put_away(
        &self,
        location_id: &str,
        put_away: &PutAway,
    ) -> Result<PutAway, String> {
        post_completion(location_id, put_away).await
    }
}
