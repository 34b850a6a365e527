//! Google Gemini `generateContent` client.

use super::prompt::response_schema;
use super::settings::{AiSettings, Provider};
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Request URL for `model` on `base_url` (empty for the public endpoint).
pub fn endpoint(base_url: &str, model: &str) -> String {
    let base = match base_url.trim().trim_end_matches('/') {
        "" => DEFAULT_BASE_URL,
        base => base,
    };
    format!("{}/v1beta/models/{}:generateContent", base, model)
}

/// Request body asking for JSON that follows the analysis schema.
pub fn request_body(prompt: &str) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

/// Concatenated text of the first candidate.
pub fn extract_text(body: &str) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| Error::InvalidResponse(format!("Gemini response: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::EmptyResponse(Provider::Gemini.name().to_string()));
    }
    Ok(text)
}

pub(super) async fn generate(
    client: &reqwest::Client,
    settings: &AiSettings,
    prompt: &str,
) -> Result<String> {
    let url = endpoint(&settings.base_url, settings.effective_model());
    log::debug!("Gemini request to {}", url);

    let request = client
        .post(&url)
        .header("x-goog-api-key", settings.api_key.trim());
    let body = super::post_json(request, &request_body(prompt), Provider::Gemini).await?;
    extract_text(&body)
}
