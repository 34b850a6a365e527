//! OpenAI-compatible chat completions client.

use super::prompt::SYSTEM_PROMPT;
use super::settings::{AiSettings, Provider};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Request URL on `base_url` (empty for the public endpoint).
pub fn endpoint(base_url: &str) -> String {
    let base = match base_url.trim().trim_end_matches('/') {
        "" => DEFAULT_BASE_URL,
        base => base,
    };
    format!("{}/v1/chat/completions", base)
}

/// Request asking for a JSON object reply.
pub fn request_body<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
        response_format: ResponseFormat {
            format_type: "json_object",
        },
    }
}

/// Message content of the first choice.
pub fn extract_text(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| Error::InvalidResponse(format!("OpenAI response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| Error::EmptyResponse(Provider::OpenAi.name().to_string()))
}

pub(super) async fn complete(
    client: &reqwest::Client,
    settings: &AiSettings,
    prompt: &str,
) -> Result<String> {
    let url = endpoint(&settings.base_url);
    log::debug!("OpenAI request to {}", url);

    let request = client.post(&url).bearer_auth(settings.api_key.trim());
    let body = request_body(settings.effective_model(), prompt);
    let response = super::post_json(request, &body, Provider::OpenAi).await?;
    extract_text(&response)
}
