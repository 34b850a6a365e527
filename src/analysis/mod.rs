//! Article analysis through a large-language-model provider.
//!
//! [`analyze_article`] sends the article to Gemini or an
//! OpenAI-compatible endpoint, as selected by [`AiSettings`], and decodes
//! the structured critique into an [`AnalysisResult`].
//!
//! ```no_run
//! use penpolish::analysis::{analyze_article, AiSettings, Provider};
//!
//! # async fn run() -> penpolish::Result<()> {
//! let settings = AiSettings::for_provider(Provider::OpenAi).with_api_key("sk-...");
//! let result = analyze_article("My title", "Article body", &settings).await?;
//! println!("{} / 100", result.scores.total);
//! # Ok(())
//! # }
//! ```

mod gemini;
mod openai;
mod prompt;
mod result;
mod settings;
mod tree;

pub use prompt::{build_prompt, response_schema, JSON_STRUCTURE_HINT, UNTITLED};
pub use result::{
    AnalysisResult, ArticleScores, Correction, CorrectionKind, NodeKind, StructureNode,
    TitleAnalysis, ViralPotential,
};
pub use settings::{AiSettings, Provider, SettingsStore};
pub use tree::{
    render_outline, walk_tree, LayoutNode, TreeLayout, TreeWalk, VisitedNode, MAX_TREE_DEPTH,
};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Reusable analysis client.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    client: reqwest::Client,
}

impl Analyzer {
    /// Create an analyzer with a default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Analyze one article.
    ///
    /// Fails without contacting the provider when the content is blank or
    /// no API key is configured. Provider errors are returned as-is; there
    /// is no retry.
    pub async fn analyze(
        &self,
        title: &str,
        content: &str,
        settings: &AiSettings,
    ) -> Result<AnalysisResult> {
        if content.trim().is_empty() {
            return Err(Error::EmptyContent);
        }
        if !settings.has_api_key() {
            return Err(Error::MissingApiKey);
        }
        settings.validate()?;

        let prompt = build_prompt(title, content, settings.provider);
        log::debug!(
            "Analyzing {} chars with {} ({})",
            content.chars().count(),
            settings.provider.name(),
            settings.effective_model()
        );

        let text = match settings.provider {
            Provider::Gemini => gemini::generate(&self.client, settings, &prompt).await?,
            Provider::OpenAi => openai::complete(&self.client, settings, &prompt).await?,
        };

        AnalysisResult::from_json(&text)
    }
}

/// Analyze one article with a fresh client.
pub async fn analyze_article(
    title: &str,
    content: &str,
    settings: &AiSettings,
) -> Result<AnalysisResult> {
    Analyzer::new().analyze(title, content, settings).await
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Error for a non-success response, preferring the provider's message.
fn api_error(provider: Provider, status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("{} request failed: {}", provider.name(), status));
    Error::Api(message)
}

async fn post_json<B: Serialize + ?Sized>(
    request: reqwest::RequestBuilder,
    body: &B,
    provider: Provider,
) -> Result<String> {
    let response = request.json(body).send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        log::debug!("{} returned {}", provider.name(), status);
        return Err(api_error(provider, status.as_u16(), &text));
    }
    Ok(text)
}
