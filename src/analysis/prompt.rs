//! Prompt text and response schema for article analysis.

use super::settings::Provider;
use serde_json::{json, Value};

/// Title placeholder used when the article has none.
pub const UNTITLED: &str = "(untitled)";

/// System message for chat-completion providers.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful writing assistant. You must output only valid JSON.";

/// Shape description embedded in the prompt for providers without schema support.
pub const JSON_STRUCTURE_HINT: &str = r#"Please output a valid JSON object matching this structure exactly:
{
  "scores": { "total": number, "readability": number, "logic": number, "emotion": number, "creativity": number },
  "summary": string,
  "toneAnalysis": string,
  "keywords": string[],
  "corrections": [ { "original": string, "suggestion": string, "reason": string, "type": "grammar"|"typo"|"style"|"punctuation", "location_snippet": string } ],
  "titleAnalysis": { "score": number, "viralPotential": "High"|"Medium"|"Low", "critique": string, "suggestions": string[], "examples": string[] },
  "structure": { "name": string, "type": "root", "children": [ { "name": string, "type": "main_point"|"sub_point"|"evidence"|"conclusion", "description": string, "children": [] } ] },
  "polishedContent": string
}"#;

const SCHEMA_REMINDER: &str =
    "Return the result as JSON, and check carefully for typos and grammar problems.";

/// Build the analysis prompt for one article.
pub fn build_prompt(title: &str, content: &str, provider: Provider) -> String {
    let title = match title.trim() {
        "" => UNTITLED,
        t => t,
    };
    let format_note = match provider {
        Provider::OpenAi => JSON_STRUCTURE_HINT,
        Provider::Gemini => SCHEMA_REMINDER,
    };

    format!(
        "As a senior editor and content strategist, analyze and improve the following article.\n\
         Answer in the same language as the article.\n\
         \n\
         Title: {title}\n\
         Article:\n\
         {content}\n\
         \n\
         Complete these tasks:\n\
         1. Scores: rate overall, readability, logic, emotional resonance and creativity (0-100).\n\
         2. Summary: write a short summary.\n\
         3. Keywords: extract the main SEO keywords.\n\
         4. Corrections: find typos, grammar mistakes, punctuation errors and passages worth polishing.\n\
         5. Title analysis: judge how compelling the title is, give advice and alternative titles.\n\
         6. Logic structure: build a tree of the article's argument. The root is the core theme, \
         the first level holds the main points or sections, the second level holds supporting \
         evidence or details.\n\
         7. Polished text: provide a fully revised version of the article.\n\
         8. Tone: describe the article's current tone.\n\
         \n\
         {format_note}\n"
    )
}

/// Response schema sent to Gemini so the reply is structured JSON.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "scores": {
                "type": "OBJECT",
                "properties": {
                    "total": { "type": "NUMBER", "description": "Overall score out of 100" },
                    "readability": { "type": "NUMBER", "description": "Readability score out of 100" },
                    "logic": { "type": "NUMBER", "description": "Logic and structure score out of 100" },
                    "emotion": { "type": "NUMBER", "description": "Emotional engagement score out of 100" },
                    "creativity": { "type": "NUMBER", "description": "Creativity and uniqueness score out of 100" }
                },
                "required": ["total", "readability", "logic", "emotion", "creativity"]
            },
            "summary": { "type": "STRING", "description": "A concise summary of the article" },
            "toneAnalysis": { "type": "STRING", "description": "Description of the current tone" },
            "keywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Top 5-7 SEO keywords or key topics"
            },
            "corrections": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "original": { "type": "STRING", "description": "The original text segment containing the issue" },
                        "suggestion": { "type": "STRING", "description": "The corrected or improved version" },
                        "reason": { "type": "STRING", "description": "Why this change is recommended" },
                        "type": { "type": "STRING", "enum": ["grammar", "typo", "style", "punctuation"] },
                        "location_snippet": { "type": "STRING", "description": "About 10 characters of context before and after the issue" }
                    },
                    "required": ["original", "suggestion", "reason", "type", "location_snippet"]
                }
            },
            "titleAnalysis": {
                "type": "OBJECT",
                "properties": {
                    "score": { "type": "NUMBER", "description": "Title score out of 100" },
                    "viralPotential": { "type": "STRING", "enum": ["High", "Medium", "Low"] },
                    "critique": { "type": "STRING", "description": "Brief analysis of the current title" },
                    "suggestions": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "examples": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "3-5 better alternative titles"
                    }
                },
                "required": ["score", "viralPotential", "critique", "suggestions", "examples"]
            },
            "structure": {
                "type": "OBJECT",
                "description": "Logic tree: root is the main theme, children are main arguments, their children are supporting evidence.",
                "properties": {
                    "name": { "type": "STRING" },
                    "type": { "type": "STRING", "enum": ["root"] },
                    "children": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "name": { "type": "STRING" },
                                "type": { "type": "STRING", "enum": ["main_point", "sub_point", "evidence", "conclusion"] },
                                "description": { "type": "STRING" },
                                "children": {
                                    "type": "ARRAY",
                                    "items": {
                                        "type": "OBJECT",
                                        "properties": {
                                            "name": { "type": "STRING" },
                                            "type": { "type": "STRING" },
                                            "description": { "type": "STRING" }
                                        }
                                    }
                                }
                            },
                            "required": ["name", "type"]
                        }
                    }
                },
                "required": ["name", "type", "children"]
            },
            "polishedContent": { "type": "STRING", "description": "The fully rewritten article in the original voice" }
        },
        "required": [
            "scores", "summary", "keywords", "corrections",
            "titleAnalysis", "structure", "polishedContent", "toneAnalysis"
        ]
    })
}
