//! Analysis result types, decoded strictly from the provider's JSON.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Full critique of one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub scores: ArticleScores,
    pub summary: String,
    pub keywords: Vec<String>,
    pub corrections: Vec<Correction>,
    pub title_analysis: TitleAnalysis,
    /// The full rewritten article
    pub polished_content: String,
    pub tone_analysis: String,
    /// Root of the logic-structure tree
    pub structure: StructureNode,
}

impl AnalysisResult {
    /// Decode a result from the JSON text returned by a provider.
    ///
    /// Any missing or malformed field is an [`Error::InvalidResponse`].
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text.trim()).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}

/// Scores out of 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArticleScores {
    pub total: f64,
    pub readability: f64,
    pub logic: f64,
    pub emotion: f64,
    pub creativity: f64,
}

/// One suggested fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub original: String,
    pub suggestion: String,
    pub reason: String,
    #[serde(rename = "type")]
    pub kind: CorrectionKind,
    /// Short context around the issue, used to locate it in the text
    pub location_snippet: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionKind {
    Grammar,
    Typo,
    Style,
    Punctuation,
}

impl CorrectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionKind::Grammar => "grammar",
            CorrectionKind::Typo => "typo",
            CorrectionKind::Style => "style",
            CorrectionKind::Punctuation => "punctuation",
        }
    }
}

/// Critique of the article title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleAnalysis {
    pub score: f64,
    pub viral_potential: ViralPotential,
    pub critique: String,
    /// Advice for improving the title
    pub suggestions: Vec<String>,
    /// Alternative titles
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViralPotential {
    High,
    Medium,
    Low,
}

impl ViralPotential {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViralPotential::High => "High",
            ViralPotential::Medium => "Medium",
            ViralPotential::Low => "Low",
        }
    }
}

/// A node of the logic-structure tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureNode {
    /// Concept or section title
    pub name: String,

    /// Node role; nodes without one are treated as sub-points
    #[serde(rename = "type", default)]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StructureNode>,
}

impl StructureNode {
    /// Create a node without description or children.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            children: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a child node.
    pub fn with_child(mut self, child: StructureNode) -> Self {
        self.children.push(child);
        self
    }

    /// Check if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    MainPoint,
    #[default]
    SubPoint,
    Evidence,
    Conclusion,
}

impl NodeKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::MainPoint => "main point",
            NodeKind::SubPoint => "sub-point",
            NodeKind::Evidence => "evidence",
            NodeKind::Conclusion => "conclusion",
        }
    }

    /// Fill color used when drawing the node.
    pub fn color(&self) -> &'static str {
        match self {
            NodeKind::Root => "#3b82f6",
            NodeKind::MainPoint => "#10b981",
            NodeKind::SubPoint => "#8b5cf6",
            NodeKind::Conclusion => "#f59e0b",
            NodeKind::Evidence => "#64748b",
        }
    }
}
