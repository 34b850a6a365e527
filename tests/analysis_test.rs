//! Integration tests for analysis decoding, settings and the structure tree.

use penpolish::analysis::{
    render_outline, walk_tree, AiSettings, AnalysisResult, CorrectionKind, NodeKind, Provider,
    SettingsStore, StructureNode, TreeLayout, ViralPotential, MAX_TREE_DEPTH,
};
use penpolish::Error;

const RESPONSE: &str = r#"{
    "scores": { "total": 78, "readability": 85, "logic": 72, "emotion": 64, "creativity": 70 },
    "summary": "An essay on slow mornings.",
    "toneAnalysis": "Reflective",
    "keywords": ["mornings", "routine", "focus"],
    "corrections": [
        { "original": "its", "suggestion": "it's", "reason": "Contraction", "type": "grammar", "location_snippet": "and its fine" },
        { "original": "Hello ,", "suggestion": "Hello,", "reason": "Spacing", "type": "punctuation", "location_snippet": "Hello , world" }
    ],
    "titleAnalysis": {
        "score": 55, "viralPotential": "Low", "critique": "Too generic",
        "suggestions": ["Add a number"], "examples": ["5 Reasons to Wake Up Slowly"]
    },
    "structure": {
        "name": "Slow mornings", "type": "root",
        "children": [
            { "name": "Why rush hurts", "type": "main_point",
              "children": [ { "name": "Cortisol study", "type": "evidence", "description": "2019 data" } ] },
            { "name": "Try it", "type": "conclusion" }
        ]
    },
    "polishedContent": "Slow mornings, revised."
}"#;

#[test]
fn test_decode_provider_response() {
    let result = AnalysisResult::from_json(RESPONSE).unwrap();

    assert_eq!(result.scores.total, 78.0);
    assert_eq!(result.keywords.len(), 3);
    assert_eq!(result.corrections[1].kind, CorrectionKind::Punctuation);
    assert_eq!(result.title_analysis.viral_potential, ViralPotential::Low);
    assert_eq!(result.polished_content, "Slow mornings, revised.");
    assert_eq!(
        result.structure.children[0].children[0].description.as_deref(),
        Some("2019 data")
    );
}

#[test]
fn test_decode_rejects_missing_required_field() {
    let mut value: serde_json::Value = serde_json::from_str(RESPONSE).unwrap();
    value["titleAnalysis"]
        .as_object_mut()
        .unwrap()
        .remove("viralPotential");

    let err = AnalysisResult::from_json(&value.to_string()).unwrap_err();
    assert!(matches!(err, Error::InvalidResponse(_)));
}

#[test]
fn test_decode_rejects_wrong_types() {
    let text = RESPONSE.replace("\"total\": 78", "\"total\": \"high\"");
    assert!(matches!(
        AnalysisResult::from_json(&text),
        Err(Error::InvalidResponse(_))
    ));
    assert!(matches!(
        AnalysisResult::from_json("not json at all"),
        Err(Error::InvalidResponse(_))
    ));
}

#[test]
fn test_decode_rejects_absurdly_deep_tree() {
    let depth = 200;
    let mut json = String::new();
    for _ in 0..depth {
        json.push_str(r#"{"name":"n","type":"sub_point","children":["#);
    }
    json.push_str(r#"{"name":"leaf"}"#);
    for _ in 0..depth {
        json.push_str("]}");
    }

    let result: Result<StructureNode, _> = serde_json::from_str(&json);
    assert!(result.is_err());
}

#[test]
fn test_tree_from_response() {
    let result = AnalysisResult::from_json(RESPONSE).unwrap();

    let walk = walk_tree(&result.structure);
    assert_eq!(walk.nodes.len(), 4);
    assert_eq!(walk.truncated, 0);

    let layout = TreeLayout::for_width(&result.structure, 960.0);
    assert_eq!(layout.nodes.len(), 4);
    assert_eq!(layout.nodes[0].kind, NodeKind::Root);

    let svg = layout.to_svg();
    assert!(svg.contains("<title>Cortisol study\n2019 data</title>"));

    let outline = render_outline(&result.structure);
    assert!(outline.starts_with("- Slow mornings [root]\n"));
    assert!(outline.contains("    - Cortisol study [evidence]: 2019 data\n"));
}

#[test]
fn test_tree_deeper_than_cap_is_truncated() {
    let mut node = StructureNode::new("bottom", NodeKind::Evidence);
    for level in 0..MAX_TREE_DEPTH + 9 {
        node = StructureNode::new(format!("level {}", level), NodeKind::SubPoint).with_child(node);
    }

    let walk = walk_tree(&node);
    assert_eq!(walk.nodes.len(), MAX_TREE_DEPTH);
    assert_eq!(walk.truncated, 10);

    let layout = TreeLayout::for_width(&node, 800.0);
    assert_eq!(layout.nodes.len(), MAX_TREE_DEPTH);
    assert_eq!(layout.truncated, 10);
}

#[test]
fn test_settings_store_round_trip_and_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(SettingsStore::FILE_NAME);
    let store = SettingsStore::new(&path);

    let saved = AiSettings::for_provider(Provider::OpenAi)
        .with_api_key("sk-abc")
        .with_model("gpt-4o");
    store.save(&saved).unwrap();
    assert_eq!(store.load(), saved);

    std::fs::write(&path, "[1, 2, 3]").unwrap();
    assert_eq!(store.load(), AiSettings::default());
}

#[tokio::test]
async fn test_analyze_rejects_blank_article() {
    let settings = AiSettings::default().with_api_key("key");
    let err = penpolish::analyze_article("title", "   ", &settings)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmptyContent));
}
