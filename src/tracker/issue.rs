use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ranking::Candidate;

/// A tracked work item eligible for ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerIssue {
    pub issue_id: i64,
    pub key: String,
    pub summary: String,
    pub description: String,
    pub issue_type: String,
    pub url: String,
}

impl Candidate for TrackerIssue {
    fn textual_representation(&self) -> String {
        format!(
            "KEY: {} \n SUMMARY: {} \n DESCRIPTION: {}",
            self.key, self.summary, self.description
        )
    }
}

/// True for keys shaped like `PROJ-123`: an uppercase letter, then uppercase letters,
/// digits or underscores, a dash, and one or more digits.
pub fn is_valid_issue_key(key: &str) -> bool {
    let Some((project, number)) = key.split_once('-') else {
        return false;
    };

    let mut chars = project.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    starts_with_letter
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit())
}

/// Flattens a description field to plain text.
///
/// Rich-text documents contribute every `text` node depth-first, each followed by a space,
/// and the result is trimmed. `null` becomes empty; plain strings pass through.
pub fn flatten_description(raw: Option<&Value>) -> String {
    match raw {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(doc)) => {
            let mut out = String::new();
            if let Some(Value::Array(content)) = doc.get("content") {
                collect_text(content, &mut out);
            }
            out.trim().to_string()
        }
        Some(other) => other.to_string(),
    }
}

fn collect_text(nodes: &[Value], out: &mut String) {
    for node in nodes {
        if node.get("type").and_then(Value::as_str) == Some("text")
            && let Some(text) = node.get("text").and_then(Value::as_str)
        {
            out.push_str(text);
            out.push(' ');
        }
        if let Some(Value::Array(children)) = node.get("content") {
            collect_text(children, out);
        }
    }
}

/// Builds a one-paragraph rich-text document around `text`.
pub fn comment_document(text: &str) -> Value {
    serde_json::json!({
        "body": {
            "type": "doc",
            "version": 1,
            "content": [
                {
                    "type": "paragraph",
                    "content": [
                        { "type": "text", "text": text }
                    ]
                }
            ]
        }
    })
}
