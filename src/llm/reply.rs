//! Reply shapes returned by the explanation model.
//!
//! The model is instructed to answer with a small JSON object, but in
//! practice replies arrive as fenced JSON, bare JSON, or loose prose. The
//! boundary closes over that variety with a two-variant type and one
//! normalization function; nothing downstream branches on raw model output.

use serde::{Deserialize, Serialize};

/// Structured reply fields. Summary/recommendations come from the summary
/// task, answer/notes from the Q&A task; all optional because the model is
/// not fully trusted to follow the format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Closed variant over everything the model may return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LlmReply {
    Structured(StructuredReply),
    PlainText(String),
}

impl LlmReply {
    /// Parse assistant message content: strip Markdown code fences, then try
    /// a strict JSON object; anything else is plain text.
    pub fn parse(content: &str) -> Self {
        let stripped = strip_code_fences(content.trim());

        match serde_json::from_str::<serde_json::Value>(stripped) {
            Ok(value) if value.is_object() => {
                match serde_json::from_value::<StructuredReply>(value) {
                    Ok(reply) => LlmReply::Structured(reply),
                    Err(_) => LlmReply::PlainText(stripped.to_string()),
                }
            }
            _ => LlmReply::PlainText(stripped.to_string()),
        }
    }

    /// Flatten the reply to a single human-readable string.
    pub fn to_display_string(&self) -> String {
        match self {
            LlmReply::PlainText(text) => text.clone(),
            LlmReply::Structured(reply) => {
                let mut parts = Vec::new();
                if let Some(summary) = &reply.summary {
                    parts.push(summary.clone());
                }
                if let Some(answer) = &reply.answer {
                    parts.push(answer.clone());
                }
                if let Some(recommendations) = &reply.recommendations {
                    for (i, item) in recommendations.iter().enumerate() {
                        parts.push(format!("{}. {}", i + 1, item));
                    }
                }
                if let Some(notes) = &reply.notes {
                    parts.push(notes.clone());
                }
                parts.join("\n")
            }
        }
    }
}

/// Remove a surrounding ``` / ```json fence, if present.
fn strip_code_fences(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };

    // Drop the fence line itself (may carry a language tag).
    let body = match rest.split_once('\n') {
        Some((_lang, body)) => body,
        None => return s,
    };

    body.trim_end()
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(s)
}
