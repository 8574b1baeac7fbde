//! Prompt construction for the explanation model.
//!
//! Three-message chat payload: fixed behavior rules, an authoritative context
//! block carrying the project framing plus the computed results, and the user
//! task (summary mode or Q&A mode). The computed results are embedded as JSON
//! and declared authoritative; the model is told not to invent measurements
//! or compliance outcomes.

use serde::Serialize;

use crate::services::InsightContext;

/// One chat message in the OpenAI-compatible wire format.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

const SYSTEM_RULES: &str = "\
You are a technical assistant specialized in circadian lighting and WELL v2 (L04/L05). \
Use ONLY the provided data and definitions. \
Do NOT invent measurements, timestamps, thresholds, standards, or compliance results. \
If information is missing or insufficient, state it explicitly and explain what would be needed.\n\n\
Output format rules:\n\
- If no user question is provided: return JSON with keys: \"summary\", \"recommendations\".\n\
- If a user question is provided: return JSON with keys: \"answer\", \"notes\".\n\
- \"summary\" must be <= 120 words.\n\
- \"recommendations\" must be an array of exactly 3 short items.\n\
- Never include raw rows, time series dumps, or unnecessary numerical detail.\n\
- When referencing WELL v2, focus on L04 and optionally mention L05 only as a stricter extension.";

const PROJECT_CONTEXT: &str = "\
PROJECT CONTEXT (AUTHORITATIVE — DO NOT IGNORE):\n\n\
Project name: LightWell.\n\
LightWell is a wearable-based circadian lighting assessment system.\n\
It does NOT directly control luminaires.\n\
Lighting control logic is implemented separately at the firmware level.\n\n\
This backend:\n\
- estimates melanopic EDI from calibrated sensors,\n\
- evaluates compliance with WELL v2 (L04),\n\
- summarizes results and explains them to the user.\n\n\
The LLM is used ONLY for interpretation and explanation.\n\
All compliance decisions are computed deterministically in software, not by the LLM.\n\n\
------------------------------------------------------------\n\
WELL v2 - L04 (Circadian Lighting Design) — DEFINITION:\n\n\
WELL L04 is a building and human health standard related to circadian lighting.\n\
It is NOT related to oil, gas, drilling, or industrial well control.\n\n\
Purpose:\n\
Support circadian entrainment by ensuring sufficient morning exposure to melanopic light.\n\n\
Metric:\n\
- melanopic EDI (CIE S 026).\n\n\
Core requirement:\n\
- A continuous 4-hour window ending before local noon.\n\
- The melanopic EDI threshold must be maintained continuously.\n\
- Averages or accumulated dose are NOT sufficient.\n\n\
Thresholds:\n\
- Tier 1: >= 136 melanopic EDI.\n\
- Tier 2: >= 250 melanopic EDI.\n\n\
Interpretation:\n\
- If no valid continuous 4-hour window exists, the day is non-compliant.\n\
- WELL L04 does NOT define night-time limits.\n\
- Night-time reduction is a design choice, not a direct L04 requirement.\n\n\
------------------------------------------------------------\n\
DATA CONTEXT:\n\n\
Measurements are stored in UTC; compliance days are local calendar days under the configured offset.\n\n\
Computed outputs (authoritative, already validated):";

/// Build the chat payload for a summary or Q&A request.
pub fn build_messages(context: &InsightContext, question: Option<&str>) -> Vec<ChatMessage> {
    let context_json =
        serde_json::to_string(context).unwrap_or_else(|_| "{}".to_string());

    let context_block = format!("{}\n{}\n", PROJECT_CONTEXT, context_json);

    let user_task = match question.map(str::trim).filter(|q| !q.is_empty()) {
        Some(question) => format!(
            "User question:\n{}\n\n\
             Answer using ONLY the project and WELL L04 context above and the computed outputs. \
             If the question cannot be answered from the data, state clearly what is missing.\n\
             Return JSON with keys: \"answer\", \"notes\".",
            question
        ),
        None => "Generate:\n\
                 1) A short summary (<= 120 words) describing the circadian lighting situation \
                 and WELL L04 compliance status.\n\
                 2) Exactly 3 actionable recommendations to improve or maintain WELL L04 compliance.\n\
                 Return JSON with keys: \"summary\", \"recommendations\"."
            .to_string(),
    };

    vec![
        ChatMessage {
            role: "system",
            content: SYSTEM_RULES.to_string(),
        },
        ChatMessage {
            role: "system",
            content: context_block,
        },
        ChatMessage {
            role: "user",
            content: user_task,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{SampleSeries, TimeRange};
    use crate::services::{analyze_range, build_insight_context};
    use chrono::{TimeZone, Utc};

    fn context() -> InsightContext {
        let range = TimeRange::new(
            Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).unwrap(),
        )
        .unwrap();
        build_insight_context(
            &range,
            analyze_range(&SampleSeries::empty(), &EngineConfig::default()),
        )
    }

    #[test]
    fn test_summary_mode_message_shape() {
        let messages = build_messages(&context(), None);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "system");
        assert_eq!(messages[2].role, "user");
        assert!(messages[2].content.contains("\"summary\""));
        assert!(messages[1].content.contains("Computed outputs"));
    }

    #[test]
    fn test_question_mode_embeds_question() {
        let messages = build_messages(&context(), Some("Was Tuesday compliant?"));
        assert!(messages[2].content.contains("Was Tuesday compliant?"));
        assert!(messages[2].content.contains("\"answer\""));
    }

    #[test]
    fn test_blank_question_falls_back_to_summary_mode() {
        let messages = build_messages(&context(), Some("   "));
        assert!(messages[2].content.contains("\"recommendations\""));
    }

    #[test]
    fn test_context_json_is_embedded() {
        let messages = build_messages(&context(), None);
        assert!(messages[1].content.contains("\"compliance\""));
    }
}
