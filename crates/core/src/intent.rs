use crate::catalog::{guidance_for, INVALID_MESSAGE_REPLY, KEYWORD_RULES};
use crate::models::{Intent, Outcome};

/// Trims, collapses whitespace runs and lower-cases. The same normalized text
/// drives classification and is what gets forwarded to the model.
pub fn normalize_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn classify(raw: &str) -> Outcome {
    classify_normalized(&normalize_text(raw))
}

pub fn classify_normalized(normalized: &str) -> Outcome {
    if normalized.is_empty() {
        return Outcome::StaticReply {
            intent: Intent::EmptyMessage,
            text: INVALID_MESSAGE_REPLY.to_string(),
        };
    }

    if let Some(rule) = KEYWORD_RULES
        .iter()
        .find(|rule| contains_any(normalized, rule.keywords))
    {
        return Outcome::StaticReply {
            intent: rule.intent,
            text: rule.response.render(),
        };
    }

    if let Some(guidance) = guidance_for(normalized) {
        return Outcome::StaticReply {
            intent: Intent::TestGuidance,
            text: guidance.to_string(),
        };
    }

    Outcome::NoMatch
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
