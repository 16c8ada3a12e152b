//! Contract between the assistant and a remote generative-language model.
//!
//! The assistant owns the turn history and hands the whole of it to the
//! provider on every call; providers are stateless request/response clients.

mod gemini;

use std::future::Future;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiProvider, DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider rejected credentials (status {0})")]
    Unauthorized(u16),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("provider response blocked: {0}")]
    Blocked(String),

    #[error("provider response carried no text")]
    EmptyReply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl From<&ChatTurn> for Content {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            role: Some(turn.role.as_str().to_string()),
            parts: vec![Part {
                text: Some(turn.text.clone()),
            }],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Either a flat text answer or the structured candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProviderReply {
    Text { text: String },
    Candidates { candidates: Vec<Candidate> },
}

#[derive(Deserialize)]
struct RawReply {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl From<RawReply> for ProviderReply {
    /// A blank flat text never hides the candidates.
    fn from(raw: RawReply) -> Self {
        match raw.text {
            Some(text) if !text.trim().is_empty() => Self::Text { text },
            _ => Self::Candidates {
                candidates: raw.candidates,
            },
        }
    }
}

impl<'de> Deserialize<'de> for ProviderReply {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawReply::deserialize(deserializer).map(Self::from)
    }
}

impl ProviderReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn candidate(text: impl Into<String>) -> Self {
        Self::Candidates {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some(Role::Model.as_str().to_string()),
                    parts: vec![Part {
                        text: Some(text.into()),
                    }],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
        }
    }

    /// Extracts the reply text: the flat field when non-empty, otherwise the
    /// first non-empty part of the first candidate.
    pub fn reply_text(&self) -> Result<String, ProviderError> {
        match self {
            Self::Text { text } if !text.trim().is_empty() => Ok(text.clone()),
            Self::Text { .. } => Err(ProviderError::EmptyReply),
            Self::Candidates { candidates } => {
                let candidate = candidates.first().ok_or(ProviderError::EmptyReply)?;
                let text = candidate
                    .content
                    .iter()
                    .flat_map(|content| content.parts.iter())
                    .filter_map(|part| part.text.as_deref())
                    .find(|text| !text.trim().is_empty());

                match (text, candidate.finish_reason.as_deref()) {
                    (Some(text), _) => Ok(text.to_string()),
                    (None, Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST"))) => {
                        Err(ProviderError::Blocked(reason.to_string()))
                    }
                    (None, _) => Err(ProviderError::EmptyReply),
                }
            }
        }
    }
}

pub trait ChatProvider: Send + Sync + 'static {
    fn model(&self) -> &str;

    /// Produces the next model turn for `history`, whose last entry is the
    /// pending user turn.
    fn generate(
        &self,
        history: &[ChatTurn],
    ) -> impl Future<Output = Result<ProviderReply, ProviderError>> + Send;
}
