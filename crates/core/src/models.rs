use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    EmptyMessage,
    LabHours,
    TestCatalog,
    TestGuidance,
    Fallback,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyMessage => "empty_message",
            Self::LabHours => "lab_hours",
            Self::TestCatalog => "test_catalog",
            Self::TestGuidance => "test_guidance",
            Self::Fallback => "fallback",
        }
    }
}

/// Result of routing a message through the rule tables.
///
/// `NoMatch` means the message has to be answered by the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    StaticReply { intent: Intent, text: String },
    NoMatch,
}

impl Outcome {
    pub fn intent(&self) -> Intent {
        match self {
            Self::StaticReply { intent, .. } => *intent,
            Self::NoMatch => Intent::Fallback,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskReply {
    pub reply: String,
}

impl AskReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum RuleResponse {
    Static(&'static str),
    NumberedList {
        heading: &'static str,
        items: &'static [&'static str],
    },
}

impl RuleResponse {
    pub fn render(&self) -> String {
        match self {
            Self::Static(text) => (*text).to_string(),
            Self::NumberedList { heading, items } => {
                let lines = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| format!("{}. {}", index + 1, item))
                    .collect::<Vec<_>>();
                format!("{}\n{}", heading, lines.join("\n"))
            }
        }
    }
}

/// One keyword-triggered category. A rule fires when any keyword occurs in
/// the normalized message.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
    pub response: RuleResponse,
}
