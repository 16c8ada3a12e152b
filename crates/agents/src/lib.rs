mod session;

use std::sync::Arc;
use std::time::Instant;

use ariana_core::{classify_normalized, normalize_text, AskReply, Intent, Outcome, APOLOGY_REPLY};
use ariana_observability::AppMetrics;
use tracing::{error, info, instrument};

pub use session::{ConversationSession, SessionError, SessionOptions};

/// Routes each message either to a canned reply or to the shared
/// conversation session. Never fails: faults degrade to a fixed apology.
#[derive(Debug, Clone)]
pub struct LabAssistant {
    session: ConversationSession,
    metrics: Arc<AppMetrics>,
}

impl LabAssistant {
    pub fn new(session: ConversationSession, metrics: Arc<AppMetrics>) -> Self {
        Self { session, metrics }
    }

    #[instrument(skip(self, message))]
    pub async fn handle_message(&self, message: &str) -> AskReply {
        let started = Instant::now();
        self.metrics.inc_request();

        let normalized = normalize_text(message);
        let outcome = classify_normalized(&normalized);
        let intent = outcome.intent();

        let reply = match outcome {
            Outcome::StaticReply {
                intent: Intent::EmptyMessage,
                text,
            } => {
                self.metrics.inc_invalid_input();
                text
            }
            Outcome::StaticReply { text, .. } => {
                info!(intent = intent.as_str(), user = %normalized, "user message");
                self.metrics.inc_canned_reply();
                text
            }
            Outcome::NoMatch => {
                info!(intent = intent.as_str(), user = %normalized, "user message");
                self.metrics.inc_fallback();
                self.ask_model(&normalized).await
            }
        };

        self.metrics.observe_latency(started.elapsed());
        info!(intent = intent.as_str(), bot = %reply, "reply sent");

        AskReply::new(reply)
    }

    pub fn model(&self) -> &str {
        self.session.model()
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    async fn ask_model(&self, normalized: &str) -> String {
        match self.session.send(normalized).await {
            Ok(reply) => reply,
            Err(error) => {
                self.metrics.inc_provider_error();
                error!(error = %error, "model fallback failed");
                APOLOGY_REPLY.to_string()
            }
        }
    }
}
