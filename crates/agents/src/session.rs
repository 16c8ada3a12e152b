use std::time::Duration;

use ariana_core::SYSTEM_INSTRUCTION;
use ariana_provider::{ChatProvider, ChatTurn, ProviderError};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, info};
use uuid::Uuid;

const COMMAND_BUFFER: usize = 64;

/// The seed exchange (instruction + model acknowledgement) is never trimmed.
const SEED_TURNS: usize = 2;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("provider call exceeded {0:?}")]
    Timeout(Duration),

    #[error("conversation session is no longer running")]
    Closed,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub system_instruction: String,
    pub turn_timeout: Duration,
    pub max_history_turns: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            turn_timeout: Duration::from_secs(30),
            max_history_turns: 200,
        }
    }
}

struct SendCommand {
    message: String,
    respond_to: oneshot::Sender<Result<String, SessionError>>,
}

/// Handle to the single conversation shared by every caller.
///
/// A handle only exists once the system instruction has been accepted by the
/// provider, so holding one means the session is ready. All turns go through
/// one worker task which runs them strictly one at a time, in arrival order.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    model: String,
    sender: mpsc::Sender<SendCommand>,
}

impl ConversationSession {
    pub async fn start<P: ChatProvider>(
        provider: P,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let mut worker = SessionWorker {
            provider,
            history: Vec::new(),
            turn_timeout: options.turn_timeout,
            max_history_turns: options.max_history_turns.max(SEED_TURNS + 2),
        };
        worker.exchange(options.system_instruction).await?;

        let session_id = Uuid::new_v4().to_string();
        let model = worker.provider.model().to_string();
        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(worker.run(receiver, session_id.clone()));

        info!(session_id = %session_id, model = %model, "conversation session ready");

        Ok(Self { model, sender })
    }

    pub async fn send(&self, message: impl Into<String>) -> Result<String, SessionError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(SendCommand {
                message: message.into(),
                respond_to,
            })
            .await
            .map_err(|_| SessionError::Closed)?;

        response.await.map_err(|_| SessionError::Closed)?
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

struct SessionWorker<P> {
    provider: P,
    history: Vec<ChatTurn>,
    turn_timeout: Duration,
    max_history_turns: usize,
}

impl<P: ChatProvider> SessionWorker<P> {
    async fn run(mut self, mut receiver: mpsc::Receiver<SendCommand>, session_id: String) {
        while let Some(command) = receiver.recv().await {
            let result = self.exchange(command.message).await;
            if command.respond_to.send(result).is_err() {
                debug!(session_id = %session_id, "caller went away before the reply was ready");
            }
        }

        debug!(session_id = %session_id, "conversation session stopped");
    }

    /// Runs one turn. The user turn stays in the history only if the provider
    /// answered it.
    async fn exchange(&mut self, message: String) -> Result<String, SessionError> {
        self.history.push(ChatTurn::user(message));

        let result = match timeout(self.turn_timeout, self.provider.generate(&self.history)).await
        {
            Ok(Ok(reply)) => reply.reply_text().map_err(SessionError::from),
            Ok(Err(error)) => Err(SessionError::from(error)),
            Err(_) => Err(SessionError::Timeout(self.turn_timeout)),
        };

        match result {
            Ok(text) => {
                self.history.push(ChatTurn::model(text.clone()));
                self.trim_history();
                Ok(text)
            }
            Err(error) => {
                self.history.pop();
                Err(error)
            }
        }
    }

    fn trim_history(&mut self) {
        if self.history.len() <= self.max_history_turns {
            return;
        }

        // Drop whole user/model pairs so the history keeps alternating.
        let excess = self.history.len() - self.max_history_turns;
        let excess = excess + excess % 2;
        debug!(dropped = excess, "trimming conversation history");
        self.history.drain(SEED_TURNS..SEED_TURNS + excess);
    }
}
