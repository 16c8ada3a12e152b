use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use ariana_agents::SessionOptions;
use ariana_core::SYSTEM_INSTRUCTION;
use ariana_provider::{GeminiConfig, DEFAULT_GEMINI_MODEL, GEMINI_API_BASE};

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
const DEFAULT_PROVIDER_TIMEOUT_SECONDS: u64 = 20;

/// Extra time the session worker grants on top of the HTTP client timeout.
const TURN_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: String,
    pub gemini: GeminiConfig,
    pub system_instruction: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key =
            non_empty("GENAI_API_KEY").context("GENAI_API_KEY not found in environment variables")?;
        let model = non_empty("ARIANA_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let base_url =
            non_empty("ARIANA_GEMINI_BASE_URL").unwrap_or_else(|| GEMINI_API_BASE.to_string());
        let bind = non_empty("ARIANA_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let timeout_seconds = match non_empty("ARIANA_PROVIDER_TIMEOUT_SECONDS") {
            Some(value) => value
                .parse::<u64>()
                .with_context(|| format!("invalid ARIANA_PROVIDER_TIMEOUT_SECONDS: {value}"))?
                .clamp(1, 300),
            None => DEFAULT_PROVIDER_TIMEOUT_SECONDS,
        };
        let system_instruction = non_empty("ARIANA_SYSTEM_INSTRUCTION")
            .unwrap_or_else(|| SYSTEM_INSTRUCTION.to_string());

        Ok(Self {
            bind,
            gemini: GeminiConfig {
                api_key,
                model,
                base_url,
                timeout: Duration::from_secs(timeout_seconds),
            },
            system_instruction,
        })
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            system_instruction: self.system_instruction.clone(),
            turn_timeout: self.gemini.timeout + TURN_TIMEOUT_SLACK,
            ..SessionOptions::default()
        }
    }
}
