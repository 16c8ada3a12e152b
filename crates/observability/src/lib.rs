use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    invalid_input_total: AtomicU64,
    canned_reply_total: AtomicU64,
    fallback_total: AtomicU64,
    provider_error_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub invalid_input_total: u64,
    pub canned_reply_total: u64,
    pub fallback_total: u64,
    pub provider_error_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_invalid_input(&self) {
        self.invalid_input_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_canned_reply(&self) {
        self.canned_reply_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_fallback(&self) {
        self.fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_provider_error(&self) {
        self.provider_error_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            invalid_input_total: self.invalid_input_total.load(Ordering::Relaxed),
            canned_reply_total: self.canned_reply_total.load(Ordering::Relaxed),
            fallback_total: self.fallback_total.load(Ordering::Relaxed),
            provider_error_total: self.provider_error_total.load(Ordering::Relaxed),
            avg_latency_millis: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

/// Crates whose events are kept at `info` when `RUST_LOG` is unset. The
/// session worker logs trimming and dropped callers at `debug`, so it only
/// shows up when asked for.
const ASSISTANT_TARGETS: &[&str] = &[
    "ariana_api",
    "ariana_agents",
    "ariana_provider",
    "tower_http",
];

pub const LOG_FORMAT_ENV: &str = "ARIANA_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Anything other than `pretty` keeps the structured output.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("pretty") => Self::Pretty,
            _ => Self::Json,
        }
    }
}

pub fn default_directives(service_name: &str) -> String {
    let mut directives = vec![format!("{service_name}=info")];
    directives.extend(
        ASSISTANT_TARGETS
            .iter()
            .filter(|target| **target != service_name)
            .map(|target| format!("{target}=info")),
    );
    directives.push("reqwest=warn".to_string());
    directives.push("hyper=warn".to_string());
    directives.join(",")
}

/// Logs go to stderr so the CLI can keep stdout for replies.
pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(service_name)));
        let format = LogFormat::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref());

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);

        match format {
            LogFormat::Json => builder
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .init(),
            LogFormat::Pretty => builder.pretty().init(),
        }
    });
}
