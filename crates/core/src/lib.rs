pub mod catalog;
pub mod intent;
pub mod models;

pub use catalog::{APOLOGY_REPLY, INVALID_MESSAGE_REPLY, SYSTEM_INSTRUCTION};
pub use intent::{classify, classify_normalized, normalize_text};
pub use models::*;
