//! AI assistant: HTTP client and reply parsing.

mod client;
mod reply;

pub use client::{AssistantClient, AssistantConfig, DEFAULT_MODEL, SYSTEM_INSTRUCTION};
pub use reply::{AssistantReply, ChartConfig, ChartKind, parse_reply};
