//! Inbound message handling.
//!
//! Webhook bodies are read in two steps:
//!
//! ```text
//! raw XML → classify() → (category, subtype) → decode() → InboundMessage
//! ```
//!
//! Classification has to come first because event payloads carry an extra
//! `Event` discriminator that other messages omit.

pub mod classify;
pub mod decode;
pub mod types;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::{AdapterError, Result};

pub use classify::classify;
pub use decode::decode;
pub use types::{
    EventSubtype, InboundMessage, MessageCategory, MessageHeader, SubscribeEvent, TextMessage,
    UnsubscribeEvent,
};

/// Classify and decode a raw webhook body in one call.
pub fn parse_message(raw: &[u8]) -> Result<InboundMessage> {
    let (category, subtype) = classify(raw)?;
    let message = decode(raw, category, subtype)?;

    info!(
        category = %category,
        subtype = ?subtype,
        from_user = %message.header().from_user_name,
        "wechat_message_parsed"
    );

    Ok(message)
}

/// Deserialize an `<xml>` document into `T`, mapping every failure to
/// `MalformedPayload`.
pub(crate) fn from_xml<T: DeserializeOwned>(raw: &[u8]) -> Result<T> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| AdapterError::MalformedPayload(format!("payload is not UTF-8: {e}")))?;
    Ok(quick_xml::de::from_str(text)?)
}
