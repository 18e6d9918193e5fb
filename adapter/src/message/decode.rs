//! Strict decoding of classified payloads into [`InboundMessage`] values.
//!
//! Every element a variant declares as required must be present. A missing
//! element is a `MalformedPayload` error, never an empty default, so callers
//! can rely on fields such as `MsgId` for deduplication.

use serde::Deserialize;
use tracing::warn;

use crate::error::{AdapterError, Result};
use crate::message::from_xml;
use crate::message::types::{
    EventSubtype, InboundMessage, MessageCategory, MessageHeader, SubscribeEvent, TextMessage,
    UnsubscribeEvent,
};

#[derive(Debug, Deserialize)]
struct TextWire {
    #[serde(rename = "ToUserName")]
    to_user_name: String,
    #[serde(rename = "FromUserName")]
    from_user_name: String,
    #[serde(rename = "CreateTime")]
    create_time: u64,
    #[serde(rename = "MsgType")]
    msg_type: String,
    #[serde(rename = "Content")]
    content: String,
    #[serde(rename = "MsgId")]
    msg_id: String,
}

#[derive(Debug, Deserialize)]
struct SubscribeWire {
    #[serde(rename = "ToUserName")]
    to_user_name: String,
    #[serde(rename = "FromUserName")]
    from_user_name: String,
    #[serde(rename = "CreateTime")]
    create_time: u64,
    #[serde(rename = "MsgType")]
    msg_type: String,
    #[serde(rename = "Event")]
    event: String,
    #[serde(rename = "EventKey", default)]
    event_key: Option<String>,
    #[serde(rename = "Ticket", default)]
    ticket: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnsubscribeWire {
    #[serde(rename = "ToUserName")]
    to_user_name: String,
    #[serde(rename = "FromUserName")]
    from_user_name: String,
    #[serde(rename = "CreateTime")]
    create_time: u64,
    #[serde(rename = "MsgType")]
    msg_type: String,
    #[serde(rename = "Event")]
    event: String,
}

/// Decode a payload already classified by [`classify`](crate::message::classify).
///
/// Text messages and subscribe/unsubscribe events are decoded. The other
/// categories and event subtypes are recognized but have no decoder yet and
/// return `NotImplemented`.
pub fn decode(
    raw: &[u8],
    category: MessageCategory,
    subtype: Option<EventSubtype>,
) -> Result<InboundMessage> {
    let message = match (category, subtype) {
        (MessageCategory::Text, _) => InboundMessage::Text(decode_text(raw)?),
        (MessageCategory::Event, Some(EventSubtype::Subscribe)) => {
            InboundMessage::Subscribe(decode_subscribe(raw)?)
        }
        (MessageCategory::Event, Some(EventSubtype::Unsubscribe)) => {
            InboundMessage::Unsubscribe(decode_unsubscribe(raw)?)
        }
        (MessageCategory::Event, Some(other)) => {
            warn!(subtype = %other, "wechat_event_decoder_missing");
            return Err(AdapterError::NotImplemented(format!("{} event", other)));
        }
        (MessageCategory::Event, None) => {
            return Err(AdapterError::MalformedPayload(
                "event payload decoded without an event subtype".to_string(),
            ));
        }
        (other, _) => {
            warn!(category = %other, "wechat_message_decoder_missing");
            return Err(AdapterError::NotImplemented(format!("{} message", other)));
        }
    };

    let declared = &message.header().msg_type;
    if declared != category.as_wire() {
        return Err(AdapterError::MalformedPayload(format!(
            "MsgType {} does not match category {}",
            declared, category
        )));
    }

    Ok(message)
}

fn decode_text(raw: &[u8]) -> Result<TextMessage> {
    let wire: TextWire = from_xml(raw)?;

    Ok(TextMessage {
        header: MessageHeader {
            to_user_name: wire.to_user_name,
            from_user_name: wire.from_user_name,
            create_time: wire.create_time,
            msg_type: wire.msg_type,
        },
        content: wire.content,
        msg_id: wire.msg_id,
    })
}

fn decode_subscribe(raw: &[u8]) -> Result<SubscribeEvent> {
    let wire: SubscribeWire = from_xml(raw)?;

    Ok(SubscribeEvent {
        header: MessageHeader {
            to_user_name: wire.to_user_name,
            from_user_name: wire.from_user_name,
            create_time: wire.create_time,
            msg_type: wire.msg_type,
        },
        event: wire.event,
        event_key: wire.event_key,
        ticket: wire.ticket,
    })
}

fn decode_unsubscribe(raw: &[u8]) -> Result<UnsubscribeEvent> {
    let wire: UnsubscribeWire = from_xml(raw)?;

    Ok(UnsubscribeEvent {
        header: MessageHeader {
            to_user_name: wire.to_user_name,
            from_user_name: wire.from_user_name,
            create_time: wire.create_time,
            msg_type: wire.msg_type,
        },
        event: wire.event,
    })
}
