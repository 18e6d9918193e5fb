//! Message classification from the `MsgType` and `Event` discriminators.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AdapterError, Result};
use crate::message::from_xml;
use crate::message::types::{EventSubtype, MessageCategory};

#[derive(Debug, Deserialize)]
struct MsgTypeField {
    #[serde(rename = "MsgType")]
    msg_type: String,
}

#[derive(Debug, Deserialize)]
struct EventField {
    #[serde(rename = "Event")]
    event: String,
}

/// Determine the category of a raw webhook body, and its event subtype when
/// the category is `Event`.
///
/// The `Event` element is only read once `MsgType` says the payload is an
/// event; non-event payloads do not carry it.
///
/// # Errors
///
/// * `MalformedPayload` - the body is not well-formed XML, or a needed
///   discriminator element is missing
/// * `UnrecognizedMessageType` - `MsgType` is outside the known categories
/// * `UnrecognizedEventType` - `Event` is outside the known subtypes
pub fn classify(raw: &[u8]) -> Result<(MessageCategory, Option<EventSubtype>)> {
    let MsgTypeField { msg_type } = from_xml(raw)?;

    let category = match MessageCategory::from_wire(&msg_type) {
        Some(category) => category,
        None => {
            warn!(msg_type = %msg_type, "wechat_message_type_unrecognized");
            return Err(AdapterError::UnrecognizedMessageType(msg_type));
        }
    };

    if category != MessageCategory::Event {
        debug!(category = %category, "wechat_message_classified");
        return Ok((category, None));
    }

    let EventField { event } = from_xml(raw)?;

    match EventSubtype::from_wire(&event) {
        Some(subtype) => {
            debug!(category = %category, subtype = %subtype, "wechat_message_classified");
            Ok((category, Some(subtype)))
        }
        None => {
            warn!(event = %event, "wechat_event_type_unrecognized");
            Err(AdapterError::UnrecognizedEventType(event))
        }
    }
}
