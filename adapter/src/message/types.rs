//! Inbound message types.
//!
//! Every message variant embeds the shared [`MessageHeader`] as a named
//! field. Field names are the snake_case forms of the XML element names
//! (`ToUserName` becomes `to_user_name`).

use std::fmt;

/// Message category selected by the `MsgType` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageCategory {
    Event,
    Text,
    Image,
    Voice,
    Video,
    ShortVideo,
    Location,
    Link,
}

impl MessageCategory {
    /// Map a `MsgType` value onto a category. Matching is exact.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "event" => Some(Self::Event),
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "voice" => Some(Self::Voice),
            "video" => Some(Self::Video),
            "shortvideo" => Some(Self::ShortVideo),
            "location" => Some(Self::Location),
            "link" => Some(Self::Link),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Text => "text",
            Self::Image => "image",
            Self::Voice => "voice",
            Self::Video => "video",
            Self::ShortVideo => "shortvideo",
            Self::Location => "location",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Event subtype selected by the `Event` element, only present on events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSubtype {
    /// User followed the account (possibly via a QR scene code).
    Subscribe,
    /// User unfollowed the account.
    Unsubscribe,
    /// Already-following user scanned a QR scene code.
    Scan,
    /// Periodic location report.
    Location,
    /// Custom menu click.
    Click,
    /// Custom menu link jump.
    View,
}

impl EventSubtype {
    /// Map an `Event` value onto a subtype. The platform sends the first two
    /// in lowercase and the rest in uppercase; matching is exact.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "subscribe" => Some(Self::Subscribe),
            "unsubscribe" => Some(Self::Unsubscribe),
            "SCAN" => Some(Self::Scan),
            "LOCATION" => Some(Self::Location),
            "CLICK" => Some(Self::Click),
            "VIEW" => Some(Self::View),
            _ => None,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
            Self::Scan => "SCAN",
            Self::Location => "LOCATION",
            Self::Click => "CLICK",
            Self::View => "VIEW",
        }
    }
}

impl fmt::Display for EventSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Routing fields present on every inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHeader {
    /// Official account that received the message.
    pub to_user_name: String,
    /// OpenID of the user who sent it.
    pub from_user_name: String,
    /// Unix seconds.
    pub create_time: u64,
    pub msg_type: String,
}

/// A plain text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    pub header: MessageHeader,
    pub content: String,
    /// 64-bit id, kept verbatim for deduplication.
    pub msg_id: String,
}

/// Follow event, sent both for a plain follow and for a follow through a
/// QR scene code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeEvent {
    pub header: MessageHeader,
    pub event: String,
    /// `qrscene_` followed by the scene value when the follow came from a QR code.
    pub event_key: Option<String>,
    /// QR code ticket, exchangeable for the code image.
    pub ticket: Option<String>,
}

impl SubscribeEvent {
    /// The QR scene value, with the `qrscene_` prefix removed.
    pub fn qr_scene(&self) -> Option<&str> {
        self.event_key
            .as_deref()
            .and_then(|key| key.strip_prefix("qrscene_"))
    }
}

/// Unfollow event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsubscribeEvent {
    pub header: MessageHeader,
    pub event: String,
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Text(TextMessage),
    Subscribe(SubscribeEvent),
    Unsubscribe(UnsubscribeEvent),
}

impl InboundMessage {
    /// The routing header shared by all variants.
    pub fn header(&self) -> &MessageHeader {
        match self {
            InboundMessage::Text(m) => &m.header,
            InboundMessage::Subscribe(m) => &m.header,
            InboundMessage::Unsubscribe(m) => &m.header,
        }
    }

    pub fn category(&self) -> MessageCategory {
        match self {
            InboundMessage::Text(_) => MessageCategory::Text,
            InboundMessage::Subscribe(_) | InboundMessage::Unsubscribe(_) => {
                MessageCategory::Event
            }
        }
    }

    pub fn event_subtype(&self) -> Option<EventSubtype> {
        match self {
            InboundMessage::Text(_) => None,
            InboundMessage::Subscribe(_) => Some(EventSubtype::Subscribe),
            InboundMessage::Unsubscribe(_) => Some(EventSubtype::Unsubscribe),
        }
    }
}
