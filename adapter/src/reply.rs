//! Passive text replies.
//!
//! A reply is written straight into the webhook response body. The platform
//! expects every field wrapped in a literal CDATA section, so the document is
//! assembled by hand instead of through an escaping XML serializer.

use std::fmt::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::message::MessageHeader;

/// Reply type tag for text replies.
pub const TEXT_REPLY_TYPE: &str = "text";

/// A text reply to an inbound message.
///
/// `to_user_name` and `from_user_name` are the inbound sender and recipient
/// swapped; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReply {
    to_user_name: String,
    from_user_name: String,
    create_time: u64,
    content: String,
}

impl TextReply {
    /// Build a reply stamped with the current time.
    pub fn new(inbound: &MessageHeader, text: impl Into<String>) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Self::at(inbound, text, now)
    }

    /// Build a reply with an explicit creation time in Unix seconds.
    pub fn at(inbound: &MessageHeader, text: impl Into<String>, create_time: u64) -> Self {
        Self {
            to_user_name: inbound.from_user_name.clone(),
            from_user_name: inbound.to_user_name.clone(),
            create_time,
            content: text.into(),
        }
    }

    pub fn to_user_name(&self) -> &str {
        &self.to_user_name
    }

    pub fn from_user_name(&self) -> &str {
        &self.from_user_name
    }

    pub fn create_time(&self) -> u64 {
        self.create_time
    }

    pub fn msg_type(&self) -> &'static str {
        TEXT_REPLY_TYPE
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Serialize to the `<xml>` wire document.
    pub fn to_xml(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TextReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<xml>")?;
        write_cdata_element(f, "ToUserName", &self.to_user_name)?;
        write_cdata_element(f, "FromUserName", &self.from_user_name)?;
        write_cdata_element(f, "CreateTime", &self.create_time.to_string())?;
        write_cdata_element(f, "MsgType", TEXT_REPLY_TYPE)?;
        write_cdata_element(f, "Content", &self.content)?;
        f.write_str("</xml>")
    }
}

/// Write `<name><![CDATA[value]]></name>`.
///
/// A literal `]]>` inside `value` would close the section early, so it is
/// split across two adjacent sections. Parsers join them back into the
/// original text.
fn write_cdata_element<W: Write>(out: &mut W, name: &str, value: &str) -> fmt::Result {
    write!(out, "<{name}><![CDATA[")?;
    let mut parts = value.split("]]>");
    if let Some(first) = parts.next() {
        out.write_str(first)?;
    }
    for part in parts {
        out.write_str("]]]]><![CDATA[>")?;
        out.write_str(part)?;
    }
    write!(out, "]]></{name}>")
}
