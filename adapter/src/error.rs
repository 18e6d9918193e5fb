//! Error type shared by the message codec and the platform API client.

use thiserror::Error;

/// Every failure the library reports to its caller.
///
/// Nothing in this crate aborts on untrusted input. Webhook bodies that do
/// not parse, carry a type this adapter does not know, or name a type it
/// knows but cannot decode yet all come back as one of these variants.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The payload is not well-formed XML/JSON, or a required field is missing.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// `MsgType` carries a value outside the known categories.
    #[error("unrecognized message type: {0}")]
    UnrecognizedMessageType(String),

    /// `Event` carries a value outside the known event subtypes.
    #[error("unrecognized event type: {0}")]
    UnrecognizedEventType(String),

    /// The message kind is known but has no decoder yet.
    #[error("decoding not implemented for {0}")]
    NotImplemented(String),

    /// The HTTP request never produced a response.
    #[error("transport failure: {0}")]
    TransportFailure(#[from] reqwest::Error),

    /// The platform answered with a non-200 status or a non-zero `errcode`.
    #[error("upstream error (status {status}, errcode {errcode}): {message}")]
    UpstreamError {
        status: u16,
        errcode: i64,
        message: String,
    },

    /// The configured API base URL could not be parsed.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl From<quick_xml::DeError> for AdapterError {
    fn from(err: quick_xml::DeError) -> Self {
        AdapterError::MalformedPayload(err.to_string())
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::MalformedPayload(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
