//! wxhook - Official-account webhook adapter.
//!
//! This library provides the pieces the two wxhook binaries are built from:
//! - `wxhook-web`: Web server answering the platform's webhook callbacks
//! - `wxhook-token`: One-shot access token fetch for operators
//!
//! ## Message Flow
//!
//! ```text
//! POST /wechat → verify_signature → classify → decode → reply_for → TextReply::to_xml
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod reply;
pub mod web;

// Re-export commonly used types
pub use client::{AccessToken, ApiClient, OAuthAccessToken, Profile};
pub use config::{AppCredentials, Config};
pub use error::{AdapterError, Result};
pub use message::{
    classify, decode, parse_message, EventSubtype, InboundMessage, MessageCategory,
    MessageHeader,
};
pub use reply::TextReply;
pub use web::{build_router, verify_signature, AppState};
