//! Webhook endpoint handlers.
//!
//! The platform calls one URL for two things:
//! 1. `GET` once when the URL is configured, expecting `echostr` echoed back
//! 2. `POST` for every message or event, expecting a reply document or `success`
//!
//! Both carry `signature`, `timestamp` and `nonce` in the query string.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::AdapterError;
use crate::message::{parse_message, InboundMessage};
use crate::reply::TextReply;
use crate::web::signature::{is_signature_verification_enabled, verify_signature};
use crate::Config;

/// Body that acknowledges a callback without replying to the user.
pub const ACK_BODY: &str = "success";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Signature
// =============================================================================

/// Query parameters the platform appends to every callback.
#[derive(Debug, Default, Deserialize)]
pub struct SignatureQuery {
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub nonce: String,
    /// Only sent on URL verification.
    #[serde(default)]
    pub echostr: Option<String>,
}

/// Check the request signature against the configured token.
///
/// With no token configured every request is let through.
fn signature_ok(config: &Config, query: &SignatureQuery) -> bool {
    if !is_signature_verification_enabled(&config.wechat_token) {
        warn!("wechat_signature_not_configured");
        return true;
    }

    let token = config.wechat_token.as_deref().unwrap_or_default();
    verify_signature(token, &query.signature, &query.timestamp, &query.nonce)
}

// =============================================================================
// URL Verification
// =============================================================================

/// URL verification endpoint.
///
/// Echoes `echostr` back as plain text when the signature verifies.
pub async fn verify_url(
    State(state): State<AppState>,
    Query(query): Query<SignatureQuery>,
) -> Response {
    info!(
        has_signature = !query.signature.is_empty(),
        has_echostr = query.echostr.is_some(),
        "wechat_url_verification_received"
    );

    if !signature_ok(&state.config, &query) {
        warn!(timestamp = %query.timestamp, "wechat_signature_invalid");
        return (StatusCode::UNAUTHORIZED, "invalid signature").into_response();
    }

    let echostr = query.echostr.unwrap_or_default();
    info!("wechat_url_verified");
    (StatusCode::OK, echostr).into_response()
}

// =============================================================================
// Message Webhook
// =============================================================================

/// Message webhook endpoint.
///
/// This endpoint:
/// 1. Verifies the signature (if a token is configured)
/// 2. Classifies and decodes the XML body
/// 3. Answers with a text reply, or `success` when there is nothing to say
pub async fn wechat_webhook(
    State(state): State<AppState>,
    Query(query): Query<SignatureQuery>,
    body: Bytes,
) -> Response {
    info!(
        body_length = body.len(),
        has_signature = !query.signature.is_empty(),
        "wechat_webhook_received"
    );

    if !signature_ok(&state.config, &query) {
        warn!(timestamp = %query.timestamp, "wechat_signature_invalid");
        return (StatusCode::UNAUTHORIZED, "invalid signature").into_response();
    }

    let message = match parse_message(&body) {
        Ok(message) => message,
        Err(e @ AdapterError::MalformedPayload(_)) => {
            warn!(error = %e, "wechat_payload_malformed");
            return (StatusCode::BAD_REQUEST, "malformed payload").into_response();
        }
        Err(
            e @ (AdapterError::UnrecognizedMessageType(_)
            | AdapterError::UnrecognizedEventType(_)
            | AdapterError::NotImplemented(_)),
        ) => {
            // Acknowledge so the platform does not redeliver.
            warn!(error = %e, "wechat_message_ignored");
            return ack();
        }
        Err(e) => {
            error!(error = %e, "wechat_message_failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "error").into_response();
        }
    };

    match reply_for(&state.config, &message) {
        Some(reply) => {
            info!(
                to_user = %reply.to_user_name(),
                content_length = reply.content().len(),
                "wechat_reply_sent"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/xml")],
                reply.to_xml(),
            )
                .into_response()
        }
        None => {
            info!(from_user = %message.header().from_user_name, "wechat_message_acknowledged");
            ack()
        }
    }
}

/// Choose the reply for a decoded message.
///
/// Text is echoed back, new followers get the welcome message, and
/// unfollows get no reply since the user can no longer receive one.
pub fn reply_for(config: &Config, message: &InboundMessage) -> Option<TextReply> {
    match message {
        InboundMessage::Text(text) => Some(TextReply::new(&text.header, text.content.clone())),
        InboundMessage::Subscribe(event) => Some(TextReply::new(
            &event.header,
            config.welcome_message.clone(),
        )),
        InboundMessage::Unsubscribe(_) => None,
    }
}

fn ack() -> Response {
    (StatusCode::OK, ACK_BODY).into_response()
}
