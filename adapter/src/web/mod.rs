//! Web server module for handling platform webhooks.
//!
//! This module provides a thin web server that:
//! - Answers the platform's URL verification handshake
//! - Verifies the signature on every callback
//! - Decodes inbound messages and writes the passive reply in the response

pub mod handlers;
pub mod signature;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{
    health, reply_for, verify_url, wechat_webhook, AppState, HealthResponse, SignatureQuery,
    ACK_BODY,
};
pub use signature::{compute_signature, is_signature_verification_enabled, verify_signature};

/// Build the router serving `/health` and the `/wechat` callback URL.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/wechat", get(verify_url).post(wechat_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
