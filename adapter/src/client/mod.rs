//! Platform API client.
//!
//! This module provides:
//! - Response types for the token and profile endpoints
//! - An async client issuing one GET per call
//!
//! App credentials are passed to every call that needs them, so one process
//! can serve several accounts.

pub mod api;
pub mod types;

pub use api::ApiClient;
pub use types::{AccessToken, ApiStatus, OAuthAccessToken, Profile};
