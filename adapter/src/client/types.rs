//! Response bodies of the platform's token and profile endpoints.

use serde::{Deserialize, Serialize};

/// Error fields the platform embeds in otherwise well-formed JSON bodies.
///
/// Successful responses usually omit both fields; a missing `errcode` means 0.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}

impl ApiStatus {
    pub fn is_error(&self) -> bool {
        self.errcode != 0
    }
}

/// Server-side access token used to call message-sending APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

/// User-scoped token returned by the OAuth code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthAccessToken {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// OpenID of the user who authorized.
    pub openid: String,
    /// Granted scope, e.g. `snsapi_userinfo`.
    #[serde(default)]
    pub scope: String,
}

/// Profile of a user who authorized with `snsapi_userinfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub openid: String,
    #[serde(default)]
    pub nickname: String,
    /// 1 male, 2 female, 0 unknown.
    #[serde(default)]
    pub sex: u8,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub headimgurl: String,
    #[serde(default)]
    pub privilege: Vec<String>,
    /// Only present once the account is bound to an open platform.
    #[serde(default)]
    pub unionid: Option<String>,
}
