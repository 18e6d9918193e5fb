//! HTTP client for the platform's OAuth and profile endpoints.
//!
//! Each call is one GET request with no retry and no caching. Failures are
//! reported once, straight to the caller.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};
use url::Url;

use crate::client::types::{AccessToken, ApiStatus, OAuthAccessToken, Profile};
use crate::config::{AppCredentials, Config};
use crate::error::{AdapterError, Result};

const TOKEN_PATH: &str = "cgi-bin/token";
const OAUTH_TOKEN_PATH: &str = "sns/oauth2/access_token";
const USERINFO_PATH: &str = "sns/userinfo";

/// Client for the platform API, rooted at a configurable base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client whose requests time out after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // A trailing slash keeps any path prefix when endpoints are joined.
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }

    /// Create a client from the API base URL and timeout in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_base_url,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the server-side access token used for message-sending APIs.
    pub async fn get_access_token(&self, credentials: &AppCredentials) -> Result<AccessToken> {
        let token: AccessToken = self
            .get_json(
                "access_token",
                TOKEN_PATH,
                &[
                    ("grant_type", "client_credential"),
                    ("appid", credentials.app_id.as_str()),
                    ("secret", credentials.app_secret.as_str()),
                ],
            )
            .await?;

        info!(
            app_id = %credentials.app_id,
            expires_in = token.expires_in,
            "wechat_access_token_fetched"
        );

        Ok(token)
    }

    /// Exchange an OAuth authorization `code` for a user-scoped token.
    pub async fn get_oauth_access_token(
        &self,
        credentials: &AppCredentials,
        code: &str,
    ) -> Result<OAuthAccessToken> {
        let token: OAuthAccessToken = self
            .get_json(
                "oauth_access_token",
                OAUTH_TOKEN_PATH,
                &[
                    ("appid", credentials.app_id.as_str()),
                    ("secret", credentials.app_secret.as_str()),
                    ("code", code),
                    ("grant_type", "authorization_code"),
                ],
            )
            .await?;

        info!(
            app_id = %credentials.app_id,
            openid = %token.openid,
            scope = %token.scope,
            expires_in = token.expires_in,
            "wechat_oauth_token_fetched"
        );

        Ok(token)
    }

    /// Fetch the profile of `openid` with a user-scoped access token.
    pub async fn get_profile(&self, access_token: &str, openid: &str) -> Result<Profile> {
        let profile: Profile = self
            .get_json(
                "userinfo",
                USERINFO_PATH,
                &[
                    ("access_token", access_token),
                    ("openid", openid),
                    ("lang", "zh_CN"),
                ],
            )
            .await?;

        info!(
            openid = %profile.openid,
            has_unionid = profile.unionid.is_some(),
            "wechat_profile_fetched"
        );

        Ok(profile)
    }

    /// Issue a GET request and decode the JSON body.
    ///
    /// `endpoint` only names the call in logs; query strings carry secrets
    /// and are never logged.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.base_url.join(path)?;

        let response = match self.http.get(url).query(query).send().await {
            Ok(resp) => resp,
            Err(e) => {
                if e.is_timeout() {
                    error!(endpoint = endpoint, error = %e, "wechat_api_timeout");
                } else {
                    error!(endpoint = endpoint, error = %e, "wechat_api_request_error");
                }
                return Err(AdapterError::TransportFailure(e));
            }
        };

        let status = response.status();
        let body = response.bytes().await?;

        if status != StatusCode::OK {
            let preview = String::from_utf8_lossy(&body[..body.len().min(200)]).into_owned();
            warn!(
                endpoint = endpoint,
                status_code = status.as_u16(),
                body_preview = %preview,
                "wechat_api_bad_status"
            );
            return Err(AdapterError::UpstreamError {
                status: status.as_u16(),
                errcode: 0,
                message: preview,
            });
        }

        let api_status: ApiStatus = serde_json::from_slice(&body)?;
        if api_status.is_error() {
            warn!(
                endpoint = endpoint,
                errcode = api_status.errcode,
                errmsg = %api_status.errmsg,
                "wechat_api_errcode"
            );
            return Err(AdapterError::UpstreamError {
                status: status.as_u16(),
                errcode: api_status.errcode,
                message: api_status.errmsg,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}
