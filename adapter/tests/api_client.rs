use std::time::Duration;

use httpmock::Method::GET;
use httpmock::MockServer;
use serde_json::json;

use wxhook::{AdapterError, ApiClient, AppCredentials};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
}

fn credentials() -> AppCredentials {
    AppCredentials::new("wx_app", "app_secret")
}

#[tokio::test]
async fn access_token_success() {
    let server = MockServer::start_async().await;
    let token_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/cgi-bin/token")
                .query_param("grant_type", "client_credential")
                .query_param("appid", "wx_app")
                .query_param("secret", "app_secret");
            then.status(200)
                .json_body(json!({"access_token": "ACCESS_TOKEN", "expires_in": 7200}));
        })
        .await;

    let token = client(&server).get_access_token(&credentials()).await.unwrap();

    assert_eq!(token.access_token, "ACCESS_TOKEN");
    assert_eq!(token.expires_in, 7200);
    token_mock.assert_async().await;
}

#[tokio::test]
async fn access_token_errcode_is_upstream_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/cgi-bin/token");
            then.status(200)
                .json_body(json!({"errcode": 40013, "errmsg": "invalid appid"}));
        })
        .await;

    let err = client(&server)
        .get_access_token(&credentials())
        .await
        .unwrap_err();

    match err {
        AdapterError::UpstreamError {
            status,
            errcode,
            message,
        } => {
            assert_eq!(status, 200);
            assert_eq!(errcode, 40013);
            assert_eq!(message, "invalid appid");
        }
        other => panic!("Expected UpstreamError, got {:?}", other),
    }
}

#[tokio::test]
async fn access_token_bad_status_is_upstream_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/cgi-bin/token");
            then.status(503).body("unavailable");
        })
        .await;

    let err = client(&server)
        .get_access_token(&credentials())
        .await
        .unwrap_err();

    match err {
        AdapterError::UpstreamError {
            status, message, ..
        } => {
            assert_eq!(status, 503);
            assert_eq!(message, "unavailable");
        }
        other => panic!("Expected UpstreamError, got {:?}", other),
    }
}

#[tokio::test]
async fn access_token_invalid_json_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/cgi-bin/token");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let err = client(&server)
        .get_access_token(&credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::MalformedPayload(_)));
}

#[tokio::test]
async fn oauth_access_token_success() {
    let server = MockServer::start_async().await;
    let oauth_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/sns/oauth2/access_token")
                .query_param("appid", "wx_app")
                .query_param("secret", "app_secret")
                .query_param("code", "CODE")
                .query_param("grant_type", "authorization_code");
            then.status(200).json_body(json!({
                "access_token": "USER_TOKEN",
                "expires_in": 7200,
                "refresh_token": "REFRESH",
                "openid": "o_user",
                "scope": "snsapi_userinfo"
            }));
        })
        .await;

    let token = client(&server)
        .get_oauth_access_token(&credentials(), "CODE")
        .await
        .unwrap();

    assert_eq!(token.access_token, "USER_TOKEN");
    assert_eq!(token.openid, "o_user");
    assert_eq!(token.scope, "snsapi_userinfo");
    assert_eq!(token.refresh_token.as_deref(), Some("REFRESH"));
    oauth_mock.assert_async().await;
}

#[tokio::test]
async fn oauth_access_token_invalid_code() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/sns/oauth2/access_token");
            then.status(200)
                .json_body(json!({"errcode": 40029, "errmsg": "invalid code"}));
        })
        .await;

    let err = client(&server)
        .get_oauth_access_token(&credentials(), "stale")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AdapterError::UpstreamError { errcode: 40029, .. }
    ));
}

#[tokio::test]
async fn profile_success() {
    let server = MockServer::start_async().await;
    let profile_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/sns/userinfo")
                .query_param("access_token", "USER_TOKEN")
                .query_param("openid", "o_user")
                .query_param("lang", "zh_CN");
            then.status(200).json_body(json!({
                "openid": "o_user",
                "nickname": "Nick",
                "sex": 2,
                "province": "Guangdong",
                "city": "Shenzhen",
                "country": "CN",
                "headimgurl": "https://example.com/head.png",
                "privilege": ["PRIVILEGE1", "PRIVILEGE2"],
                "unionid": "u_union"
            }));
        })
        .await;

    let profile = client(&server)
        .get_profile("USER_TOKEN", "o_user")
        .await
        .unwrap();

    assert_eq!(profile.openid, "o_user");
    assert_eq!(profile.nickname, "Nick");
    assert_eq!(profile.sex, 2);
    assert_eq!(profile.city, "Shenzhen");
    assert_eq!(profile.privilege.len(), 2);
    assert_eq!(profile.unionid.as_deref(), Some("u_union"));
    profile_mock.assert_async().await;
}

#[tokio::test]
async fn profile_expired_token() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/sns/userinfo");
            then.status(200)
                .json_body(json!({"errcode": 42001, "errmsg": "access_token expired"}));
        })
        .await;

    let err = client(&server)
        .get_profile("OLD_TOKEN", "o_user")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AdapterError::UpstreamError { errcode: 42001, .. }
    ));
}

#[tokio::test]
async fn unreachable_host_is_transport_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = ApiClient::new(&format!("http://127.0.0.1:{}", port), Duration::from_secs(2))
        .unwrap();
    let err = client.get_access_token(&credentials()).await.unwrap_err();

    assert!(matches!(err, AdapterError::TransportFailure(_)));
}
