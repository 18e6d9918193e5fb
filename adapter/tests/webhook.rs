use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use wxhook::web::{build_router, compute_signature, AppState, ACK_BODY};
use wxhook::Config;

const TOKEN: &str = "webhook-token";
const TIMESTAMP: &str = "1700000000";
const NONCE: &str = "nonce123";

fn app(token: Option<&str>) -> Router {
    let config = Config {
        wechat_token: token.map(str::to_string),
        welcome_message: "welcome aboard".to_string(),
        ..Config::default()
    };
    build_router(AppState::new(config))
}

fn signed_query() -> String {
    format!(
        "signature={}&timestamp={}&nonce={}",
        compute_signature(TOKEN, TIMESTAMP, NONCE),
        TIMESTAMP,
        NONCE
    )
}

fn post(uri: String, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "text/xml")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn text_payload(content: &str) -> String {
    format!(
        "<xml><ToUserName><![CDATA[gh_account]]></ToUserName>\
         <FromUserName><![CDATA[o_user]]></FromUserName>\
         <CreateTime>1700000000</CreateTime>\
         <MsgType><![CDATA[text]]></MsgType>\
         <Content><![CDATA[{content}]]></Content>\
         <MsgId>1234567890123456</MsgId></xml>"
    )
}

fn event_payload(event: &str) -> String {
    format!(
        "<xml><ToUserName><![CDATA[gh_account]]></ToUserName>\
         <FromUserName><![CDATA[o_user]]></FromUserName>\
         <CreateTime>1700000000</CreateTime>\
         <MsgType><![CDATA[event]]></MsgType>\
         <Event><![CDATA[{event}]]></Event></xml>"
    )
}

#[tokio::test]
async fn health_responds_ok() {
    let response = app(None)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"status":"ok"}"#);
}

#[tokio::test]
async fn url_verification_echoes_echostr() {
    let uri = format!("/wechat?{}&echostr=echo-me", signed_query());
    let response = app(Some(TOKEN))
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "echo-me");
}

#[tokio::test]
async fn url_verification_rejects_bad_signature() {
    let uri = format!(
        "/wechat?signature=deadbeef&timestamp={}&nonce={}&echostr=echo-me",
        TIMESTAMP, NONCE
    );
    let response = app(Some(TOKEN))
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn text_message_gets_swapped_reply() {
    let uri = format!("/wechat?{}", signed_query());
    let response = app(Some(TOKEN))
        .oneshot(post(uri, &text_payload("hello")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/xml"
    );

    let body = body_string(response).await;
    assert!(body.starts_with("<xml>"));
    assert!(body.contains("<ToUserName><![CDATA[o_user]]></ToUserName>"));
    assert!(body.contains("<FromUserName><![CDATA[gh_account]]></FromUserName>"));
    assert!(body.contains("<MsgType><![CDATA[text]]></MsgType>"));
    assert!(body.contains("<Content><![CDATA[hello]]></Content>"));
}

#[tokio::test]
async fn subscribe_gets_welcome_message() {
    let uri = format!("/wechat?{}", signed_query());
    let response = app(Some(TOKEN))
        .oneshot(post(uri, &event_payload("subscribe")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("<Content><![CDATA[welcome aboard]]></Content>"));
    assert!(body.contains("<ToUserName><![CDATA[o_user]]></ToUserName>"));
}

#[tokio::test]
async fn unsubscribe_is_acknowledged() {
    let uri = format!("/wechat?{}", signed_query());
    let response = app(Some(TOKEN))
        .oneshot(post(uri, &event_payload("unsubscribe")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, ACK_BODY);
}

#[tokio::test]
async fn unknown_and_placeholder_types_are_acknowledged() {
    for payload in [
        event_payload("bogus"),
        event_payload("VIEW"),
        text_payload("x").replace("[text]", "[bogus]"),
        text_payload("x").replace("[text]", "[image]"),
    ] {
        let uri = format!("/wechat?{}", signed_query());
        let response = app(Some(TOKEN)).oneshot(post(uri, &payload)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, ACK_BODY);
    }
}

#[tokio::test]
async fn malformed_payload_is_bad_request() {
    let uri = format!("/wechat?{}", signed_query());
    let response = app(Some(TOKEN))
        .oneshot(post(uri, "<xml><MsgType>text</xml"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_content_is_bad_request() {
    let payload = "<xml><ToUserName>gh_account</ToUserName>\
                   <FromUserName>o_user</FromUserName>\
                   <CreateTime>1700000000</CreateTime>\
                   <MsgType>text</MsgType>\
                   <MsgId>1</MsgId></xml>";
    let uri = format!("/wechat?{}", signed_query());
    let response = app(Some(TOKEN)).oneshot(post(uri, payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forged_signature_is_unauthorized() {
    let uri = format!(
        "/wechat?signature={}&timestamp={}&nonce={}",
        compute_signature("other-token", TIMESTAMP, NONCE),
        TIMESTAMP,
        NONCE
    );
    let response = app(Some(TOKEN))
        .oneshot(post(uri, &text_payload("hello")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn no_token_configured_skips_verification() {
    let response = app(None)
        .oneshot(post("/wechat".to_string(), &text_payload("hello")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response)
        .await
        .contains("<Content><![CDATA[hello]]></Content>"));
}
