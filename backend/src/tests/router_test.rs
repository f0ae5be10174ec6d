use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use image::ImageFormat;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::build_router;
use crate::services::llm::encode_test_image;
use crate::tests::common::{FakeClient, create_test_state};

async fn post_json(client: std::sync::Arc<FakeClient>, uri: &str, body: &str) -> (StatusCode, Value) {
    let app = build_router(create_test_state(client));
    let response = app
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn multipart_body(boundary: &str, image: &[u8], prompt: &str, source_lang: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"pic.png\"\r\nContent-Type: image/png\r\n\r\n",
            b = boundary
        )
        .as_bytes(),
    );
    body.extend_from_slice(image);
    body.extend_from_slice(
        format!(
            "\r\n--{b}\r\nContent-Disposition: form-data; name=\"prompt\"\r\n\r\n{p}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"source_lang\"\r\n\r\n{s}\r\n--{b}--\r\n",
            b = boundary,
            p = prompt,
            s = source_lang
        )
        .as_bytes(),
    );
    body
}

#[tokio::test]
async fn test_chat_endpoint_success() {
    let client = FakeClient::replying("Hello! Are you ready for today's lesson? 📚");
    let (status, body) = post_json(
        client.clone(),
        "/chat",
        &json!({
            "text": "Hello",
            "role": "teacher",
            "target_lang": "English",
            "source_lang": "Turkish",
            "level": "A1-A2",
            "history": []
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"reply": "Hello! Are you ready for today's lesson? 📚"}));
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test]
async fn test_chat_endpoint_provider_failure_still_200() {
    let (status, body) = post_json(
        FakeClient::failing(500, "simulated outage"),
        "/chat",
        r#"{"text": "Hello"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Bağlantı hatası, lütfen tekrar dene.");
    assert_eq!(body["error"], "Provider returned HTTP 500: simulated outage");
}

#[tokio::test]
async fn test_chat_endpoint_malformed_json_is_enveloped() {
    let client = FakeClient::replying("never");
    let (status, body) = post_json(client.clone(), "/chat", "{not json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(body["error"].as_str().is_some_and(|s| s.starts_with("Invalid input")));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_chat_endpoint_coerces_history_roles() {
    let client = FakeClient::replying("ok");
    post_json(
        client.clone(),
        "/chat",
        &json!({
            "text": "again",
            "history": [{"role": "deng", "content": "hi"}, {"content": "hey"}, {"role": "user"}]
        })
        .to_string(),
    )
    .await;

    let contents = client.last_call();
    assert_eq!(contents.len(), 4);
    assert_eq!((contents[2].role.as_str(), contents[2].text()), ("model", "hi".to_string()));
    assert_eq!((contents[3].role.as_str(), contents[3].text()), ("user", "hey\nagain".to_string()));
}

#[tokio::test]
async fn test_chat_endpoint_accepts_null_history() {
    let client = FakeClient::replying("Merhaba!");
    let (status, body) =
        post_json(client.clone(), "/chat", r#"{"text": "Hello", "history": null}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"reply": "Merhaba!"}));
    // anchor pair + new message
    assert_eq!(client.last_call().len(), 3);
}

#[tokio::test]
async fn test_chat_endpoint_accepts_null_level() {
    let client = FakeClient::replying("Sure.");
    let (status, body) = post_json(
        client.clone(),
        "/chat",
        r#"{"text": "Hello", "level": null, "role": null, "source_lang": null}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"reply": "Sure."}));
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test]
async fn test_define_endpoint() {
    let client = FakeClient::replying("koşmak, çalıştırmak");
    let (status, body) =
        post_json(client, "/define", r#"{"word": "run", "source_lang": "Turkish"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"definition": "koşmak, çalıştırmak"}));
}

#[tokio::test]
async fn test_define_endpoint_failure() {
    let (_, body) = post_json(
        FakeClient::failing(401, "API key not valid"),
        "/define",
        r#"{"word": "run", "source_lang": "English"}"#,
    )
    .await;

    assert_eq!(body["definition"], "Could not find definition.");
    assert!(body["error"].as_str().unwrap().contains("API key not valid"));
}

#[tokio::test]
async fn test_translate_endpoint() {
    let (status, body) = post_json(
        FakeClient::replying("Nasılsın?"),
        "/translate_sentence",
        r#"{"text": "How are you?", "target_lang": "Turkish"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"translation": "Nasılsın?"}));
}

#[tokio::test]
async fn test_vision_endpoint() {
    let client = FakeClient::replying("This is a red square.");
    let app = build_router(create_test_state(client.clone()));
    let boundary = "deng-test-boundary";
    let body = multipart_body(boundary, &encode_test_image(ImageFormat::Png), "What is this", "English");

    let response = app
        .oneshot(
            Request::post("/vision")
                .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"reply": "This is a red square."}));
    assert_eq!(client.last_call()[0].text(), "What is this. Please explain in English.");
}

#[tokio::test]
async fn test_vision_endpoint_bad_image() {
    let client = FakeClient::replying("never");
    let app = build_router(create_test_state(client.clone()));
    let boundary = "deng-test-boundary";
    let body = multipart_body(boundary, b"GIF89a-but-not-really", "What is this", "Turkish");

    let response = app
        .oneshot(
            Request::post("/vision")
                .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["reply"], "Görseli göremedim.");
    assert!(body["error"].as_str().unwrap().starts_with("Could not decode image"));
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_vision_endpoint_without_multipart() {
    let (status, body) =
        post_json(FakeClient::replying("never"), "/vision", r#"{"prompt": "hi"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_router(create_test_state(FakeClient::replying("")));
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "fake-model");
}

#[test]
fn test_app_state_builds_real_client() {
    let mut config = crate::config::Config::default();
    config.gemini.request_timeout = 30;

    let state = crate::AppState::new(config).unwrap();
    assert_eq!(state.tutor.model(), "gemini-flash-latest");
}
