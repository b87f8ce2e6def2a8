//! Text Generation Client Tests

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::text_gen::{TextGenClient, TextGenError};

#[tokio::test]
async fn test_generate_posts_prompt_and_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_json(json!({
            "prompt": "Describe the tavern",
            "history": "User: hello\nAI: hi"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": [{"text": "Smoky and loud."}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = TextGenClient::new(format!("{}/api", server.uri()));
    let reply = client
        .generate("  Describe the tavern ", "User: hello\nAI: hi")
        .await
        .expect("Request should succeed");

    assert_eq!(reply, "Smoky and loud.");
}

#[tokio::test]
async fn test_generate_openai_style_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "A quiet inn."}}]
        })))
        .mount(&server)
        .await;

    let client = TextGenClient::new(server.uri());
    let reply = client.generate("Inn?", "").await.expect("Request should succeed");

    assert_eq!(reply, "A quiet inn.");
}

#[tokio::test]
async fn test_generate_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = TextGenClient::new(server.uri());
    let err = client
        .generate("Hello", "")
        .await
        .expect_err("500 should fail");

    match err {
        TextGenError::Status { status } => assert_eq!(status.as_u16(), 500),
        other => panic!("Expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_blank_prompt_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "unused"})))
        .expect(0)
        .mount(&server)
        .await;

    let client = TextGenClient::new(server.uri());
    let reply = client.generate("   ", "history").await.expect("Blank prompt should not fail");

    assert_eq!(reply, "");
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let client = TextGenClient::new("http://127.0.0.1:9/api");
    let err = client.generate("Hello", "").await.expect_err("Should not connect");
    assert!(matches!(err, TextGenError::Request(_)));
}
