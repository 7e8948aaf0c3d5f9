mod common;

use pagemark_llm::ollama::OllamaClient;
use pagemark_llm::traits::LlmClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_tags(server: &MockServer, models: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": models })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn constructor_skips_pull_when_model_present() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    mock_tags(&server, json!([{ "name": "reader-lm:1.5b" }])).await;

    // No /api/pull mock mounted: a pull attempt would 404 and fail new().
    let client = OllamaClient::new(server.uri(), "reader-lm:1.5b".to_string())
        .await
        .expect("client builds against running server");

    assert_eq!(client.model_name(), "reader-lm:1.5b");
}

#[tokio::test]
async fn constructor_pulls_missing_model() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    mock_tags(&server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/api/pull"))
        .and(body_partial_json(
            json!({ "model": "reader-lm:1.5b", "stream": false }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    OllamaClient::new(server.uri(), "reader-lm:1.5b".to_string())
        .await
        .expect("missing model is pulled");
}

#[tokio::test]
async fn render_applies_reader_decoding_options() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    mock_tags(&server, json!([{ "name": "reader-lm:1.5b" }])).await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "reader-lm:1.5b",
            "stream": false,
            "options": {
                "temperature": 0.0,
                "num_predict": 1024,
                "repeat_penalty": 1.08
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "# Hello, world!",
            "eval_count": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), "reader-lm:1.5b".to_string())
        .await
        .expect("client builds");

    let markdown = client
        .render("<html><body><h1>Hello, world!</h1></body></html>", None, None)
        .await
        .expect("render succeeds");

    assert_eq!(markdown, "# Hello, world!");
}

#[tokio::test]
async fn generate_surfaces_server_errors() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    mock_tags(&server, json!([{ "name": "reader-lm:1.5b" }])).await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), "reader-lm:1.5b".to_string())
        .await
        .expect("client builds");

    let err = client
        .generate("prompt", None, None, None)
        .await
        .expect_err("500 must surface as an error");
    assert!(err.to_string().contains("500"));
}
