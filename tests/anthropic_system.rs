//! Anthropic adapter wire-shape tests: system partitioning and content
//! block extraction.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use modelmux::{Config, Message, ProviderId, RequestOptions, Router};

fn anthropic_config(base_url: &str) -> Config {
    let toml = format!(
        r#"
        [providers.anthropic]
        api_key = "sk-ant-test"
        base_url = "{}"
        "#,
        base_url
    );
    let (config, _) = Config::parse_str_with(&toml, |_| None).unwrap();
    config
}

fn messages_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "msg-stub",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "usage": {"input_tokens": 20, "output_tokens": 30}
    })
}

#[tokio::test]
async fn system_messages_partitioned_into_system_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages_body("odpowiedź")))
        .expect(1)
        .mount(&server)
        .await;

    let router = Router::from_config(&anthropic_config(&server.uri()));
    let messages = vec![
        Message::system("Jesteś lekarzem."),
        Message::user("pytanie"),
        Message::system("Odpowiadaj ostrożnie."),
        Message::assistant("odpowiedź"),
        Message::user("kolejne pytanie"),
    ];
    let options = RequestOptions {
        provider: Some(ProviderId::Anthropic),
        ..Default::default()
    };

    let response = router.route(&messages, &options).await.unwrap();
    assert_eq!(response.content, "odpowiedź");
    assert_eq!(response.tokens_used.total(), 50);
    // claude-sonnet-4 default model at {3, 15}: (20*3 + 30*15) / 1e6
    assert!((response.cost - 0.00051).abs() < 1e-12);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();

    // System messages merged, newline-separated, in conversation order
    assert_eq!(body["system"], "Jesteś lekarzem.\nOdpowiadaj ostrożnie.");

    // The message list carries only user/assistant turns
    let wire_messages = body["messages"].as_array().unwrap();
    assert_eq!(wire_messages.len(), 3);
    assert_eq!(wire_messages[0]["role"], "user");
    assert_eq!(wire_messages[1]["role"], "assistant");
    assert_eq!(wire_messages[2]["role"], "user");
}

#[tokio::test]
async fn system_field_omitted_when_no_system_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(messages_body("ok")))
        .mount(&server)
        .await;

    let router = Router::from_config(&anthropic_config(&server.uri()));
    let options = RequestOptions {
        provider: Some(ProviderId::Anthropic),
        ..Default::default()
    };

    router
        .route(&[Message::user("pytanie")], &options)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert!(body.get("system").is_none());
}

#[tokio::test]
async fn reply_without_text_block_is_empty_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg-stub",
            "type": "message",
            "role": "assistant",
            "content": [],
            "usage": {"input_tokens": 8, "output_tokens": 0}
        })))
        .mount(&server)
        .await;

    let router = Router::from_config(&anthropic_config(&server.uri()));
    let options = RequestOptions {
        provider: Some(ProviderId::Anthropic),
        ..Default::default()
    };

    let response = router
        .route(&[Message::user("pytanie")], &options)
        .await
        .unwrap();

    // A refusal-style empty reply is a success with empty text
    assert_eq!(response.content, "");
    assert_eq!(response.tokens_used.input, 8);
}
