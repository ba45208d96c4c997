//! Gemini adapter wire-shape tests.
//!
//! Gemini reconstructs a chat session: all messages but the last become
//! history (`assistant` mapped to the `model` role), and only the last
//! message is submitted as the new turn. These tests record the exact
//! request the adapter sends and assert on its shape.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use modelmux::{Config, Message, ProviderId, RequestOptions, Router};

fn gemini_config(base_url: &str) -> Config {
    let toml = format!(
        r#"
        [providers.gemini]
        api_key = "gm-test-key"
        base_url = "{}"
        "#,
        base_url
    );
    let (config, _) = Config::parse_str_with(&toml, |_| None).unwrap();
    config
}

fn generate_content_body() -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "d"}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 6,
            "candidatesTokenCount": 2,
            "totalTokenCount": 8
        }
    })
}

#[tokio::test]
async fn history_and_turn_shape_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .and(header("x-goog-api-key", "gm-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_content_body()))
        .expect(1)
        .mount(&server)
        .await;

    let router = Router::from_config(&gemini_config(&server.uri()));
    let messages = vec![
        Message::user("a"),
        Message::assistant("b"),
        Message::user("c"),
    ];
    let options = RequestOptions {
        provider: Some(ProviderId::Gemini),
        ..Default::default()
    };

    let response = router.route(&messages, &options).await.unwrap();
    assert_eq!(response.provider, ProviderId::Gemini);
    assert_eq!(response.content, "d");
    assert_eq!(response.tokens_used.input, 6);
    assert_eq!(response.tokens_used.output, 2);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = requests[0].body_json().unwrap();

    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[0]["parts"][0]["text"], "a");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[1]["parts"][0]["text"], "b");
    assert_eq!(contents[2]["role"], "user");
    assert_eq!(contents[2]["parts"][0]["text"], "c");
}

#[tokio::test]
async fn system_instruction_sent_only_when_prompt_given() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_content_body()))
        .mount(&server)
        .await;

    let router = Router::from_config(&gemini_config(&server.uri()));
    let messages = vec![Message::user("pytanie")];

    let plain = RequestOptions {
        provider: Some(ProviderId::Gemini),
        ..Default::default()
    };
    router.route(&messages, &plain).await.unwrap();

    let with_system = RequestOptions {
        provider: Some(ProviderId::Gemini),
        system_prompt: Some("Odpowiadaj krótko.".to_string()),
        ..Default::default()
    };
    router.route(&messages, &with_system).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let first: serde_json::Value = requests[0].body_json().unwrap();
    assert!(first.get("systemInstruction").is_none());

    let second: serde_json::Value = requests[1].body_json().unwrap();
    assert_eq!(
        second["systemInstruction"]["parts"][0]["text"],
        "Odpowiadaj krótko."
    );
}

#[tokio::test]
async fn generation_config_carries_token_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_content_body()))
        .mount(&server)
        .await;

    let router = Router::from_config(&gemini_config(&server.uri()));
    let options = RequestOptions {
        provider: Some(ProviderId::Gemini),
        model: Some("gemini-1.5-flash".to_string()),
        max_tokens: Some(256),
        ..Default::default()
    };

    let response = router.route(&[Message::user("hej")], &options).await.unwrap();
    assert_eq!(response.model, "gemini-1.5-flash");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
}
