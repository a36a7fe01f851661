mod common;

use common::{event_stream, API_KEY};
use serde_json::json;
use std::time::Duration;
use thumbnail_studio::{
    GenerationDraft, MessagePart, StudioClient, StudioConfig, StudioError, UiMessage,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn slow_client(server: &MockServer) -> StudioClient {
    let mut config = StudioConfig::default()
        .with_api_url(server.uri())
        .with_api_key(API_KEY);
    config.request_timeout = Duration::from_secs(1);
    config.read_timeout = Duration::from_secs(5);
    StudioClient::from_config(config).unwrap()
}

#[tokio::test]
async fn test_generation_outlives_request_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-thumbnail"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    event_stream(&[
                        json!({ "type": "file", "url": "https://cdn.example.com/out.png", "mediaType": "image/png" }),
                    ]),
                    "text/event-stream",
                )
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let messages = [UiMessage::user(vec![MessagePart::text("slow model")])];
    let thumbnail = slow_client(&server)
        .generate_thumbnail(&messages)
        .await
        .unwrap();

    assert_eq!(
        thumbnail.first_image().unwrap().url,
        "https://cdn.example.com/out.png"
    );
}

#[tokio::test]
async fn test_rewrite_prompt_honors_request_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/rewrite-prompt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "rewrittenPrompt": "too late" }))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let err = slow_client(&server)
        .rewrite_prompt("vlog intro", &GenerationDraft::default())
        .await
        .unwrap_err();

    assert!(
        matches!(err, StudioError::RequestFailed(ref source) if source.is_timeout()),
        "{err}"
    );
}
