mod common;

use common::{client, mount_generation};
use futures_util::TryStreamExt;
use serde_json::json;
use thumbnail_studio::{MessagePart, StreamPart, StudioError, UiMessage};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn messages() -> Vec<UiMessage> {
    vec![UiMessage::user(vec![
        MessagePart::text("a bold gaming thumbnail"),
        MessagePart::file("https://ik.imagekit.io/rith/me.png", Some("me.png")),
    ])]
}

#[tokio::test]
async fn test_generate_thumbnail_collects_stream() {
    let server = MockServer::start().await;

    mount_generation(
        &server,
        &[
            json!({ "type": "start" }),
            json!({ "type": "text-start", "id": "0" }),
            json!({ "type": "text-delta", "id": "0", "delta": "Here is " }),
            json!({ "type": "text-delta", "id": "0", "delta": "your thumbnail." }),
            json!({ "type": "text-end", "id": "0" }),
            json!({ "type": "file", "url": "data:image/png;base64,iVBORw0KGgo=", "mediaType": "image/png" }),
            json!({ "type": "finish" }),
        ],
    )
    .await;

    let thumbnail = client(&server).generate_thumbnail(&messages()).await.unwrap();

    assert_eq!(thumbnail.text, "Here is your thumbnail.");
    assert_eq!(thumbnail.images.len(), 1);
    assert_eq!(
        thumbnail.first_image().unwrap().url,
        "data:image/png;base64,iVBORw0KGgo="
    );
}

#[tokio::test]
async fn test_generate_thumbnail_sends_message_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-thumbnail"))
        .and(body_json(json!({
            "messages": [{
                "role": "user",
                "parts": [
                    { "type": "text", "text": "a bold gaming thumbnail" },
                    {
                        "type": "file",
                        "mediaType": "image/png",
                        "url": "https://ik.imagekit.io/rith/me.png",
                        "filename": "me.png"
                    }
                ]
            }]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("data: [DONE]\n\n", "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let thumbnail = client(&server).generate_thumbnail(&messages()).await.unwrap();
    assert!(thumbnail.text.is_empty());
    assert!(thumbnail.first_image().is_none());
}

#[tokio::test]
async fn test_generate_thumbnail_stream_stops_at_done() {
    let server = MockServer::start().await;

    let body = "data: {\"type\":\"text-delta\",\"id\":\"0\",\"delta\":\"one\"}\r\n\r\n\
                data: [DONE]\r\n\r\n\
                data: {\"type\":\"text-delta\",\"id\":\"0\",\"delta\":\"after done\"}\r\n";
    Mock::given(method("POST"))
        .and(path("/api/generate-thumbnail"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let parts: Vec<StreamPart> = client(&server)
        .generate_thumbnail_stream(&messages())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(parts, vec![StreamPart::Text("one".to_string())]);
}

#[tokio::test]
async fn test_generate_thumbnail_error_chunk() {
    let server = MockServer::start().await;

    mount_generation(
        &server,
        &[
            json!({ "type": "start" }),
            json!({ "type": "error", "errorText": "The model is overloaded" }),
        ],
    )
    .await;

    let err = client(&server)
        .generate_thumbnail(&messages())
        .await
        .unwrap_err();

    assert!(
        matches!(err, StudioError::ApiError { ref message } if message == "The model is overloaded"),
        "{err}"
    );
}

#[tokio::test]
async fn test_generate_thumbnail_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-thumbnail"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client(&server)
        .generate_thumbnail(&messages())
        .await
        .unwrap_err();

    assert!(matches!(err, StudioError::ApiError { .. }));
}
