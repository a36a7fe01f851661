#![allow(dead_code)]

use serde_json::{json, Value};
use thumbnail_studio::{StudioClient, Wizard, WizardStep};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test_api_key";
pub const SOURCE_URL: &str = "https://ik.imagekit.io/rith/uploads/me.png";

pub fn client(server: &MockServer) -> StudioClient {
    StudioClient::new_with_url(API_KEY.to_string(), &server.uri()).unwrap()
}

/// A wizard with every field set and positioned on the last step.
pub fn completed_wizard(orientation: &str, custom_ratio: Option<&str>) -> Wizard {
    let mut wizard = Wizard::new()
        .set(WizardStep::VideoType, "gaming")
        .set(WizardStep::Style, "bold")
        .set(WizardStep::Mood, "exciting")
        .set(WizardStep::PhotoPlacement, "left")
        .set(WizardStep::Orientation, orientation);
    if let Some(ratio) = custom_ratio {
        wizard = wizard.set_custom_aspect_ratio(ratio);
    }
    for _ in 0..WizardStep::TOTAL {
        wizard = wizard.advance();
    }
    wizard
}

/// Renders chunks as a UI message event stream terminated by `[DONE]`.
pub fn event_stream(chunks: &[Value]) -> String {
    let mut body = String::new();
    for chunk in chunks {
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

pub async fn mount_rewrite(server: &MockServer, rewritten: &str) {
    Mock::given(method("POST"))
        .and(path("/api/rewrite-prompt"))
        .and(header("authorization", "Bearer test_api_key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "rewrittenPrompt": rewritten })),
        )
        .mount(server)
        .await;
}

pub async fn mount_generation(server: &MockServer, chunks: &[Value]) {
    Mock::given(method("POST"))
        .and(path("/api/generate-thumbnail"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(event_stream(chunks), "text/event-stream"),
        )
        .mount(server)
        .await;
}
