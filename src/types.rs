use crate::error::StudioError;
use crate::wizard::GenerationDraft;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const OCTET_STREAM: &str = "application/octet-stream";

/// Who authored a chat message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One part of a chat message sent to the thumbnail-generation service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessagePart {
    /// Prompt text.
    Text { text: String },
    /// A reference image, by URL.
    File {
        #[serde(rename = "mediaType")]
        media_type: String,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },
}

impl MessagePart {
    pub fn text(text: impl Into<String>) -> Self {
        MessagePart::Text { text: text.into() }
    }

    /// A file part whose media type is guessed from `filename`, falling back
    /// to `application/octet-stream`.
    pub fn file(url: impl Into<String>, filename: Option<&str>) -> Self {
        let media_type = filename
            .and_then(|name| mime_guess::from_path(name).first())
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| OCTET_STREAM.to_string());
        MessagePart::File {
            media_type,
            url: url.into(),
            filename: filename.map(String::from),
        }
    }
}

/// A chat message in the shape the generation endpoint expects.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UiMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: Role,
    pub parts: Vec<MessagePart>,
}

impl UiMessage {
    pub fn user(parts: Vec<MessagePart>) -> Self {
        Self {
            id: None,
            role: Role::User,
            parts,
        }
    }

    pub fn assistant(parts: Vec<MessagePart>) -> Self {
        Self {
            id: None,
            role: Role::Assistant,
            parts,
        }
    }
}

/// The chat history sent with every generation request.
///
/// The service is stateless, so each turn carries all earlier user messages
/// and the assistant's replies. A follow-up such as "make the text larger"
/// refines the image generated in the previous turn.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<UiMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[UiMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: UiMessage) {
        self.messages.push(message);
    }

    /// Removes and returns the latest message.
    pub fn pop(&mut self) -> Option<UiMessage> {
        self.messages.pop()
    }

    /// Forgets the whole history, as when starting over from the form.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// URL of the most recent image the assistant produced.
    pub fn latest_image(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .filter(|message| message.role == Role::Assistant)
            .flat_map(|message| message.parts.iter().rev())
            .find_map(|part| match part {
                MessagePart::File {
                    media_type, url, ..
                } if media_type.starts_with("image/") => Some(url.as_str()),
                _ => None,
            })
    }
}

/// (Internal) Body of a thumbnail-generation request.
#[derive(Serialize, Debug)]
pub(crate) struct GenerateRequest<'a> {
    pub(crate) messages: &'a [UiMessage],
}

/// (Internal) Body of a prompt-rewrite request.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RewriteRequest<'a> {
    pub(crate) input: &'a str,
    pub(crate) form_data: &'a GenerationDraft,
}

/// (Internal) Reply from the prompt-rewrite endpoint.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RewriteResponse {
    pub(crate) rewritten_prompt: String,
}

/// A piece of the streamed generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamPart {
    /// A fragment of the model's text reply.
    Text(String),
    /// A generated image. `url` may be a `data:` URL.
    File { url: String, media_type: String },
}

/// (Internal) A chunk of the UI message stream, as sent on a `data:` line.
#[derive(Deserialize, Debug)]
#[serde(tag = "type")]
enum StreamChunk {
    #[serde(rename = "text-delta")]
    TextDelta { delta: String },
    #[serde(rename = "file")]
    File {
        url: String,
        #[serde(rename = "mediaType")]
        media_type: String,
    },
    #[serde(rename = "error")]
    Error {
        #[serde(rename = "errorText")]
        error_text: String,
    },
    #[serde(other)]
    Other,
}

/// (Internal) What a single line of the event stream amounts to.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum StreamLine {
    Part(StreamPart),
    Done,
    Skip,
}

/// (Internal) Decodes one server-sent-event line.
///
/// Only `data:` lines carry chunks; comments, blank lines and other fields
/// are skipped. A chunk of type `error` becomes an [`StudioError::ApiError`].
pub(crate) fn decode_stream_line(line: &str) -> Result<StreamLine, StudioError> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(StreamLine::Skip);
    };
    let data = data.trim();
    if data == "[DONE]" {
        return Ok(StreamLine::Done);
    }
    if data.is_empty() {
        return Ok(StreamLine::Skip);
    }

    Ok(match serde_json::from_str::<StreamChunk>(data)? {
        StreamChunk::TextDelta { delta } => StreamLine::Part(StreamPart::Text(delta)),
        StreamChunk::File { url, media_type } => {
            StreamLine::Part(StreamPart::File { url, media_type })
        }
        StreamChunk::Error { error_text } => {
            return Err(StudioError::ApiError {
                message: error_text,
            })
        }
        StreamChunk::Other => StreamLine::Skip,
    })
}

/// An image returned by the generation service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub url: String,
    pub media_type: String,
}

/// The collected reply of a generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedThumbnail {
    /// The model's text reply, concatenated from all deltas.
    pub text: String,
    /// Generated images in the order they arrived.
    pub images: Vec<GeneratedImage>,
}

impl GeneratedThumbnail {
    pub fn push(&mut self, part: StreamPart) {
        match part {
            StreamPart::Text(delta) => self.text.push_str(&delta),
            StreamPart::File { url, media_type } => {
                self.images.push(GeneratedImage { url, media_type })
            }
        }
    }

    pub fn first_image(&self) -> Option<&GeneratedImage> {
        self.images.iter().find(|image| image.media_type.starts_with("image/"))
    }

    /// The reply as an assistant message, for the next turn's history.
    /// Empty text is left out.
    pub fn to_message(&self) -> UiMessage {
        let text = (!self.text.is_empty()).then(|| MessagePart::text(self.text.clone()));
        let files = self.images.iter().map(|image| MessagePart::File {
            media_type: image.media_type.clone(),
            url: image.url.clone(),
            filename: None,
        });
        UiMessage::assistant(text.into_iter().chain(files).collect())
    }
}

/// Everything about one finished generation, ready to be stored by the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    /// The user's own description.
    pub prompt: String,
    pub rewritten_prompt: String,
    pub original_image_url: String,
    /// The CDN URL sent to the model, padded to the requested size.
    pub transformed_image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image_url: Option<String>,
    pub settings: GenerationDraft,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_parts_serialize_with_type_tags() {
        let message = UiMessage::user(vec![
            MessagePart::text("a bold gaming thumbnail"),
            MessagePart::file("https://ik.imagekit.io/t/me.png", Some("me.png")),
        ]);
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "role": "user",
                "parts": [
                    { "type": "text", "text": "a bold gaming thumbnail" },
                    {
                        "type": "file",
                        "mediaType": "image/png",
                        "url": "https://ik.imagekit.io/t/me.png",
                        "filename": "me.png"
                    }
                ]
            })
        );
    }

    #[test]
    fn file_part_without_known_type_is_octet_stream() {
        let part = MessagePart::file("https://x/y", None);
        assert!(matches!(part, MessagePart::File { ref media_type, .. } if media_type == OCTET_STREAM));

        let part = MessagePart::file("https://x/y", Some("photo.unknownext"));
        assert!(matches!(part, MessagePart::File { ref media_type, .. } if media_type == OCTET_STREAM));
    }

    #[test]
    fn decodes_stream_lines() {
        assert_eq!(
            decode_stream_line(r#"data: {"type":"text-delta","id":"0","delta":"Here"}"#).unwrap(),
            StreamLine::Part(StreamPart::Text("Here".into()))
        );
        assert_eq!(
            decode_stream_line(
                r#"data: {"type":"file","url":"data:image/png;base64,AAAA","mediaType":"image/png"}"#
            )
            .unwrap(),
            StreamLine::Part(StreamPart::File {
                url: "data:image/png;base64,AAAA".into(),
                media_type: "image/png".into(),
            })
        );
        assert_eq!(
            decode_stream_line(r#"data: {"type":"start-step"}"#).unwrap(),
            StreamLine::Skip
        );
        assert_eq!(decode_stream_line("data: [DONE]").unwrap(), StreamLine::Done);
        assert_eq!(decode_stream_line("").unwrap(), StreamLine::Skip);
        assert_eq!(decode_stream_line(": keep-alive").unwrap(), StreamLine::Skip);
    }

    #[test]
    fn error_chunk_becomes_api_error() {
        let err = decode_stream_line(r#"data: {"type":"error","errorText":"quota exceeded"}"#)
            .unwrap_err();
        assert!(matches!(err, StudioError::ApiError { message } if message == "quota exceeded"));

        let err = decode_stream_line("data: {not json").unwrap_err();
        assert!(matches!(err, StudioError::ResponseParseFailed(_)));
    }

    #[test]
    fn thumbnail_collects_text_and_images() {
        let mut thumbnail = GeneratedThumbnail::default();
        thumbnail.push(StreamPart::Text("Here is ".into()));
        thumbnail.push(StreamPart::Text("your thumbnail".into()));
        thumbnail.push(StreamPart::File {
            url: "https://cdn/x.png".into(),
            media_type: "image/png".into(),
        });
        assert_eq!(thumbnail.text, "Here is your thumbnail");
        assert_eq!(thumbnail.first_image().unwrap().url, "https://cdn/x.png");
    }

    #[test]
    fn reply_becomes_assistant_message() {
        let mut thumbnail = GeneratedThumbnail::default();
        thumbnail.push(StreamPart::Text("Done.".into()));
        thumbnail.push(StreamPart::File {
            url: "data:image/png;base64,AAAA".into(),
            media_type: "image/png".into(),
        });
        assert_eq!(
            serde_json::to_value(thumbnail.to_message()).unwrap(),
            json!({
                "role": "assistant",
                "parts": [
                    { "type": "text", "text": "Done." },
                    { "type": "file", "mediaType": "image/png", "url": "data:image/png;base64,AAAA" }
                ]
            })
        );

        let image_only = GeneratedThumbnail {
            text: String::new(),
            images: thumbnail.images.clone(),
        };
        assert_eq!(image_only.to_message().parts.len(), 1);
    }

    #[test]
    fn latest_image_comes_from_last_assistant_reply() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.latest_image(), None);

        conversation.push(UiMessage::user(vec![MessagePart::file(
            "https://ik.imagekit.io/t/me.png",
            Some("me.png"),
        )]));
        assert_eq!(conversation.latest_image(), None);

        for url in ["https://cdn/first.png", "https://cdn/second.png"] {
            conversation.push(UiMessage::assistant(vec![
                MessagePart::text("here"),
                MessagePart::File {
                    media_type: "image/png".into(),
                    url: url.into(),
                    filename: None,
                },
            ]));
            conversation.push(UiMessage::user(vec![MessagePart::text("brighter")]));
        }
        assert_eq!(conversation.len(), 5);
        assert_eq!(conversation.latest_image(), Some("https://cdn/second.png"));

        conversation.clear();
        assert!(conversation.is_empty());
    }
}
