use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::imagekit::{self, CdnConfig};
use crate::types::{
    decode_stream_line, Conversation, GenerateRequest, GeneratedThumbnail, GenerationRecord,
    MessagePart, RewriteRequest, RewriteResponse, StreamLine, StreamPart, UiMessage,
};
use crate::wizard::{CompletedDraft, GenerationDraft};
use chrono::Utc;
use futures_util::{future, Stream, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::env;
use std::io;
use std::time::Duration;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;
use tracing::{debug, info, warn};
use url::Url;

const REWRITE_PROMPT_PATH: &str = "api/rewrite-prompt";
const GENERATE_THUMBNAIL_PATH: &str = "api/generate-thumbnail";

// Generated images may arrive inline as base64 `data:` URLs on a single line.
const MAX_STREAM_LINE: usize = 64 * 1024 * 1024;

/// Client for the prompt-rewrite and thumbnail-generation services.
///
/// It holds the shared `reqwest::Client` and the base URL for all API requests.
/// It is cheap to clone and safe to share across threads.
#[derive(Clone, Debug)]
pub struct StudioClient {
    client: reqwest::Client,
    base_url: Url,
    cdn: CdnConfig,
    request_timeout: Duration,
}

impl StudioClient {
    /// Creates a client for the default base URL.
    ///
    /// The API key comes from `api_key`, or from the `THUMBNAIL_STUDIO_API_KEY`
    /// environment variable when `None`.
    ///
    /// # Errors
    ///
    /// - `StudioError::MissingApiKey` if no key is given either way.
    /// - `StudioError::RequestFailed` if the HTTP client fails to build.
    pub fn new(api_key: Option<String>) -> Result<Self, StudioError> {
        let api_key = api_key
            .or_else(|| env::var("THUMBNAIL_STUDIO_API_KEY").ok())
            .ok_or(StudioError::MissingApiKey)?;
        Self::from_config(StudioConfig::default().with_api_key(api_key))
    }

    /// Creates a client with a custom base URL, e.g. a mock server.
    pub fn new_with_url(api_key: String, base_url: &str) -> Result<Self, StudioError> {
        Self::from_config(
            StudioConfig::default()
                .with_api_key(api_key)
                .with_api_url(base_url),
        )
    }

    /// Creates a client from explicit settings. The key is optional here.
    pub fn from_config(config: StudioConfig) -> Result<Self, StudioError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}"))?,
            );
        }

        // No overall deadline on the client: generation streams stay open for
        // as long as the model keeps sending.
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()?;

        let mut base_url = Url::parse(&config.api_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            cdn: config.cdn,
            request_timeout: config.request_timeout,
        })
    }

    pub fn cdn(&self) -> &CdnConfig {
        &self.cdn
    }

    /// Turns the user's description and form answers into a model prompt.
    ///
    /// # Returns
    ///
    /// The rewritten prompt text.
    pub async fn rewrite_prompt(
        &self,
        input: &str,
        draft: &GenerationDraft,
    ) -> Result<String, StudioError> {
        let url = self.base_url.join(REWRITE_PROMPT_PATH)?;
        let request_body = RewriteRequest {
            input,
            form_data: draft,
        };

        debug!(%url, "requesting prompt rewrite");
        let response = self
            .client
            .post(url)
            .timeout(self.request_timeout)
            .json(&request_body)
            .send()
            .await?;

        if response.status().is_success() {
            let body: RewriteResponse = response.json().await?;
            Ok(body.rewritten_prompt)
        } else {
            Err(api_error(response).await)
        }
    }

    /// Sends the chat history to the generation service and streams back its
    /// reply to the last message.
    ///
    /// The stream ends at the `[DONE]` marker or when the connection closes.
    /// An `error` chunk from the service surfaces as `StudioError::ApiError`.
    pub async fn generate_thumbnail_stream(
        &self,
        messages: &[UiMessage],
    ) -> Result<impl Stream<Item = Result<StreamPart, StudioError>>, StudioError> {
        let url = self.base_url.join(GENERATE_THUMBNAIL_PATH)?;
        let request_body = GenerateRequest { messages };

        debug!(%url, messages = messages.len(), "requesting thumbnail generation");
        let response = self.client.post(url).json(&request_body).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let reader = StreamReader::new(response.bytes_stream().map_err(io::Error::other));
        let lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_STREAM_LINE));

        Ok(lines
            .map_err(stream_error)
            .and_then(|line| future::ready(decode_stream_line(&line)))
            .try_take_while(|line| future::ready(Ok(!matches!(line, StreamLine::Done))))
            .try_filter_map(|line| {
                future::ready(Ok(match line {
                    StreamLine::Part(part) => Some(part),
                    StreamLine::Done | StreamLine::Skip => None,
                }))
            }))
    }

    /// Like [`generate_thumbnail_stream`](Self::generate_thumbnail_stream),
    /// collecting the whole reply.
    pub async fn generate_thumbnail(
        &self,
        messages: &[UiMessage],
    ) -> Result<GeneratedThumbnail, StudioError> {
        let stream = self.generate_thumbnail_stream(messages).await?;
        let thumbnail = stream
            .try_fold(GeneratedThumbnail::default(), |mut thumbnail, part| {
                thumbnail.push(part);
                future::ready(Ok(thumbnail))
            })
            .await?;
        debug!(images = thumbnail.images.len(), "generation stream finished");
        Ok(thumbnail)
    }

    /// Runs a full generation for a completed form.
    ///
    /// Rewrites the prompt, pads the uploaded image to the chosen size on the
    /// CDN, and sends both to the generation service. The request and the reply
    /// are appended to `conversation`, so [`refine`](Self::refine) can follow up.
    ///
    /// # Arguments
    ///
    /// * `conversation` - History to continue; usually empty for a new form.
    /// * `input` - The user's free-text description.
    /// * `source_url` - The uploaded photo's CDN URL.
    /// * `filename` - The uploaded file's name, used to declare its media type.
    /// * `draft` - The submitted form.
    pub async fn generate(
        &self,
        conversation: &mut Conversation,
        input: &str,
        source_url: &str,
        filename: Option<&str>,
        draft: &CompletedDraft,
    ) -> Result<GenerationRecord, StudioError> {
        if input.trim().is_empty() {
            return Err(StudioError::EmptyPrompt);
        }

        let rewritten_prompt = self.rewrite_prompt(input, draft.draft()).await?;
        let transformed_image_url = imagekit::transform_with(
            &self.cdn,
            source_url,
            draft.selector(),
            Some(draft.dimensions()),
        );
        info!(
            dimensions = %draft.dimensions(),
            %transformed_image_url,
            "generating thumbnail"
        );

        let message = UiMessage::user(vec![
            MessagePart::text(rewritten_prompt.clone()),
            MessagePart::file(transformed_image_url.clone(), filename),
        ]);
        let thumbnail = self.send_turn(conversation, message).await?;

        Ok(GenerationRecord {
            prompt: input.trim().to_string(),
            rewritten_prompt,
            original_image_url: source_url.to_string(),
            transformed_image_url,
            generated_image_url: thumbnail.first_image().map(|image| image.url.clone()),
            settings: draft.draft().clone(),
            created_at: Utc::now(),
        })
    }

    /// Asks for changes to the thumbnail generated earlier in `conversation`.
    ///
    /// `text` is sent as written, together with the whole history. On success
    /// both the request and the reply are appended.
    ///
    /// # Errors
    ///
    /// `StudioError::EmptyPrompt` if `text` is blank. On any failure the
    /// conversation is left as it was.
    pub async fn refine(
        &self,
        conversation: &mut Conversation,
        text: &str,
    ) -> Result<GeneratedThumbnail, StudioError> {
        if text.trim().is_empty() {
            return Err(StudioError::EmptyPrompt);
        }
        info!(turn = conversation.len(), "refining thumbnail");
        self.send_turn(conversation, UiMessage::user(vec![MessagePart::text(text)]))
            .await
    }

    async fn send_turn(
        &self,
        conversation: &mut Conversation,
        message: UiMessage,
    ) -> Result<GeneratedThumbnail, StudioError> {
        conversation.push(message);
        let reply = self.generate_thumbnail(conversation.messages()).await;
        match reply {
            Ok(thumbnail) => {
                conversation.push(thumbnail.to_message());
                Ok(thumbnail)
            }
            Err(err) => {
                warn!(error = %err, "generation failed, dropping the unanswered message");
                conversation.pop();
                Err(err)
            }
        }
    }
}

async fn api_error(response: reqwest::Response) -> StudioError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    StudioError::ApiError {
        message: format!("{status}: {}", body.trim()),
    }
}

fn stream_error(err: LinesCodecError) -> StudioError {
    match err {
        LinesCodecError::Io(err) => StudioError::StreamError(err),
        LinesCodecError::MaxLineLengthExceeded => StudioError::StreamError(io::Error::new(
            io::ErrorKind::InvalidData,
            "event stream line exceeds the maximum length",
        )),
    }
}
