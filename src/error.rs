use crate::wizard::WizardStep;

#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    #[error("Invalid aspect ratio '{input}': {reason}")]
    InvalidRatio { input: String, reason: &'static str },
    #[error("No orientation selected, or 'custom' chosen without a ratio")]
    MissingOrientation,
    #[error("Host '{0}' is not served by the image CDN")]
    UnrecognizedHost(String),
    #[error("Draft is incomplete: step {0} is not valid")]
    IncompleteDraft(WizardStep),
    #[error("A text description is required")]
    EmptyPrompt,
    #[error("API key is missing. Please provide it or set the THUMBNAIL_STUDIO_API_KEY environment variable.")]
    MissingApiKey,
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Failed to parse API response: {0}")]
    ResponseParseFailed(#[from] serde_json::Error),
    #[error("API request failed: {message}")]
    ApiError { message: String },
    #[error("URL parsing failed: {0}")]
    UrlParseFailed(#[from] url::ParseError),
    #[error("Response stream failed: {0}")]
    StreamError(#[from] std::io::Error),
}

impl StudioError {
    pub(crate) fn invalid_ratio(input: &str, reason: &'static str) -> Self {
        Self::InvalidRatio {
            input: input.to_string(),
            reason,
        }
    }
}
