//! Client configuration from the environment.

use crate::imagekit::CdnConfig;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/";

/// Settings for [`StudioClient`](crate::StudioClient).
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Base URL the `api/...` endpoints are joined onto.
    pub api_url: String,
    /// Bearer token, if the deployment requires one.
    pub api_key: Option<String>,
    pub cdn: CdnConfig,
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,
    /// Longest silence tolerated between two reads. Applies to generation
    /// streams, which have no overall deadline.
    pub read_timeout: Duration,
    /// Overall deadline for one prompt-rewrite request.
    pub request_timeout: Duration,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            cdn: CdnConfig::default(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(60),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl StudioConfig {
    /// Reads `THUMBNAIL_STUDIO_*` variables, keeping defaults for anything unset
    /// or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("THUMBNAIL_STUDIO_API_URL").unwrap_or(defaults.api_url),
            api_key: env::var("THUMBNAIL_STUDIO_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            cdn: CdnConfig {
                host: env::var("THUMBNAIL_STUDIO_CDN_HOST").unwrap_or(defaults.cdn.host),
                fill_color: env::var("THUMBNAIL_STUDIO_FILL_COLOR")
                    .unwrap_or(defaults.cdn.fill_color),
            },
            connect_timeout: secs_var("THUMBNAIL_STUDIO_CONNECT_TIMEOUT_SECS")
                .unwrap_or(defaults.connect_timeout),
            read_timeout: secs_var("THUMBNAIL_STUDIO_READ_TIMEOUT_SECS")
                .unwrap_or(defaults.read_timeout),
            request_timeout: secs_var("THUMBNAIL_STUDIO_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Loads a `.env` file if one exists, then reads the environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

fn secs_var(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .map(Duration::from_secs)
}
