//! Building blocks for generating YouTube thumbnails from an uploaded photo.
//!
//! The crate covers the deterministic core of a thumbnail generator and thin
//! asynchronous clients for the services around it:
//!
//! ## Features
//! - Orientation presets and custom `W:H` ratios resolved to pixel sizes.
//! - ImageKit URL rewriting that pads and resizes the uploaded photo.
//! - A five-step form state machine that gates when a request may be sent.
//! - Clients for the prompt-rewrite and streaming thumbnail-generation endpoints,
//!   with multi-turn refinement of a generated thumbnail.
//! - Typed error handling via [`StudioError`].
//!
//! ```
//! use thumbnail_studio::{imagekit, AspectRatioSelector, Dimensions};
//!
//! let selector: AspectRatioSelector = "16:9".parse()?;
//! assert_eq!(selector.resolve()?, Dimensions::new(1920, 1080));
//!
//! let url = imagekit::transform("https://ik.imagekit.io/demo/me.png", &selector, None);
//! assert_eq!(url, "https://ik.imagekit.io/demo/tr:w-1920,h-1080,cm-pad_resize,bg-F3F3F3/me.png");
//! # Ok::<(), thumbnail_studio::StudioError>(())
//! ```

pub mod aspect;
pub mod client;
pub mod config;
pub mod error;
pub mod imagekit;
pub mod prompt;
pub mod types;
pub mod wizard;

pub use aspect::{resolve, AspectRatioSelector, CustomRatio, Dimensions, Orientation};
pub use client::StudioClient;
pub use config::StudioConfig;
pub use error::StudioError;
pub use imagekit::{transform, CdnConfig};
pub use types::{
    Conversation, GeneratedImage, GeneratedThumbnail, GenerationRecord, MessagePart, Role,
    StreamPart, UiMessage,
};
pub use wizard::{CompletedDraft, FormOption, GenerationDraft, Wizard, WizardStep};
