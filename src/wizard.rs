//! The five-step form that collects generation settings.
//!
//! [`Wizard`] is a value: every transition consumes it and returns the next
//! state, so callers hold exactly one current form at a time.

use crate::aspect::{AspectRatioSelector, Dimensions, CUSTOM_ORIENTATION};
use crate::error::StudioError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// One step of the form, bound to one field of [`GenerationDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    VideoType = 1,
    Style = 2,
    Mood = 3,
    PhotoPlacement = 4,
    Orientation = 5,
}

/// A selectable value for a step, with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> FormOption {
    FormOption { value, label }
}

const VIDEO_TYPE_OPTIONS: &[FormOption] = &[
    opt("gaming", "Gaming Thumbnail"),
    opt("tutorial", "Tutorial Thumbnail"),
    opt("vlog", "Vlog Thumbnail"),
    opt("review", "Review Thumbnail"),
    opt("course", "Course Thumbnail"),
    opt("entertainment", "Entertainment Thumbnail"),
];

const STYLE_OPTIONS: &[FormOption] = &[
    opt("modern", "Modern"),
    opt("vintage", "Vintage"),
    opt("minimalist", "Minimalist"),
    opt("bold", "Bold"),
    opt("professional", "Professional"),
];

const MOOD_OPTIONS: &[FormOption] = &[
    opt("exciting", "Exciting"),
    opt("professional", "Professional"),
    opt("fun", "Fun"),
    opt("serious", "Serious"),
    opt("educational", "Educational"),
    opt("mysterious", "Mysterious"),
];

const PHOTO_PLACEMENT_OPTIONS: &[FormOption] = &[
    opt("left", "Left Side"),
    opt("right", "Right Side"),
    opt("center", "Center"),
];

const ORIENTATION_OPTIONS: &[FormOption] = &[
    opt("horizontal", "Horizontal (16:9) - YouTube"),
    opt("vertical", "Vertical (9:16) - Stories"),
    opt("square", "Square (1:1) - Instagram"),
    opt(CUSTOM_ORIENTATION, "Custom ratio"),
];

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::VideoType,
        WizardStep::Style,
        WizardStep::Mood,
        WizardStep::PhotoPlacement,
        WizardStep::Orientation,
    ];

    pub const TOTAL: usize = Self::ALL.len();

    pub const FIRST: WizardStep = WizardStep::VideoType;
    pub const LAST: WizardStep = WizardStep::Orientation;

    /// 1-based position of the step.
    pub const fn number(self) -> usize {
        self as usize
    }

    pub fn from_number(number: usize) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    /// The draft field this step fills, as named on the wire.
    pub const fn field_name(self) -> &'static str {
        match self {
            WizardStep::VideoType => "videoType",
            WizardStep::Style => "style",
            WizardStep::Mood => "mood",
            WizardStep::PhotoPlacement => "photoPlacement",
            WizardStep::Orientation => "orientation",
        }
    }

    /// Suggested values for the step. Validity does not depend on these.
    pub const fn options(self) -> &'static [FormOption] {
        match self {
            WizardStep::VideoType => VIDEO_TYPE_OPTIONS,
            WizardStep::Style => STYLE_OPTIONS,
            WizardStep::Mood => MOOD_OPTIONS,
            WizardStep::PhotoPlacement => PHOTO_PLACEMENT_OPTIONS,
            WizardStep::Orientation => ORIENTATION_OPTIONS,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.field_name())
    }
}

/// The settings gathered so far. Sent as a flat record of string fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationDraft {
    #[serde(default)]
    pub video_type: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub photo_placement: String,
    #[serde(default)]
    pub orientation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_aspect_ratio: Option<String>,
}

impl GenerationDraft {
    pub fn field(&self, step: WizardStep) -> &str {
        match step {
            WizardStep::VideoType => &self.video_type,
            WizardStep::Style => &self.style,
            WizardStep::Mood => &self.mood,
            WizardStep::PhotoPlacement => &self.photo_placement,
            WizardStep::Orientation => &self.orientation,
        }
    }

    fn field_mut(&mut self, step: WizardStep) -> &mut String {
        match step {
            WizardStep::VideoType => &mut self.video_type,
            WizardStep::Style => &mut self.style,
            WizardStep::Mood => &mut self.mood,
            WizardStep::PhotoPlacement => &mut self.photo_placement,
            WizardStep::Orientation => &mut self.orientation,
        }
    }

    /// The orientation choice as a selector.
    pub fn selector(&self) -> Result<AspectRatioSelector, StudioError> {
        AspectRatioSelector::from_draft(&self.orientation, self.custom_aspect_ratio.as_deref())
    }

    pub fn is_step_valid(&self, step: WizardStep) -> bool {
        match step {
            WizardStep::Orientation => self
                .selector()
                .and_then(|selector| selector.resolve())
                .is_ok(),
            other => !self.field(other).is_empty(),
        }
    }

    /// The first step whose field is not yet valid.
    pub fn first_invalid_step(&self) -> Option<WizardStep> {
        WizardStep::ALL
            .into_iter()
            .find(|step| !self.is_step_valid(*step))
    }
}

/// A draft that passed every step, with its orientation already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedDraft {
    draft: GenerationDraft,
    selector: AspectRatioSelector,
    dimensions: Dimensions,
}

impl CompletedDraft {
    /// Checks every step of `draft`.
    pub fn new(draft: GenerationDraft) -> Result<Self, StudioError> {
        if let Some(step) = draft.first_invalid_step() {
            return Err(StudioError::IncompleteDraft(step));
        }
        let selector = draft.selector()?;
        let dimensions = selector.resolve()?;
        Ok(Self {
            draft,
            selector,
            dimensions,
        })
    }

    pub fn draft(&self) -> &GenerationDraft {
        &self.draft
    }

    pub fn selector(&self) -> &AspectRatioSelector {
        &self.selector
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn into_draft(self) -> GenerationDraft {
        self.draft
    }
}

/// Step position plus the draft being filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    current: WizardStep,
    draft: GenerationDraft,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// Step 1 with an empty draft.
    pub fn new() -> Self {
        Self::with_draft(GenerationDraft::default())
    }

    /// Step 1 with a prefilled draft.
    pub fn with_draft(draft: GenerationDraft) -> Self {
        Self {
            current: WizardStep::FIRST,
            draft,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    pub fn total_steps(&self) -> usize {
        WizardStep::TOTAL
    }

    pub fn draft(&self) -> &GenerationDraft {
        &self.draft
    }

    /// Sets the field bound to `step`.
    pub fn set(mut self, step: WizardStep, value: impl Into<String>) -> Self {
        *self.draft.field_mut(step) = value.into();
        self
    }

    /// Sets the ratio used when the orientation is `custom`.
    pub fn set_custom_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.draft.custom_aspect_ratio = Some(ratio.into());
        self
    }

    /// `step` is 1-based; anything outside `1..=5` is never valid.
    pub fn is_valid(&self, step: usize) -> bool {
        WizardStep::from_number(step).is_some_and(|step| self.draft.is_step_valid(step))
    }

    pub fn can_advance(&self) -> bool {
        self.current.next().is_some() && self.draft.is_step_valid(self.current)
    }

    pub fn can_retreat(&self) -> bool {
        self.current.previous().is_some()
    }

    /// Moves forward when the current step is valid and not the last one.
    pub fn advance(mut self) -> Self {
        match self.current.next() {
            Some(next) if self.draft.is_step_valid(self.current) => self.current = next,
            Some(_) => debug!(step = %self.current, "advance blocked: step is not valid"),
            None => debug!(step = %self.current, "advance ignored: already on the last step"),
        }
        self
    }

    /// Moves back one step; a no-op on the first step.
    pub fn retreat(mut self) -> Self {
        if let Some(previous) = self.current.previous() {
            self.current = previous;
        }
        self
    }

    /// On the last step and every step is valid.
    pub fn is_complete(&self) -> bool {
        self.current == WizardStep::LAST && self.draft.first_invalid_step().is_none()
    }

    /// Hands over the draft when complete; otherwise gives the wizard back.
    pub fn submit(self) -> Result<CompletedDraft, Self> {
        if !self.is_complete() {
            return Err(self);
        }
        match CompletedDraft::new(self.draft.clone()) {
            Ok(completed) => Ok(completed),
            Err(_) => Err(self),
        }
    }

    /// A fresh wizard, discarding this one.
    pub fn reset(self) -> Self {
        Self::new()
    }
}
