//! Orientation presets, custom `W:H` ratios and their pixel dimensions.
//!
//! Custom ratios pin the constrained side at [`BASE_SIZE`] and scale the other
//! side proportionally. Scaled sides are rounded half away from zero
//! (`f64::round`), so `resolve` is deterministic for every input.

use crate::error::StudioError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length, in pixels, that custom ratios are anchored to.
pub const BASE_SIZE: u32 = 1080;

/// Orientation value that defers to a companion custom ratio string.
pub const CUSTOM_ORIENTATION: &str = "custom";

static RATIO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+):([0-9]+)$").unwrap());

/// A width/height pair in pixels. Both sides are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Fixed orientation presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// 16:9, YouTube.
    Horizontal,
    /// 9:16, Stories and Shorts.
    Vertical,
    /// 1:1, Instagram.
    Square,
}

impl Orientation {
    pub const ALL: &'static [Orientation] = &[
        Orientation::Horizontal,
        Orientation::Vertical,
        Orientation::Square,
    ];

    pub const fn dimensions(self) -> Dimensions {
        match self {
            Orientation::Horizontal => Dimensions::new(1920, 1080),
            Orientation::Vertical => Dimensions::new(1080, 1920),
            Orientation::Square => Dimensions::new(1080, 1080),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
            Orientation::Square => "square",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            "square" => Ok(Orientation::Square),
            _ => Err(()),
        }
    }
}

/// A validated `W:H` ratio with both terms positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomRatio {
    width: u32,
    height: u32,
}

impl CustomRatio {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Scales the ratio to pixels around [`BASE_SIZE`].
    ///
    /// Landscape ratios keep the height at the base size; portrait and square
    /// ratios keep the width there.
    pub fn dimensions(&self) -> Result<Dimensions, StudioError> {
        let base = f64::from(BASE_SIZE);
        let ratio = f64::from(self.width) / f64::from(self.height);

        let (width, height) = if ratio > 1.0 {
            (base * ratio, base)
        } else {
            (base, base / ratio)
        };

        Ok(Dimensions::new(
            scaled_side(width, self)?,
            scaled_side(height, self)?,
        ))
    }
}

fn scaled_side(value: f64, ratio: &CustomRatio) -> Result<u32, StudioError> {
    let rounded = value.round();
    if rounded < 1.0 || rounded > f64::from(u32::MAX) {
        return Err(StudioError::invalid_ratio(
            &ratio.to_string(),
            "scaled dimension is out of range",
        ));
    }
    Ok(rounded as u32)
}

impl fmt::Display for CustomRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for CustomRatio {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.matches(':').count() != 1 {
            return Err(StudioError::invalid_ratio(
                s,
                "expected exactly one ':' separator",
            ));
        }
        let captures = RATIO_RE
            .captures(s)
            .ok_or_else(|| StudioError::invalid_ratio(s, "both terms must be whole numbers"))?;

        let term = |index: usize| -> Result<u32, StudioError> {
            captures[index]
                .parse::<u32>()
                .map_err(|_| StudioError::invalid_ratio(s, "term is too large"))
        };
        let width = term(1)?;
        let height = term(2)?;

        if width == 0 || height == 0 {
            return Err(StudioError::invalid_ratio(s, "terms must be positive"));
        }
        Ok(Self { width, height })
    }
}

/// What the user picked for the orientation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectRatioSelector {
    Preset(Orientation),
    Custom(CustomRatio),
}

impl AspectRatioSelector {
    /// Builds a selector from the two orientation fields of a draft.
    ///
    /// `custom` takes its ratio from `custom_aspect_ratio`. Any other value
    /// that is not a preset name is itself tried as a `W:H` ratio.
    pub fn from_draft(
        orientation: &str,
        custom_aspect_ratio: Option<&str>,
    ) -> Result<Self, StudioError> {
        match orientation {
            "" => Err(StudioError::MissingOrientation),
            CUSTOM_ORIENTATION => match custom_aspect_ratio {
                Some(ratio) if !ratio.trim().is_empty() => ratio.parse(),
                _ => Err(StudioError::MissingOrientation),
            },
            other => other.parse(),
        }
    }

    /// Resolves the selector to pixel dimensions.
    pub fn resolve(&self) -> Result<Dimensions, StudioError> {
        match self {
            AspectRatioSelector::Preset(preset) => Ok(preset.dimensions()),
            AspectRatioSelector::Custom(ratio) => ratio.dimensions(),
        }
    }
}

impl FromStr for AspectRatioSelector {
    type Err = StudioError;

    /// Accepts a preset name or a `W:H` ratio.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Orientation>() {
            Ok(preset) => Ok(AspectRatioSelector::Preset(preset)),
            Err(()) => s.parse().map(AspectRatioSelector::Custom),
        }
    }
}

impl From<Orientation> for AspectRatioSelector {
    fn from(preset: Orientation) -> Self {
        AspectRatioSelector::Preset(preset)
    }
}

impl From<CustomRatio> for AspectRatioSelector {
    fn from(ratio: CustomRatio) -> Self {
        AspectRatioSelector::Custom(ratio)
    }
}

impl fmt::Display for AspectRatioSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectRatioSelector::Preset(preset) => preset.fmt(f),
            AspectRatioSelector::Custom(ratio) => ratio.fmt(f),
        }
    }
}

/// Parses and resolves a preset name or `W:H` string in one step.
pub fn resolve(selector: &str) -> Result<Dimensions, StudioError> {
    selector.parse::<AspectRatioSelector>()?.resolve()
}
