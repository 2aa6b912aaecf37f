//! `[display]` section: text size presets

use crate::error::FieldError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text size preset chosen by the user
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    #[default]
    Normal,
    Large,
    Xlarge,
}

impl FontSize {
    pub const ALL: [FontSize; 3] = [FontSize::Normal, FontSize::Large, FontSize::Xlarge];

    /// Pixel sizes for this preset
    pub fn scale(&self) -> FontScale {
        let base = match self {
            FontSize::Normal => 10,
            FontSize::Large => 12,
            FontSize::Xlarge => 14,
        };
        FontScale {
            two_xs: base,
            xs: base + 1,
            sm: base + 2,
            md: base + 3,
            base: base + 4,
            lg: base + 5,
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSize::Normal => write!(f, "normal"),
            FontSize::Large => write!(f, "large"),
            FontSize::Xlarge => write!(f, "xlarge"),
        }
    }
}

impl FromStr for FontSize {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        FontSize::ALL
            .into_iter()
            .find(|size| size.to_string() == wanted)
            .ok_or_else(|| {
                FieldError::new("display.font_size", format!("unknown preset '{}'", s))
            })
    }
}

/// Six-step type scale in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontScale {
    pub two_xs: u8,
    pub xs: u8,
    pub sm: u8,
    pub md: u8,
    pub base: u8,
    pub lg: u8,
}

impl FontScale {
    /// Renders the scale as CSS custom properties
    pub fn css_vars(&self) -> String {
        [
            ("2xs", self.two_xs),
            ("xs", self.xs),
            ("sm", self.sm),
            ("md", self.md),
            ("base", self.base),
            ("lg", self.lg),
        ]
        .iter()
        .map(|(name, px)| format!("--text-{}:{}px", name, px))
        .collect::<Vec<_>>()
        .join(";")
    }
}

/// Presentation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub font_size: FontSize,
}
