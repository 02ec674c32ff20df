//! Highlight colour.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a colour string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The string does not start with `#`.
    #[error("colour must start with '#': {0}")]
    MissingHash(String),
    /// Neither 6 nor 8 hex digits follow the `#`.
    #[error("colour must have 6 or 8 hex digits: {0}")]
    BadLength(String),
    /// A character is not a hex digit.
    #[error("invalid hex digits in colour: {0}")]
    BadDigits(String),
}

/// Straight RGBA colour painted over changed pixels.
///
/// Written in configuration as `#AARRGGBB` or `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HighlightColor {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha channel.
    pub alpha: u8,
}

impl HighlightColor {
    /// Fully opaque colour.
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 0xFF,
        }
    }

    /// Luma of the colour, used on single-channel frames.
    pub fn luma(&self) -> u8 {
        crate::extraction::luma(self.red, self.green, self.blue)
    }
}

impl Default for HighlightColor {
    /// `#FFAA0000`: opaque dark red.
    fn default() -> Self {
        Self::opaque(0xAA, 0x00, 0x00)
    }
}

impl FromStr for HighlightColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::BadLength(s.to_string()));
        }
        let value =
            u32::from_str_radix(hex, 16).map_err(|_| ColorParseError::BadDigits(s.to_string()))?;

        let alpha = if hex.len() == 8 { (value >> 24) as u8 } else { 0xFF };
        Ok(Self {
            red: (value >> 16) as u8,
            green: (value >> 8) as u8,
            blue: value as u8,
            alpha,
        })
    }
}

impl TryFrom<String> for HighlightColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HighlightColor> for String {
    fn from(color: HighlightColor) -> String {
        color.to_string()
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.alpha, self.red, self.green, self.blue
        )
    }
}
