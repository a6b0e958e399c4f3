use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
#[cfg(feature = "docs")]
use utoipa::ToSchema;

use crate::error::DomainError;

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharpenMethod {
    /// Fixed 3x3 sharpen kernel.
    Sharpen,
    /// Unsharp mask with [`UnsharpMask::DEFAULT`] parameters.
    Unsharp,
}

impl SharpenMethod {
    /// Center-weighted kernel, normalized by its sum (16).
    pub const SHARPEN_KERNEL: [f32; 9] = [
        -2.0, -2.0, -2.0, //
        -2.0, 32.0, -2.0, //
        -2.0, -2.0, -2.0,
    ];
}

impl fmt::Display for SharpenMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sharpen => f.write_str("sharpen"),
            Self::Unsharp => f.write_str("unsharp"),
        }
    }
}

impl FromStr for SharpenMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sharpen" => Ok(Self::Sharpen),
            "unsharp" => Ok(Self::Unsharp),
            other => Err(DomainError::UnsupportedSharpenMethod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnsharpMask {
    pub radius: f32,
    pub percent: i32,
    pub threshold: i32,
}

impl UnsharpMask {
    pub const DEFAULT: Self = Self {
        radius: 2.0,
        percent: 150,
        threshold: 3,
    };

    /// Sharpened value for one channel given its blurred counterpart.
    /// Differences at or below the threshold leave the channel untouched.
    #[must_use]
    pub fn apply(&self, original: u8, blurred: u8) -> u8 {
        let diff = i32::from(original) - i32::from(blurred);
        if diff.abs() <= self.threshold {
            return original;
        }
        let sharpened = i32::from(original) + diff * self.percent / 100;
        sharpened.clamp(0, i32::from(u8::MAX)) as u8
    }
}
