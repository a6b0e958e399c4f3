use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "docs")]
use utoipa::ToSchema;

use crate::error::{DomainError, DomainResult};

/// A width:height ratio expressed in units, not pixels.
#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Target canvas aspect ratio as [width_units, height_units], both positive",
    value_type = Vec<u32>,
    example = json!([9, 16])
))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u32; 2]", into = "[u32; 2]")]
pub struct AspectRatio {
    width_units: u32,
    height_units: u32,
}

impl AspectRatio {
    pub const PORTRAIT_9_16: Self = Self {
        width_units: 9,
        height_units: 16,
    };

    pub fn new(width_units: u32, height_units: u32) -> DomainResult<Self> {
        if width_units == 0 || height_units == 0 {
            return Err(DomainError::InvalidAspectRatio(format!(
                "both units must be positive, got {width_units}:{height_units}"
            )));
        }

        Ok(Self {
            width_units,
            height_units,
        })
    }

    #[must_use]
    pub fn width_units(&self) -> u32 {
        self.width_units
    }

    #[must_use]
    pub fn height_units(&self) -> u32 {
        self.height_units
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        f64::from(self.width_units) / f64::from(self.height_units)
    }

    /// Fragment used in artifact file names, e.g. `9_16`.
    #[must_use]
    pub fn file_suffix(&self) -> String {
        format!("{}_{}", self.width_units, self.height_units)
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::PORTRAIT_9_16
    }
}

impl TryFrom<[u32; 2]> for AspectRatio {
    type Error = DomainError;

    fn try_from([width_units, height_units]: [u32; 2]) -> Result<Self, Self::Error> {
        Self::new(width_units, height_units)
    }
}

impl From<AspectRatio> for [u32; 2] {
    fn from(ratio: AspectRatio) -> Self {
        [ratio.width_units, ratio.height_units]
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width_units, self.height_units)
    }
}
