use std::fmt;

use crate::aspect_ratio::AspectRatio;
use crate::error::{DomainError, DomainResult};

/// 100 megapixels, about 400 MB as an RGBA buffer.
pub const DEFAULT_MAX_CANVAS_PIXELS: u64 = 100_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DomainError::InvalidDimensions(format!(
                "image must not be empty, got {self}"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Rejects canvases whose pixel buffer would exceed `max_pixels`.
    pub fn ensure_within(&self, max_pixels: u64) -> DomainResult<()> {
        if self.pixel_count() > max_pixels {
            return Err(DomainError::InvalidDimensions(format!(
                "canvas {self} exceeds the limit of {max_pixels} pixels"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Top-left corner of the foreground on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// Smallest canvas with the target ratio that contains `image` without
/// cropping or scaling it. Only one dimension ever grows.
///
/// Without a target ratio the canvas is the image itself.
pub fn fit_canvas(image: CanvasSize, target: Option<AspectRatio>) -> DomainResult<CanvasSize> {
    image.validate()?;

    let Some(target) = target else {
        return Ok(image);
    };

    let target_ratio = target.as_f64();

    if image.ratio() > target_ratio {
        let height = rounded_dimension(f64::from(image.width) / target_ratio)?;
        Ok(CanvasSize::new(image.width, height.max(image.height)))
    } else {
        let width = rounded_dimension(f64::from(image.height) * target_ratio)?;
        Ok(CanvasSize::new(width.max(image.width), image.height))
    }
}

/// Integer-floor centering. With odd padding the extra pixel goes to the
/// bottom/right.
#[must_use]
pub fn center_offset(canvas: CanvasSize, image: CanvasSize) -> Placement {
    Placement {
        x: canvas.width.saturating_sub(image.width) / 2,
        y: canvas.height.saturating_sub(image.height) / 2,
    }
}

fn rounded_dimension(value: f64) -> DomainResult<u32> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded > f64::from(u32::MAX) {
        return Err(DomainError::InvalidDimensions(format!(
            "computed canvas dimension {value} is out of range"
        )));
    }
    Ok(rounded as u32)
}
