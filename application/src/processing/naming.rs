use std::ffi::OsStr;
use std::path::{Component, Path};

use crate::error::{AppError, AppResult};
use domain::aspect_ratio::AspectRatio;

const SEGMENTED_SUFFIX: &str = "_segmented";
const PROCESSED_SUFFIX: &str = "_processed";

pub fn file_stem(path: &Path) -> AppResult<&str> {
    path.file_stem()
        .and_then(OsStr::to_str)
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| AppError::ValidationError {
            message: format!("Cannot derive a file name from '{}'", path.display()),
        })
}

#[must_use]
pub fn segmented_name(stem: &str) -> String {
    format!("{stem}{SEGMENTED_SUFFIX}.png")
}

/// Final artifact name for path requests without an explicit output name.
/// The ratio is part of the name so different ratios never collide.
#[must_use]
pub fn processed_name(stem: &str, ratio: Option<AspectRatio>) -> String {
    match ratio {
        Some(ratio) => format!("{stem}{PROCESSED_SUFFIX}_{}.jpg", ratio.file_suffix()),
        None => format!("{stem}{PROCESSED_SUFFIX}_original.jpg"),
    }
}

#[must_use]
pub fn inline_processed_name(stem: &str) -> String {
    format!("{stem}{PROCESSED_SUFFIX}.png")
}

/// Accepts only a bare file name so callers cannot write outside the output
/// root.
pub fn validate_output_name(name: &str) -> AppResult<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(name),
        _ => Err(AppError::ValidationError {
            message: format!("output_image must be a plain file name, got '{name}'"),
        }),
    }
}
