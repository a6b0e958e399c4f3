use serde::Deserialize;
use std::path::PathBuf;
#[cfg(feature = "docs")]
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use canvasfit_application::{
    error::AppResult,
    processing::commands::{
        BackgroundOptions, CanvasFit, ProcessBase64Command, ProcessPathCommand,
    },
};
use domain::{aspect_ratio::AspectRatio, color::RgbColor, sharpen::SharpenMethod};

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Inline image to segment and place on a solid canvas. Omitting aspect_ratio uses the configured default (9:16); an explicit null keeps the foreground's native size.",
    example = json!({
        "image_base64": "data:image/png;base64,iVBORw0KGgo...",
        "bg_color": [255, 255, 255],
        "aspect_ratio": [9, 16],
        "sharpen": "unsharp"
    })
))]
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProcessBase64Request {
    #[validate(length(min = 1, message = "image_base64 cannot be empty"))]
    pub image_base64: String,

    #[serde(default)]
    pub bg_color: Option<RgbColor>,

    #[cfg_attr(feature = "docs", schema(value_type = Option<AspectRatio>))]
    #[serde(default, with = "serde_with::rust::double_option")]
    pub aspect_ratio: Option<Option<AspectRatio>>,

    #[serde(default)]
    pub random_bg: bool,

    #[cfg_attr(feature = "docs", schema(value_type = Option<SharpenMethod>))]
    #[validate(custom(
        function = "validate_sharpen_method",
        message = "sharpen must be one of: sharpen, unsharp"
    ))]
    #[serde(default)]
    pub sharpen: Option<String>,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Image on the server's filesystem to segment and place on a solid canvas. Relative paths resolve against the configured input directory.",
    example = json!({
        "input_image": "car.jpg",
        "bg_color": [240, 255, 240],
        "aspect_ratio": [16, 9],
        "output_image": "car_banner.jpg"
    })
))]
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProcessPathRequest {
    #[validate(length(min = 1, message = "input_image cannot be empty"))]
    pub input_image: String,

    #[serde(default)]
    pub bg_color: Option<RgbColor>,

    #[cfg_attr(feature = "docs", schema(value_type = Option<AspectRatio>))]
    #[serde(default, with = "serde_with::rust::double_option")]
    pub aspect_ratio: Option<Option<AspectRatio>>,

    #[validate(length(min = 1, message = "output_image cannot be empty"))]
    #[serde(default)]
    pub output_image: Option<String>,

    #[serde(default)]
    pub random_bg: bool,

    #[cfg_attr(feature = "docs", schema(value_type = Option<SharpenMethod>))]
    #[validate(custom(
        function = "validate_sharpen_method",
        message = "sharpen must be one of: sharpen, unsharp"
    ))]
    #[serde(default)]
    pub sharpen: Option<String>,
}

fn validate_sharpen_method(method: &str) -> Result<(), ValidationError> {
    method
        .parse::<SharpenMethod>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("unsupported_sharpen_method"))
}

fn canvas_fit(aspect_ratio: Option<Option<AspectRatio>>) -> CanvasFit {
    match aspect_ratio {
        None => CanvasFit::ConfiguredDefault,
        Some(None) => CanvasFit::Native,
        Some(Some(ratio)) => CanvasFit::Ratio(ratio),
    }
}

fn background_options(
    bg_color: Option<RgbColor>,
    aspect_ratio: Option<Option<AspectRatio>>,
    random: bool,
    sharpen: Option<&str>,
) -> AppResult<BackgroundOptions> {
    let sharpen = sharpen.map(str::parse::<SharpenMethod>).transpose()?;

    Ok(BackgroundOptions {
        color: bg_color,
        random,
        canvas: canvas_fit(aspect_ratio),
        sharpen,
    })
}

impl ProcessBase64Request {
    /// `force_random` is set by the `/randombg` routes.
    pub fn into_command(self, force_random: bool) -> AppResult<ProcessBase64Command> {
        let options = background_options(
            self.bg_color,
            self.aspect_ratio,
            self.random_bg || force_random,
            self.sharpen.as_deref(),
        )?;

        Ok(ProcessBase64Command {
            image_base64: self.image_base64,
            options,
        })
    }
}

impl ProcessPathRequest {
    pub fn into_command(self, force_random: bool) -> AppResult<ProcessPathCommand> {
        let options = background_options(
            self.bg_color,
            self.aspect_ratio,
            self.random_bg || force_random,
            self.sharpen.as_deref(),
        )?;

        Ok(ProcessPathCommand {
            input_image: PathBuf::from(self.input_image),
            output_image: self.output_image,
            options,
        })
    }
}
