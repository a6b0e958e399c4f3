use image::{DynamicImage, ImageError, ImageFormat, ImageReader, Rgba, RgbaImage, imageops};
use std::fs;
use std::path::PathBuf;
use tokio::task::spawn_blocking;
use tracing::{debug, info, instrument};

use canvasfit_application::{
    error::{AppError, AppResult},
    infrastructure_config::Config,
    ports::outgoing::compositor::{CanvasCompositorPort, CompositeRequest},
};
use domain::{
    canvas::{CanvasSize, DEFAULT_MAX_CANVAS_PIXELS, center_offset, fit_canvas},
    sharpen::UnsharpMask,
};

use super::sharpen::sharpen;

#[derive(Debug, Clone, Copy)]
pub struct ImageCanvasCompositor {
    unsharp: UnsharpMask,
    max_canvas_pixels: u64,
}

impl Default for ImageCanvasCompositor {
    fn default() -> Self {
        Self::new(UnsharpMask::DEFAULT, DEFAULT_MAX_CANVAS_PIXELS)
    }
}

impl ImageCanvasCompositor {
    pub fn new(unsharp: UnsharpMask, max_canvas_pixels: u64) -> Self {
        Self {
            unsharp,
            max_canvas_pixels,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(UnsharpMask::DEFAULT, config.compositing.max_canvas_pixels)
    }

    fn composition_error(message: impl Into<String>) -> AppError {
        AppError::CompositionError {
            message: message.into(),
        }
    }

    fn load_foreground(request: &CompositeRequest) -> AppResult<RgbaImage> {
        let path = &request.segmented_path;
        let image = ImageReader::open(path)
            .map_err(|e| Self::composition_error(format!("{}: {e}", path.display())))?
            .with_guessed_format()
            .map_err(|e| Self::composition_error(format!("{}: {e}", path.display())))?
            .decode()
            .map_err(|e| Self::composition_error(format!("{}: {e}", path.display())))?;

        Ok(image.to_rgba8())
    }

    fn save(canvas: RgbaImage, request: &CompositeRequest, format: ImageFormat) -> AppResult<()> {
        let output = &request.output_path;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::WriteError {
                message: format!("{}: {e}", parent.display()),
            })?;
        }

        let flattened = DynamicImage::ImageRgba8(canvas).to_rgb8();
        flattened
            .save_with_format(output, format)
            .map_err(|e| match e {
                ImageError::IoError(io) => AppError::WriteError {
                    message: format!("{}: {io}", output.display()),
                },
                other => Self::composition_error(format!("{}: {other}", output.display())),
            })
    }

    #[instrument(skip(self, request), fields(output = %request.output_path.display()))]
    fn render(&self, request: &CompositeRequest) -> AppResult<PathBuf> {
        let format = ImageFormat::from_path(&request.output_path)
            .ok()
            .filter(ImageFormat::writing_enabled)
            .ok_or_else(|| {
                Self::composition_error(format!(
                    "unsupported output format for {}",
                    request.output_path.display()
                ))
            })?;

        let mut foreground = Self::load_foreground(request)?;
        if let Some(method) = request.sharpen {
            debug!("Applying {} before compositing", method);
            foreground = sharpen(&foreground, method, self.unsharp);
        }

        let (width, height) = foreground.dimensions();
        let image_size = CanvasSize::new(width, height);
        let canvas_size = fit_canvas(image_size, request.aspect_ratio)?;
        // Must run before the canvas buffer is allocated.
        canvas_size.ensure_within(self.max_canvas_pixels)?;
        let offset = center_offset(canvas_size, image_size);

        let mut canvas = RgbaImage::from_pixel(
            canvas_size.width,
            canvas_size.height,
            Rgba(request.background.to_rgba()),
        );
        imageops::overlay(
            &mut canvas,
            &foreground,
            i64::from(offset.x),
            i64::from(offset.y),
        );

        Self::save(canvas, request, format)?;

        info!(
            "Composited {} onto {} canvas {} at ({}, {})",
            image_size, request.background, canvas_size, offset.x, offset.y
        );
        Ok(request.output_path.clone())
    }
}

#[async_trait::async_trait]
impl CanvasCompositorPort for ImageCanvasCompositor {
    async fn composite(&self, request: CompositeRequest) -> AppResult<PathBuf> {
        let compositor = *self;
        spawn_blocking(move || compositor.render(&request))
            .await
            .map_err(|e| AppError::TaskError {
                message: format!("Compositing task failed: {e}"),
            })?
    }
}
