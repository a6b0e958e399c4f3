use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::{Builder, NamedTempFile};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use domain::color::RgbColor;

use crate::{
    config::ProcessingSettings,
    error::{AppError, AppResult},
    ports::{
        incoming::processing::ImageProcessingUseCase,
        outgoing::{
            compositor::{CompositeRequest, DynCanvasCompositorPort},
            segmentation::DynSegmentationPort,
        },
    },
};

use super::{
    background::{BackgroundPolicy, resolve_background},
    commands::{BackgroundOptions, ProcessBase64Command, ProcessPathCommand, ProcessingResult},
    naming, payload,
};

const STAGED_INPUT_PREFIX: &str = "upload_";

pub struct ImageProcessingService {
    settings: Arc<ProcessingSettings>,
    segmentation: DynSegmentationPort,
    compositor: DynCanvasCompositorPort,
}

impl ImageProcessingService {
    pub fn new(
        settings: Arc<ProcessingSettings>,
        segmentation: DynSegmentationPort,
        compositor: DynCanvasCompositorPort,
    ) -> Self {
        Self {
            settings,
            segmentation,
            compositor,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ProcessingSettings {
        &self.settings
    }

    fn background_for(&self, options: &BackgroundOptions) -> AppResult<RgbColor> {
        let policy = BackgroundPolicy {
            default_color: self.settings.default_background,
            palette: &self.settings.palette,
            random_enabled: self.settings.random_background,
        };
        resolve_background(options.color, options.random, policy, &mut rand::rng())
    }

    fn resolve_input_path(&self, input: &Path) -> PathBuf {
        if input.is_absolute() {
            input.to_path_buf()
        } else {
            self.settings.input_dir.join(input)
        }
    }

    /// Writes an inline upload to a temp file that is deleted when the
    /// returned handle is dropped.
    async fn stage_inline_input(&self, bytes: &[u8]) -> AppResult<NamedTempFile> {
        let mut builder = Builder::new();
        builder.prefix(STAGED_INPUT_PREFIX).suffix(".png");

        let staged = match &self.settings.temp_dir {
            Some(dir) => {
                fs::create_dir_all(dir).await.map_err(|e| AppError::WriteError {
                    message: format!("Failed to create temp dir {}: {e}", dir.display()),
                })?;
                builder.tempfile_in(dir)
            }
            None => builder.tempfile(),
        }
        .map_err(|e| AppError::WriteError {
            message: format!("Failed to create temp file: {e}"),
        })?;

        fs::write(staged.path(), bytes)
            .await
            .map_err(|e| AppError::WriteError {
                message: format!("Failed to stage upload at {}: {e}", staged.path().display()),
            })?;

        debug!("Staged {} upload bytes at {}", bytes.len(), staged.path().display());
        Ok(staged)
    }

    async fn composite(
        &self,
        segmented_path: &Path,
        background: RgbColor,
        options: &BackgroundOptions,
        output_path: PathBuf,
    ) -> AppResult<PathBuf> {
        let request = CompositeRequest {
            segmented_path: segmented_path.to_path_buf(),
            background,
            aspect_ratio: options.canvas.resolve(self.settings.default_aspect_ratio),
            sharpen: options.sharpen.or(self.settings.sharpen_method),
            output_path,
        };
        self.compositor.composite(request).await
    }
}

#[async_trait::async_trait]
impl ImageProcessingUseCase for ImageProcessingService {
    #[instrument(skip(self, command), fields(payload_len = command.image_base64.len()))]
    async fn process_base64(&self, command: ProcessBase64Command) -> AppResult<ProcessingResult> {
        let background = self.background_for(&command.options)?;

        let bytes = payload::decode(&command.image_base64).map_err(|e| AppError::InvalidPayload {
            message: format!("image_base64 is not valid base64: {e}"),
        })?;
        if bytes.is_empty() {
            return Err(AppError::InvalidPayload {
                message: "image_base64 decodes to an empty image".to_string(),
            });
        }

        let staged = self.stage_inline_input(&bytes).await?;
        let stem = naming::file_stem(staged.path())?.to_string();

        let segmented_path = self
            .segmentation
            .segment(staged.path(), Some(&naming::segmented_name(&stem)))
            .await?;

        if let Err(e) = staged.close() {
            warn!("Failed to remove staged upload: {}", e);
        }

        let output_path = self
            .settings
            .output_dir
            .join(naming::inline_processed_name(&stem));
        let final_path = self
            .composite(&segmented_path, background, &command.options, output_path)
            .await?;

        let processed = fs::read(&final_path).await?;

        info!(
            "Processed inline image: segmented={}, final={}",
            segmented_path.display(),
            final_path.display()
        );

        Ok(ProcessingResult {
            segmented_path,
            final_path,
            result_base64: Some(payload::encode_png_data_uri(&processed)),
        })
    }

    #[instrument(skip(self, command), fields(input = %command.input_image.display()))]
    async fn process_path(&self, command: ProcessPathCommand) -> AppResult<ProcessingResult> {
        let background = self.background_for(&command.options)?;

        let output_name = command
            .output_image
            .as_deref()
            .map(naming::validate_output_name)
            .transpose()?;

        let input = self.resolve_input_path(&command.input_image);
        let is_file = fs::metadata(&input)
            .await
            .as_ref()
            .is_ok_and(Metadata::is_file);
        if !is_file {
            return Err(AppError::InputNotFound { path: input });
        }

        let stem = naming::file_stem(&input)?;
        let segmented_name = naming::segmented_name(stem);
        if output_name == Some(segmented_name.as_str()) {
            return Err(AppError::ValidationError {
                message: format!(
                    "output_image '{segmented_name}' would overwrite the segmented intermediate"
                ),
            });
        }

        let segmented_path = self
            .segmentation
            .segment(&input, Some(&segmented_name))
            .await?;

        let final_name = output_name.map_or_else(
            || {
                let ratio = command
                    .options
                    .canvas
                    .resolve(self.settings.default_aspect_ratio);
                naming::processed_name(stem, ratio)
            },
            ToString::to_string,
        );
        let output_path = self.settings.output_dir.join(final_name);

        let final_path = self
            .composite(&segmented_path, background, &command.options, output_path)
            .await?;

        info!(
            "Processed {}: segmented={}, final={}",
            input.display(),
            segmented_path.display(),
            final_path.display()
        );

        Ok(ProcessingResult {
            segmented_path,
            final_path,
            result_base64: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs as std_fs;
    use std::sync::Mutex;

    use tempfile::TempDir;

    use domain::{aspect_ratio::AspectRatio, sharpen::SharpenMethod};

    use super::*;
    use crate::{
        ports::outgoing::{compositor::CanvasCompositorPort, segmentation::SegmentationPort},
        processing::commands::CanvasFit,
    };

    #[derive(Debug, Clone)]
    struct SegmentCall {
        input: PathBuf,
        input_bytes: Option<Vec<u8>>,
        output_name: Option<String>,
    }

    struct FakeSegmentation {
        output_dir: PathBuf,
        fail_with_status: Option<u16>,
        calls: Mutex<Vec<SegmentCall>>,
    }

    impl FakeSegmentation {
        fn calls(&self) -> Vec<SegmentCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl SegmentationPort for FakeSegmentation {
        async fn segment(&self, input: &Path, output_name: Option<&str>) -> AppResult<PathBuf> {
            self.calls.lock().unwrap().push(SegmentCall {
                input: input.to_path_buf(),
                input_bytes: std_fs::read(input).ok(),
                output_name: output_name.map(ToString::to_string),
            });

            if let Some(status) = self.fail_with_status {
                return Err(AppError::RemoteError {
                    status,
                    message: "Service Unavailable".to_string(),
                });
            }

            let path = self.output_dir.join(output_name.unwrap_or("segmented.png"));
            std_fs::write(&path, b"segmented").unwrap();
            Ok(path)
        }
    }

    #[derive(Default)]
    struct FakeCompositor {
        requests: Mutex<Vec<CompositeRequest>>,
    }

    impl FakeCompositor {
        fn requests(&self) -> Vec<CompositeRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CanvasCompositorPort for FakeCompositor {
        async fn composite(&self, request: CompositeRequest) -> AppResult<PathBuf> {
            std_fs::write(&request.output_path, b"composited").unwrap();
            let path = request.output_path.clone();
            self.requests.lock().unwrap().push(request);
            Ok(path)
        }
    }

    struct Harness {
        service: ImageProcessingService,
        segmentation: Arc<FakeSegmentation>,
        compositor: Arc<FakeCompositor>,
        input_dir: TempDir,
        output_dir: TempDir,
        temp_dir: TempDir,
    }

    fn harness(fail_with_status: Option<u16>) -> Harness {
        let input_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let temp_dir = TempDir::new().unwrap();

        let settings = Arc::new(ProcessingSettings {
            input_dir: input_dir.path().to_path_buf(),
            output_dir: output_dir.path().to_path_buf(),
            temp_dir: Some(temp_dir.path().to_path_buf()),
            default_background: RgbColor::WHITE,
            palette: vec![RgbColor::new(1, 2, 3), RgbColor::new(4, 5, 6)].into(),
            random_background: false,
            default_aspect_ratio: AspectRatio::PORTRAIT_9_16,
            sharpen_method: None,
        });

        let segmentation = Arc::new(FakeSegmentation {
            output_dir: output_dir.path().to_path_buf(),
            fail_with_status,
            calls: Mutex::new(Vec::new()),
        });
        let compositor = Arc::new(FakeCompositor::default());

        let service = ImageProcessingService::new(
            settings,
            Arc::clone(&segmentation) as DynSegmentationPort,
            Arc::clone(&compositor) as DynCanvasCompositorPort,
        );

        Harness {
            service,
            segmentation,
            compositor,
            input_dir,
            output_dir,
            temp_dir,
        }
    }

    fn dir_entries(dir: &TempDir) -> Vec<PathBuf> {
        std_fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    fn inline_command(options: BackgroundOptions) -> ProcessBase64Command {
        ProcessBase64Command {
            image_base64: payload::encode_png_data_uri(b"original image bytes"),
            options,
        }
    }

    #[tokio::test]
    async fn conflicting_background_is_rejected_before_segmentation() {
        let h = harness(None);
        let options = BackgroundOptions {
            color: Some(RgbColor::new(10, 20, 30)),
            random: true,
            ..BackgroundOptions::default()
        };

        let result = h.service.process_base64(inline_command(options.clone())).await;
        assert!(matches!(result, Err(AppError::ConflictingRequest { .. })));

        std_fs::write(h.input_dir.path().join("car.jpg"), b"jpeg").unwrap();
        let result = h
            .service
            .process_path(ProcessPathCommand {
                input_image: PathBuf::from("car.jpg"),
                output_image: None,
                options,
            })
            .await;
        assert!(matches!(result, Err(AppError::ConflictingRequest { .. })));

        assert!(h.segmentation.calls().is_empty());
        assert!(dir_entries(&h.temp_dir).is_empty());
    }

    #[tokio::test]
    async fn inline_request_stages_segments_and_reencodes() {
        let h = harness(None);

        let result = h
            .service
            .process_base64(inline_command(BackgroundOptions::default()))
            .await
            .unwrap();

        let calls = h.segmentation.calls();
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.input_bytes.as_deref(), Some(&b"original image bytes"[..]));
        assert!(call.input.starts_with(h.temp_dir.path()));
        assert!(call.output_name.as_deref().unwrap().ends_with("_segmented.png"));

        assert!(result.final_path.starts_with(h.output_dir.path()));
        assert!(result.final_path.to_string_lossy().ends_with("_processed.png"));
        assert_eq!(
            result.result_base64.as_deref(),
            Some(payload::encode_png_data_uri(b"composited").as_str())
        );

        let requests = h.compositor.requests();
        assert_eq!(requests[0].background, RgbColor::WHITE);
        assert_eq!(requests[0].aspect_ratio, Some(AspectRatio::PORTRAIT_9_16));
        assert_eq!(requests[0].segmented_path, result.segmented_path);

        assert!(!call.input.exists());
        assert!(dir_entries(&h.temp_dir).is_empty());
    }

    #[tokio::test]
    async fn remote_failure_leaves_no_artifacts_behind() {
        let h = harness(Some(503));

        let result = h
            .service
            .process_base64(inline_command(BackgroundOptions::default()))
            .await;

        assert!(matches!(result, Err(AppError::RemoteError { status: 503, .. })));
        assert_eq!(h.segmentation.calls().len(), 1);
        assert!(h.compositor.requests().is_empty());
        assert!(dir_entries(&h.temp_dir).is_empty());
        assert!(dir_entries(&h.output_dir).is_empty());
    }

    #[tokio::test]
    async fn malformed_inline_payload_is_a_client_error() {
        let h = harness(None);
        let command = ProcessBase64Command {
            image_base64: "data:image/png;base64,***".to_string(),
            options: BackgroundOptions::default(),
        };

        let err = h.service.process_base64(command).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidPayload { .. }));
        assert!(err.is_client_error());
        assert!(h.segmentation.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_input_is_reported_before_segmentation() {
        let h = harness(None);
        let result = h
            .service
            .process_path(ProcessPathCommand {
                input_image: PathBuf::from("missing.jpg"),
                output_image: None,
                options: BackgroundOptions::default(),
            })
            .await;

        match result {
            Err(AppError::InputNotFound { path }) => {
                assert_eq!(path, h.input_dir.path().join("missing.jpg"));
            }
            other => panic!("expected InputNotFound, got {other:?}"),
        }
        assert!(h.segmentation.calls().is_empty());
    }

    #[tokio::test]
    async fn path_request_names_artifacts_by_ratio() {
        let h = harness(None);
        let input = h.input_dir.path().join("car.jpg");
        std_fs::write(&input, b"jpeg").unwrap();

        let portrait = h
            .service
            .process_path(ProcessPathCommand {
                input_image: input.clone(),
                output_image: None,
                options: BackgroundOptions::default(),
            })
            .await
            .unwrap();
        assert_eq!(portrait.final_path, h.output_dir.path().join("car_processed_9_16.jpg"));
        assert_eq!(portrait.segmented_path, h.output_dir.path().join("car_segmented.png"));
        assert_eq!(portrait.result_base64, None);

        let landscape = h
            .service
            .process_path(ProcessPathCommand {
                input_image: PathBuf::from("car.jpg"),
                output_image: None,
                options: BackgroundOptions {
                    canvas: CanvasFit::Ratio(AspectRatio::new(16, 9).unwrap()),
                    ..BackgroundOptions::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(landscape.final_path, h.output_dir.path().join("car_processed_16_9.jpg"));

        let native = h
            .service
            .process_path(ProcessPathCommand {
                input_image: input.clone(),
                output_image: None,
                options: BackgroundOptions {
                    canvas: CanvasFit::Native,
                    ..BackgroundOptions::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(native.final_path, h.output_dir.path().join("car_processed_original.jpg"));

        let ratios: Vec<_> = h.compositor.requests().iter().map(|r| r.aspect_ratio).collect();
        assert_eq!(
            ratios,
            vec![
                Some(AspectRatio::PORTRAIT_9_16),
                Some(AspectRatio::new(16, 9).unwrap()),
                None
            ]
        );
    }

    #[tokio::test]
    async fn explicit_output_name_and_options_are_forwarded() {
        let h = harness(None);
        std_fs::write(h.input_dir.path().join("shoe.png"), b"png").unwrap();

        let result = h
            .service
            .process_path(ProcessPathCommand {
                input_image: PathBuf::from("shoe.png"),
                output_image: Some("shoe_final.png".to_string()),
                options: BackgroundOptions {
                    color: Some(RgbColor::new(0, 128, 255)),
                    sharpen: Some(SharpenMethod::Unsharp),
                    ..BackgroundOptions::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(result.final_path, h.output_dir.path().join("shoe_final.png"));
        let request = &h.compositor.requests()[0];
        assert_eq!(request.background, RgbColor::new(0, 128, 255));
        assert_eq!(request.sharpen, Some(SharpenMethod::Unsharp));
    }

    #[tokio::test]
    async fn output_name_cannot_escape_output_dir() {
        let h = harness(None);
        std_fs::write(h.input_dir.path().join("shoe.png"), b"png").unwrap();

        let result = h
            .service
            .process_path(ProcessPathCommand {
                input_image: PathBuf::from("shoe.png"),
                output_image: Some("../outside.png".to_string()),
                options: BackgroundOptions::default(),
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError { .. })));
        assert!(h.segmentation.calls().is_empty());
    }

    #[tokio::test]
    async fn output_name_cannot_collide_with_segmented_intermediate() {
        let h = harness(None);
        std_fs::write(h.input_dir.path().join("car.jpg"), b"jpeg").unwrap();

        let result = h
            .service
            .process_path(ProcessPathCommand {
                input_image: PathBuf::from("car.jpg"),
                output_image: Some("car_segmented.png".to_string()),
                options: BackgroundOptions::default(),
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError { .. })));
        assert!(h.segmentation.calls().is_empty());
        assert!(h.compositor.requests().is_empty());
        assert!(dir_entries(&h.output_dir).is_empty());

        // Another stem's intermediate name is an ordinary output name.
        let result = h
            .service
            .process_path(ProcessPathCommand {
                input_image: PathBuf::from("car.jpg"),
                output_image: Some("bike_segmented.png".to_string()),
                options: BackgroundOptions::default(),
            })
            .await
            .unwrap();
        assert_ne!(result.segmented_path, result.final_path);
    }

    #[tokio::test]
    async fn random_background_comes_from_palette() {
        let h = harness(None);
        std_fs::write(h.input_dir.path().join("cup.png"), b"png").unwrap();

        h.service
            .process_path(ProcessPathCommand {
                input_image: PathBuf::from("cup.png"),
                output_image: None,
                options: BackgroundOptions {
                    random: true,
                    ..BackgroundOptions::default()
                },
            })
            .await
            .unwrap();

        let background = h.compositor.requests()[0].background;
        assert!(h.service.settings().palette.contains(&background));
    }
}
