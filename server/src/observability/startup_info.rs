use canvasfit_application::infrastructure_config::Config;
use tracing::info;

pub fn print_api_info(config: &Config) {
    print_api_documentation_info(config);
    print_endpoint_info(config);
    print_configuration_info(config);
}

#[cfg(feature = "docs")]
fn print_api_documentation_info(config: &Config) {
    let base_url = format!("http://{}", config.server_address());
    info!("📋 API Documentation:");
    info!("  📖 Swagger UI: {}/docs", base_url);
    info!("  📄 OpenAPI JSON: {}/api-docs/openapi.json", base_url);
}

#[cfg(not(feature = "docs"))]
fn print_api_documentation_info(_config: &Config) {
    info!("📋 API Documentation: disabled (build with --features docs)");
}

fn print_endpoint_info(config: &Config) {
    let base_url = format!("http://{}", config.server_address());
    info!("🔗 Endpoints:");
    info!("  POST {}/api/process/base64[/randombg]", base_url);
    info!("  POST {}/api/process/path[/randombg]", base_url);
    info!("  GET  {}/health", base_url);
}

fn print_configuration_info(config: &Config) {
    info!("⚙️  Configuration:");
    info!(
        "  ✂️  Segmentation: {} (timeout {}s)",
        config.segmentation.api_url, config.segmentation.timeout_secs
    );
    info!(
        "  📁 Storage: input={}, output={}",
        config.storage.input_dir.display(),
        config.storage.output_dir.display()
    );
    info!(
        "  🎨 Background: default {}, random {}, palette of {}",
        config.background.default_color,
        if config.background.random_enabled {
            "ENABLED"
        } else {
            "DISABLED"
        },
        config.background.palette.len()
    );
    info!(
        "  📐 Compositing: default ratio {}, canvas limit {} px, sharpen {}",
        config.compositing.default_aspect_ratio,
        config.compositing.max_canvas_pixels,
        config
            .compositing
            .sharpen_method
            .map_or_else(|| "off".to_string(), |method| method.to_string())
    );
}
