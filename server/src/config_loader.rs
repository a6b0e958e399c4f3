use canvasfit_application::error::{AppError, AppResult};
use canvasfit_application::infrastructure_config::Config;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml},
};
use std::fs;
use std::path::Path;
use tracing::info;

pub const ENV_PREFIX: &str = "CANVASFIT_";

pub fn load_config() -> AppResult<Config> {
    generate_env_template_if_missing()?;
    load_config_from(Path::new("."))
}

/// Layers defaults, `config.toml`, `config.json` found in `dir`, then
/// `CANVASFIT_*` environment variables (`__` separates nested keys).
pub fn load_config_from(dir: &Path) -> AppResult<Config> {
    let default_config = Config::default();
    let mut figment = Figment::from(Serialized::defaults(default_config));

    let toml_path = dir.join("config.toml");
    if toml_path.exists() {
        figment = figment.merge(Toml::file(toml_path));
    }

    let json_path = dir.join("config.json");
    if json_path.exists() {
        figment = figment.merge(Json::file(json_path));
    }

    let config: Config = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| AppError::ConfigError {
            message: format!("Failed to load configuration: {e}"),
        })?;

    config.validate()?;
    Ok(config)
}

fn generate_env_template_if_missing() -> AppResult<()> {
    let env_file = ".env";
    let template_file = ".env.example";

    if Path::new(env_file).exists() {
        return Ok(());
    }

    if !Path::new(template_file).exists() {
        return Ok(());
    }

    fs::copy(template_file, env_file).map_err(|e| AppError::ConfigError {
        message: format!("Failed to generate .env file from template: {e}"),
    })?;

    info!(
        "Generated .env from template. Point CANVASFIT_SEGMENTATION__API_URL at your segmentation service."
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvasfit_application::infrastructure_config::LogFormat;
    use domain::{aspect_ratio::AspectRatio, color::RgbColor, sharpen::SharpenMethod};
    use figment::Jail;

    #[test]
    fn files_and_env_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [segmentation]
                api_url = "http://segmenter.internal:51055/api/segmentation/base64"
                timeout_secs = 15

                [background]
                default_color = [0, 0, 0]

                [compositing]
                default_aspect_ratio = [16, 9]
                sharpen_method = "unsharp"
                "#,
            )?;
            jail.create_file("config.json", r#"{ "logging": { "format": "json" } }"#)?;
            jail.set_env("CANVASFIT_SERVER__PORT", "9000");
            jail.set_env("CANVASFIT_STORAGE__OUTPUT_DIR", "/srv/out");

            let config = load_config_from(jail.directory()).unwrap();

            assert_eq!(
                config.segmentation.api_url,
                "http://segmenter.internal:51055/api/segmentation/base64"
            );
            assert_eq!(config.segmentation.timeout_secs, 15);
            assert_eq!(config.background.default_color, RgbColor::new(0, 0, 0));
            assert_eq!(
                config.compositing.default_aspect_ratio,
                AspectRatio::new(16, 9).unwrap()
            );
            assert_eq!(config.compositing.sharpen_method, Some(SharpenMethod::Unsharp));
            assert!(matches!(config.logging.format, LogFormat::Json));
            assert_eq!(config.server.port, 9000);
            assert_eq!(config.storage.output_dir, Path::new("/srv/out"));
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_config_errors() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [compositing]
                default_aspect_ratio = [9, 16]
                sharpen_method = "emboss"
                "#,
            )?;
            assert!(matches!(
                load_config_from(jail.directory()),
                Err(AppError::ConfigError { .. })
            ));
            Ok(())
        });

        Jail::expect_with(|jail| {
            jail.set_env("CANVASFIT_SEGMENTATION__TIMEOUT_SECS", "0");
            assert!(matches!(
                load_config_from(jail.directory()),
                Err(AppError::ConfigError { .. })
            ));
            Ok(())
        });
    }
}
