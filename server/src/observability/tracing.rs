use std::{error::Error, io::stdout};
use tracing::info;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{
    EnvFilter, filter::ParseError, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use canvasfit_application::infrastructure_config::{Config, LogFormat};

pub const SERVICE_NAME: &str = "canvasfit-backend";

/// Connection-level crates that log every request to the segmentation
/// service; capped at `warn` unless `RUST_LOG` says otherwise.
const TRANSPORT_TARGETS: [&str; 3] = ["hyper_util", "reqwest", "h2"];

fn filter_directives(level: &str) -> String {
    let mut directives = vec![level.trim().to_string()];
    directives.extend(TRANSPORT_TARGETS.iter().map(|target| format!("{target}=warn")));
    directives.join(",")
}

/// `RUST_LOG` wins; otherwise `logging.level` plus the transport caps. A
/// malformed level is reported instead of silently falling back.
fn env_filter(config: &Config) -> Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(filter_directives(&config.logging.level)),
    }
}

pub fn setup_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    let filter = env_filter(config)?;
    let logging = &config.logging;

    match logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(SERVICE_NAME.to_string(), stdout))
                .try_init()?;
        }
        LogFormat::Pretty => {
            let format = fmt::format()
                .with_target(true)
                .with_file(logging.include_location)
                .with_line_number(logging.include_location)
                .compact();

            tracing_subscriber::fmt()
                .event_format(format)
                .with_env_filter(filter)
                .try_init()
                .map_err(|err| -> Box<dyn Error> { err })?;
        }
    }

    info!(
        service = SERVICE_NAME,
        level = %logging.level,
        format = ?logging.format,
        include_location = logging.include_location,
        "Logging initialised"
    );
    Ok(())
}
