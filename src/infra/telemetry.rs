use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::{
    application::post_form::SUBMIT_METRIC,
    config::{LogFormat, LoggingSettings},
    infra::appwrite::FAILURE_METRIC,
};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Crates whose request-level chatter only matters when debugging the
/// Appwrite connection.
const QUIET_CRATES: &[&str] = &["hyper", "hyper_util", "h2", "reqwest"];

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(logging.level)));

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

/// The configured level for megablog, HTTP client internals capped at `warn`
/// unless the configured level is already stricter.
fn default_directives(level: LevelFilter) -> String {
    let quiet = level.min(LevelFilter::WARN);
    let mut directives = vec![level.to_string().to_lowercase()];
    directives.extend(
        QUIET_CRATES
            .iter()
            .map(|krate| format!("{krate}={}", quiet.to_string().to_lowercase())),
    );
    directives.join(",")
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            SUBMIT_METRIC,
            Unit::Count,
            "Total number of post form submissions, labelled by mode and outcome."
        );
        describe_counter!(
            FAILURE_METRIC,
            Unit::Count,
            "Total number of failed Appwrite calls, labelled by HTTP status or `transport`."
        );
    });
}
