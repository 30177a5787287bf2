use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;
use crate::registration::Stage;

/// Initialize structured logging.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so they
/// never interleave with the interactive prompts on stdout.
pub fn init_telemetry(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    tracing::debug!("Zynix telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for one wizard session
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span carrying the session and stage of a wizard operation
pub fn create_registration_span(operation: &str, session_id: &str, stage: Stage) -> tracing::Span {
    tracing::info_span!(
        "registration",
        operation = operation,
        session.id = session_id,
        stage = %stage,
        otel.kind = "internal"
    )
}
