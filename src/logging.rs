use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber for the server process.
///
/// `RUST_LOG` overrides the default `info` filter. Production writes one JSON
/// object per event with the enclosing `predict` span, so each line carries its
/// `request_id`. The actix access log arrives as `log` records and is bridged
/// by `init`.
pub fn setup_logging(environment: Environment) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    match environment {
        Environment::Production => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .init(),
        Environment::Development => registry
            .with(tracing_subscriber::fmt::layer().compact().with_target(false))
            .init(),
    }
}
