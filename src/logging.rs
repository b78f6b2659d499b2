use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

static SUBSCRIBER_INIT: std::sync::Once = std::sync::Once::new();

/// Configure and initialize logging for the application
///
/// Logs go to stderr so stdout stays free for the game report.
pub fn setup_logging() {
    SUBSCRIBER_INIT.call_once(|| {
        // Allow RUST_LOG to override levels; default to info for our crate and warn elsewhere
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{name}=info", name = env!("CARGO_CRATE_NAME"))));

        let registry = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(ErrorLayer::default());

        if let Err(e) = registry.try_init() {
            eprintln!("Failed to install tracing subscriber: {e}");
        }
    });
}
