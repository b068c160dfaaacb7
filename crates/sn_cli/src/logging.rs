use std::sync::Once;

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Console,
    Json,
}

/// Installs the global subscriber once. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str, format: LogFormat) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.to_lowercase()))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let installed = match format {
            LogFormat::Console => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .try_init(),
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_current_span(false)
                .try_init(),
        };
        if let Err(e) = installed {
            eprintln!("Failed to install log subscriber: {}", e);
        }
    });
}
