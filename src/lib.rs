pub mod api; // HTTP adapter
pub mod config;
pub mod interpreter; // Command interpretation core
pub mod registry; // Draft → activity request

use tracing_subscriber::EnvFilter;

pub use interpreter::{AppointmentDraft, CommandInterpreter, InterpretError, InterpretationOutcome};

/// Load config, initialize tracing and serve until Ctrl-C.
pub async fn run() -> Result<(), api::ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let server_config = config::ServerConfig::from_env()?;
    api::serve(server_config).await
}
