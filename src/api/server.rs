//! HTTP server lifecycle: bind, serve in a background task, shut down.
//!
//! bind → spawn background task → return handle with shutdown channel.
//! `serve()` drives that lifecycle until Ctrl-C.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::router::comando_router;
use crate::api::types::ApiContext;
use crate::config::{ConfigError, ServerConfig};
use crate::interpreter::CommandInterpreter;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// ═══════════════════════════════════════════════════════════
// Running server handle
// ═══════════════════════════════════════════════════════════

/// Handle to a running server.
pub struct ServerHandle {
    pub session_id: String,
    pub addr: SocketAddr,
    pub started_at: String,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    /// Send the graceful shutdown signal. Safe to call twice.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Server shutdown signal sent");
        }
    }

    /// Shut down and wait for in-flight requests to finish.
    pub async fn stop(mut self) -> Result<(), ServerError> {
        self.shutdown();
        self.task.await??;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `config.addr` and start serving in a background task.
///
/// Port `0` binds an ephemeral port; the real address is on the handle.
pub async fn start_server(
    config: &ServerConfig,
    interpreter: CommandInterpreter,
) -> Result<ServerHandle, ServerError> {
    let origins = config.origin_headers()?;

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.addr,
            source,
        })?;
    let addr = listener.local_addr()?;

    let app = comando_router(ApiContext::new(interpreter), origins);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server started");
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await;
        if let Err(e) = &result {
            tracing::error!("Server error: {e}");
        }
        tracing::info!("Server stopped");
        result
    });

    Ok(ServerHandle {
        session_id: Uuid::new_v4().to_string(),
        addr,
        started_at: chrono::Utc::now().to_rfc3339(),
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

/// Serve with the system clock until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let server = start_server(&config, CommandInterpreter::default()).await?;
    tracing::info!(
        addr = %server.addr,
        origins = ?config.allowed_origins,
        session_id = %server.session_id,
        "Listening"
    );

    tokio::signal::ctrl_c().await?;
    server.stop().await
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::interpreter::FixedClock;

    fn ephemeral_config() -> ServerConfig {
        ServerConfig {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            ..ServerConfig::default()
        }
    }

    fn interpreter() -> CommandInterpreter {
        CommandInterpreter::new(Arc::new(FixedClock(2026)))
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let server = start_server(&ephemeral_config(), interpreter())
            .await
            .expect("server should start");

        assert!(!server.session_id.is_empty());
        assert!(server.addr.port() > 0);
        assert!(!server.started_at.is_empty());

        let url = format!("http://{}/", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.stop().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn server_interprets_commands() {
        let server = start_server(&ephemeral_config(), interpreter())
            .await
            .expect("server should start");

        let resp = reqwest::Client::new()
            .post(format!("http://{}/comando", server.addr))
            .header("Content-Type", "application/json")
            .body(r#"{"mensagem":"consulta paciente Ana com o médico Pedro no dia 05/12/2025 às 09:00 até 10:00"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["sucesso"], true);
        assert_eq!(json["dados"]["inicio"], "2025-12-05T09:00");

        server.stop().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_server(&ephemeral_config(), interpreter())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown(); // Second call should be safe
        server.stop().await.expect("clean shutdown");
    }

    #[tokio::test]
    async fn invalid_origin_is_rejected_before_binding() {
        let config = ServerConfig {
            allowed_origins: vec!["http://bad\norigin".into()],
            ..ephemeral_config()
        };
        let err = start_server(&config, interpreter()).await.err().unwrap();
        assert!(matches!(err, ServerError::Config(ConfigError::InvalidOrigin(_))));
    }
}
