//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mensagem: &'static str,
    pub versao: &'static str,
}

/// `GET /`: liveness check.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        mensagem: "API OrganizaMed rodando.",
        versao: crate::config::APP_VERSION,
    })
}
