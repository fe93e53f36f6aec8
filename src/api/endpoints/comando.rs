//! Command interpretation endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ComandoInput, ComandoResponse};

/// `POST /comando`: interpret one scheduling command.
///
/// Interpretation failures are still `200`; only an unreadable body is an
/// error.
pub async fn interpret(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ComandoInput>, JsonRejection>,
) -> Result<Json<ComandoResponse>, ApiError> {
    let Json(input) = payload?;
    let outcome = ctx.interpreter.interpret(input.text());
    Ok(Json(ComandoResponse::from(outcome)))
}
