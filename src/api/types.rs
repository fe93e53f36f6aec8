//! Shared types for the HTTP adapter.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::interpreter::{
    AppointmentDraft, CommandInterpreter, InterpretationFailure, InterpretationOutcome,
};

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes. The interpreter is stateless, so one
/// instance serves every request.
#[derive(Clone)]
pub struct ApiContext {
    pub interpreter: Arc<CommandInterpreter>,
}

impl ApiContext {
    pub fn new(interpreter: CommandInterpreter) -> Self {
        Self {
            interpreter: Arc::new(interpreter),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════════════════════

/// `POST /comando` body. Clients send the text as either field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComandoInput {
    #[serde(default)]
    pub mensagem: Option<String>,
    #[serde(default)]
    pub comando: Option<String>,
}

impl ComandoInput {
    /// First non-empty of `mensagem`, `comando`; otherwise `""`.
    pub fn text(&self) -> &str {
        [self.mensagem.as_deref(), self.comando.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

/// `POST /comando` reply: `{"sucesso": true, "dados": ...}` or
/// `{"sucesso": false, "erro": ..., "debug": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ComandoResponse {
    pub sucesso: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dados: Option<AppointmentDraft>,
    #[serde(flatten)]
    pub falha: Option<InterpretationFailure>,
}

impl From<InterpretationOutcome> for ComandoResponse {
    fn from(outcome: InterpretationOutcome) -> Self {
        match outcome {
            InterpretationOutcome::Success(draft) => Self {
                sucesso: true,
                dados: Some(draft),
                falha: None,
            },
            InterpretationOutcome::Failure(failure) => Self {
                sucesso: false,
                dados: None,
                falha: Some(failure),
            },
        }
    }
}
