use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::InterpretError;

// ═══════════════════════════════════════════════════════════
// Normalized values
// ═══════════════════════════════════════════════════════════

/// Calendar-shaped date string `YYYY-MM-DD`.
///
/// Components are zero-padded but not range-checked: month `13` is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDate(String);

impl NormalizedDate {
    pub(crate) fn from_parts(year: u32, month: u32, day: u32) -> Self {
        Self(format!("{year:04}-{month:02}-{day:02}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clock-shaped time string `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTime(String);

impl NormalizedTime {
    pub(crate) fn from_parts(hour: u32, minute: &str) -> Self {
        Self(format!("{hour:02}:{minute}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ═══════════════════════════════════════════════════════════
// Matcher output (raw, not yet normalized)
// ═══════════════════════════════════════════════════════════

/// Raw date tokens exactly as captured from the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParts {
    pub day: String,
    /// Either a number ("12") or a month word ("dezembro", "dez").
    pub month: String,
    pub year: Option<String>,
}

/// Field set captured by one matcher strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFields {
    /// Already-normalized activity label ("Consulta", "Exame", ...).
    pub activity: String,
    pub patient_span: String,
    pub doctor_span: String,
    pub date: DateParts,
    pub start: String,
    pub end: Option<String>,
}

/// Result of running a single strategy against the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchAttempt {
    Captured(CapturedFields),
    NoStructuralMatch,
}

// ═══════════════════════════════════════════════════════════
// Interpreter output
// ═══════════════════════════════════════════════════════════

/// Structured appointment extracted from a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub tipo_atividade: String,
    pub paciente_nome: String,
    pub medico_nome: String,
    /// `YYYY-MM-DDTHH:MM`, local time, no offset.
    pub inicio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fim: Option<String>,
}

impl AppointmentDraft {
    /// Both timestamps are built from the same date so `fim` always shares
    /// the date prefix of `inicio`.
    pub fn new(
        tipo_atividade: String,
        paciente_nome: String,
        medico_nome: String,
        date: &NormalizedDate,
        start: &NormalizedTime,
        end: Option<&NormalizedTime>,
    ) -> Self {
        Self {
            tipo_atividade,
            paciente_nome,
            medico_nome,
            inicio: format!("{date}T{start}"),
            fim: end.map(|t| format!("{date}T{t}")),
        }
    }
}

/// Terminal failure plus the (trimmed, original-case) input for debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretationFailure {
    pub reason: InterpretError,
    pub echo: Option<String>,
}

impl Serialize for InterpretationFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct DebugEcho<'a> {
            texto_recebido: &'a str,
        }

        let fields = if self.echo.is_some() { 2 } else { 1 };
        let mut state = serializer.serialize_struct("InterpretationFailure", fields)?;
        state.serialize_field("erro", &self.reason.to_string())?;
        if let Some(echo) = &self.echo {
            state.serialize_field("debug", &DebugEcho { texto_recebido: echo })?;
        }
        state.end()
    }
}

/// What a single `interpret` call produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum InterpretationOutcome {
    Success(AppointmentDraft),
    Failure(InterpretationFailure),
}

impl InterpretationOutcome {
    pub fn failure(reason: InterpretError, echo: Option<String>) -> Self {
        Self::Failure(InterpretationFailure { reason, echo })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn draft(&self) -> Option<&AppointmentDraft> {
        match self {
            Self::Success(draft) => Some(draft),
            Self::Failure(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&InterpretError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(f) => Some(&f.reason),
        }
    }

    pub fn into_result(self) -> Result<AppointmentDraft, InterpretationFailure> {
        match self {
            Self::Success(draft) => Ok(draft),
            Self::Failure(f) => Err(f),
        }
    }
}
