//! Scheduling command interpreter.
//!
//! Turns an informal Portuguese request such as
//! "marcar consulta para Maria Souza com Dr. João no dia 20 de outubro de 2025
//! das 10:00 às 11:00" into an [`AppointmentDraft`].
//!
//! ```text
//! raw text → CommandInterpreter → MatcherChain (first normalizable match wins)
//!                               → FallbackExtractor → Failure
//! ```
//!
//! Everything in this module is pure: no I/O, no shared mutable state. The
//! only ambient input is the current year, read through the [`Clock`] trait.

pub mod clock;
pub mod datetime;
pub mod fallback;
pub mod matchers;
pub mod names;
pub mod orchestrator;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use datetime::{resolve_date, resolve_time};
pub use fallback::FallbackExtractor;
pub use matchers::{Matcher, MatcherChain, PatternMatcher};
pub use names::clean_name;
pub use orchestrator::CommandInterpreter;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    #[error("empty input")]
    EmptyInput,

    #[error("could not resolve date (day={day:?}, month={month:?}, year={year:?})")]
    DateResolution {
        day: String,
        month: String,
        year: Option<String>,
    },

    #[error("could not resolve time {0:?}")]
    TimeResolution(String),

    #[error("no pattern matched")]
    NoPatternMatch,

    #[error("internal error: {0}")]
    Internal(String),
}

impl InterpretError {
    /// Errors that only abandon the current matcher attempt.
    pub fn is_attempt_local(&self) -> bool {
        matches!(
            self,
            InterpretError::DateResolution { .. } | InterpretError::TimeResolution(_)
        )
    }
}
