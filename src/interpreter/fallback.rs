//! Last-resort extraction: four independent cue searches.
//!
//! Used only after every structured matcher has missed. It never captures
//! an end time and always labels the activity "Consulta".

use std::sync::LazyLock;

use regex::Regex;

use super::matchers::Matcher;
use super::types::{CapturedFields, DateParts, MatchAttempt};
use super::InterpretError;

static PATIENT_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"paciente\s+(?P<nome>[a-zà-ÿ0-9.\s]+?)(?:\s+com|\s+e|,|\.|$)")
        .expect("Invalid fallback regex")
});

static DOCTOR_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:m[eé]dic[oa]|dra?\.)\s+(?P<nome>[a-zà-ÿ0-9.\s]+?)(?:\s+dia|\s+para|\s+no|\s+às|\s+em|,|$)",
    )
    .expect("Invalid fallback regex")
});

static ANY_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}:\d{2}").expect("Invalid fallback regex"));

static ANY_SLASH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<dia>\d{1,2})[/-](?P<mes>\d{1,2})(?:[/-](?P<ano>\d{2,4}))?")
        .expect("Invalid fallback regex")
});

/// Finds a patient cue, a doctor cue, a time and a numeric date anywhere in
/// the text. All four must be present.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackExtractor;

impl FallbackExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Matcher for FallbackExtractor {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn attempt(&self, text: &str) -> Result<MatchAttempt, InterpretError> {
        let patient = PATIENT_CUE.captures(text).and_then(|c| c.name("nome"));
        let doctor = DOCTOR_CUE.captures(text).and_then(|c| c.name("nome"));
        let start = ANY_TIME.find(text);
        let date = ANY_SLASH_DATE.captures(text);

        let (Some(patient), Some(doctor), Some(start), Some(date)) = (patient, doctor, start, date)
        else {
            return Ok(MatchAttempt::NoStructuralMatch);
        };

        let (Some(day), Some(month)) = (date.name("dia"), date.name("mes")) else {
            return Err(InterpretError::Internal(
                "fallback date matched without day or month".into(),
            ));
        };

        Ok(MatchAttempt::Captured(CapturedFields {
            activity: "Consulta".to_string(),
            patient_span: patient.as_str().to_string(),
            doctor_span: doctor.as_str().to_string(),
            date: DateParts {
                day: day.as_str().to_string(),
                month: month.as_str().to_string(),
                year: date.name("ano").map(|m| m.as_str().to_string()),
            },
            start: start.as_str().to_string(),
            end: None,
        }))
    }
}
