//! Date and time token normalization.
//!
//! Turns the raw tokens captured by the matchers ("20", "outubro", "2025",
//! "9h30") into `YYYY-MM-DD` and `HH:MM`. Values are padded, never
//! range-checked: "13" as a month or "25" as an hour are kept as-is.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{NormalizedDate, NormalizedTime};
use super::InterpretError;

/// Full Portuguese month names, accent-free.
pub const MONTH_NAMES: [(&str, u32); 12] = [
    ("janeiro", 1),
    ("fevereiro", 2),
    ("marco", 3),
    ("abril", 4),
    ("maio", 5),
    ("junho", 6),
    ("julho", 7),
    ("agosto", 8),
    ("setembro", 9),
    ("outubro", 10),
    ("novembro", 11),
    ("dezembro", 12),
];

/// Three-letter abbreviations, tried on the first three characters of the token.
pub const MONTH_ABBREVIATIONS: [(&str, u32); 12] = [
    ("jan", 1),
    ("fev", 2),
    ("mar", 3),
    ("abr", 4),
    ("mai", 5),
    ("jun", 6),
    ("jul", 7),
    ("ago", 8),
    ("set", 9),
    ("out", 10),
    ("nov", 11),
    ("dez", 12),
];

static HOUR_MINUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2}):([0-9]{2})$").expect("Invalid time regex"));

static HOUR_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2})$").expect("Invalid time regex"));

/// Lowercase and strip Portuguese diacritics ("Março" → "marco").
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Resolve a month token: numeric as-is, then full name, then abbreviation.
fn month_number(token: &str) -> Option<u32> {
    let token = token.trim();
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse().ok();
    }

    let folded = fold_accents(token);
    if let Some(&(_, n)) = MONTH_NAMES.iter().find(|(name, _)| *name == folded) {
        return Some(n);
    }

    let prefix: String = folded.chars().take(3).collect();
    MONTH_ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == prefix)
        .map(|&(_, n)| n)
}

/// Build a `YYYY-MM-DD` date from raw day/month/year tokens.
///
/// A missing (or blank) year falls back to `current_year`. Two-digit years
/// are read as 20xx; anything from 100 up passes through.
pub fn resolve_date(
    day: &str,
    month: &str,
    year: Option<&str>,
    current_year: u32,
) -> Result<NormalizedDate, InterpretError> {
    let unresolved = || InterpretError::DateResolution {
        day: day.to_string(),
        month: month.to_string(),
        year: year.map(str::to_string),
    };

    let day_n: u32 = day.trim().parse().map_err(|_| unresolved())?;
    let month_n = month_number(month).ok_or_else(unresolved)?;

    let year_n = match year.map(str::trim).filter(|y| !y.is_empty()) {
        None => current_year,
        Some(y) => {
            let parsed: u32 = y.parse().map_err(|_| unresolved())?;
            if parsed < 100 {
                parsed + 2000
            } else {
                parsed
            }
        }
    };

    Ok(NormalizedDate::from_parts(year_n, month_n, day_n))
}

/// Build an `HH:MM` time from a raw token ("9", "9h", "9h30", "09:30").
///
/// A bare `"9h"` is read as `09:00`.
pub fn resolve_time(raw: &str) -> Result<NormalizedTime, InterpretError> {
    let unresolved = || InterpretError::TimeResolution(raw.to_string());

    let lowered = raw.trim().to_lowercase().replace('h', ":");
    // "9h" leaves a dangling separator; read it as a bare hour.
    let cleaned = lowered.strip_suffix(':').unwrap_or(&lowered);

    if let Some(caps) = HOUR_MINUTE.captures(cleaned) {
        let hour: u32 = caps[1].parse().map_err(|_| unresolved())?;
        return Ok(NormalizedTime::from_parts(hour, &caps[2]));
    }

    if let Some(caps) = HOUR_ONLY.captures(cleaned) {
        let hour: u32 = caps[1].parse().map_err(|_| unresolved())?;
        return Ok(NormalizedTime::from_parts(hour, "00"));
    }

    Err(unresolved())
}
