//! Name span cleanup.
//!
//! Matchers capture generous spans ("consulta para o paciente maria",
//! "o médico dr. pedro"). This module peels the conversational filler off the
//! front, drops an honorific and produces a title-cased display name.

use std::sync::LazyLock;

use regex::Regex;

/// Leading filler, in priority order. Each pattern is anchored at the start.
static FILLER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(?:uma\s+)?consulta\s+para\s+(?:o|a)\s+paciente\s+",
        r"(?i)^(?:uma|um)\s+",
        r"(?i)^(?:consulta\s+online|teleconsulta|consulta|cirurgia|retorno|exame)\s+",
        r"(?i)^(?:entre\s+)?(?:o|a)\s+paciente\s+",
        r"(?i)^paciente\s+",
        r"(?i)^para\s+(?:o|a)\s+",
        r"(?i)^para\s+",
        r"(?i)^(?:o|a)\s+m[eé]dic[oa]\s+",
        r"(?i)^m[eé]dic[oa]\s+",
        r"(?i)^(?:com|e|o|a)\s+",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("Invalid filler regex"))
    .collect()
});

static HONORIFIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:dra|dr|sra|sr)(?:\.\s*|\s+)").expect("Invalid honorific regex")
});

/// Turn a captured span into a display name ("o médico dr. joão" → "João").
///
/// Returns an empty string when the span held nothing but filler.
pub fn clean_name(raw_span: &str) -> String {
    let mut rest = raw_span.trim();

    // Restart from the top after every strip so stacked prefixes peel in order.
    'peel: loop {
        for pattern in FILLER_PATTERNS.iter() {
            if let Some(m) = pattern.find(rest) {
                rest = &rest[m.end()..];
                continue 'peel;
            }
        }
        break;
    }

    if let Some(m) = HONORIFIC.find(rest) {
        rest = &rest[m.end()..];
    }

    let collapsed = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    title_case(&collapsed)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
/// Accented letters are preserved ("joão" → "João").
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
