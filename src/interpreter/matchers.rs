//! Ordered extraction strategies.
//!
//! Each strategy is one regex assembled from shared clause fragments
//! (keyword vocabularies, name spans, date and time-range shapes). The chain
//! tries them in priority order on lower-cased text and stops at the first
//! capture the caller accepts.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::types::{CapturedFields, DateParts, MatchAttempt};
use super::InterpretError;

// ═══════════════════════════════════════════════════════════
// Vocabularies and clause fragments
// ═══════════════════════════════════════════════════════════

/// Imperative verbs that open a "marcar X com Y" command.
pub const IMPERATIVE_VERBS: &[&str] = &["marcar", "marque", "marca", "agendar", "agende", "agenda"];

/// Activity keywords. Longer forms first so "consulta online" wins over "consulta".
pub const ACTIVITY_KEYWORDS: &[&str] = &[
    "consulta online",
    "teleconsulta",
    "consulta",
    "cirurgia",
    "retorno",
    "exame",
    "agendar",
    "marcar",
];

const NAME_SPAN: &str = r"[a-zà-ÿ0-9.\s]+?";
const LETTER_SPAN: &str = r"[a-zà-ÿ.\s]+?";

const DATE_INTRO: &str = r"(?:para\s+o\s+dia|no\s+dia|dia|em|para)";
/// The year ends at a space, comma or end of text; "dezembro 10:00" has no year.
const NAMED_DATE: &str =
    r"(?P<dia>\d{1,2})\s*(?:de\s+)?(?P<mes>[a-zà-ÿ]+|\d{1,2})(?:\s*(?:de\s+)?(?P<ano>\d{2,4})(?:\s|,|$))?";
const SLASH_DATE: &str = r"(?P<dia>\d{1,2})[/-](?P<mes>\d{1,2})(?:[/-](?P<ano>\d{2,4}))?";

const RANGE_INTRO: &str = r"(?:das|de|às|as|a)";
const RANGE_SEP: &str = r"(?:até|ate|às|as|a|-)";
const FLEX_TIME: &str = r"\d{1,2}(?:[:h]\d{2}|h)?";
const STRICT_TIME: &str = r"\d{1,2}:\d{2}";

/// Patient → doctor link in the named-month shape ("e o dr.", "e o médico").
const DOCTOR_LINK: &str = r"(?:e\s+o\s+m[eé]dico|e\s+a\s+m[eé]dica|e\s+(?:o|a)\s+dra?(?:\.|\b)|e\s+o)";
/// Patient → doctor link in the slash-date shapes.
const PAIR_LINK: &str = r"(?:com\s+o\s+m[eé]dico|com\s+a\s+m[eé]dica|e\s+o\s+m[eé]dico|com|e)";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid matcher regex")
}

// ═══════════════════════════════════════════════════════════
// Compiled strategies
// ═══════════════════════════════════════════════════════════

/// "marcar consulta para maria com dr. joão no dia 20 de outubro das 10 às 11"
static CONNECTOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let verbs = IMPERATIVE_VERBS.join("|");
    compile(&format!(
        r"(?:{verbs})\s+(?P<paciente>{NAME_SPAN})\s+com\s+(?P<medico>{NAME_SPAN})\s+{DATE_INTRO}\s+{NAMED_DATE}\s*,?\s*(?:{RANGE_INTRO}\s+)?(?P<inicio>{FLEX_TIME})\s*{RANGE_SEP}\s*(?P<fim>{FLEX_TIME})"
    ))
});

/// "exame paciente bia e o dr. lima dia 3 de março de 2026 das 8 às 9"
static NAMED_MONTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let keywords = ACTIVITY_KEYWORDS.join("|");
    compile(&format!(
        r"(?P<tipo>{keywords}).*?(?:entre\s+o\s+paciente|paciente)\s+(?P<paciente>{NAME_SPAN})\s+{DOCTOR_LINK}\s*(?P<medico>{NAME_SPAN})\s+{DATE_INTRO}\s+{NAMED_DATE}.*?(?:{RANGE_INTRO}\s*)?(?P<inicio>{FLEX_TIME})\s*{RANGE_SEP}\s*(?P<fim>{FLEX_TIME})"
    ))
});

/// "consulta paciente ana com o médico pedro no dia 05/12/2025 às 09:00 até 10:00"
static SLASH_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let keywords = ACTIVITY_KEYWORDS.join("|");
    compile(&format!(
        r"(?P<tipo>{keywords}).*?(?:(?:entre\s+o\s+paciente|paciente)\s+)?\s*(?P<paciente>{NAME_SPAN})\s+{PAIR_LINK}\s+(?P<medico>{NAME_SPAN})\s+(?:{DATE_INTRO}\s+)?{SLASH_DATE}.*?(?:{RANGE_INTRO}\s*)?(?P<inicio>{STRICT_TIME})\s*{RANGE_SEP}\s*(?P<fim>{STRICT_TIME})"
    ))
});

/// "consulta ana com pedro, dia 05/12, das 09:00 horas até as 10:00"
///
/// The doctor span ends at punctuation, at a date introducer, or right
/// before the date; free text is then allowed up to the date and between
/// the two times.
static LOOSE_SLASH_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let keywords = ACTIVITY_KEYWORDS.join("|");
    compile(&format!(
        r"(?P<tipo>{keywords}).*?(?:paciente\s+)?(?P<paciente>{NAME_SPAN})\s+{PAIR_LINK}\s+(?P<medico>{LETTER_SPAN})(?:(?:\s*[,;]|\s+{DATE_INTRO}\b)\D*?|\s+){SLASH_DATE}\D*?(?P<inicio>{STRICT_TIME})\D*?{RANGE_SEP}\s*(?P<fim>{STRICT_TIME})"
    ))
});

/// How a strategy labels the activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityRule {
    /// Always the same label.
    Fixed(&'static str),
    /// Derived from the `tipo` capture.
    FromKeyword,
}

/// Canonical chain, highest priority first.
static CANONICAL_MATCHERS: [PatternMatcher; 4] = [
    PatternMatcher {
        name: "connector",
        pattern: &CONNECTOR_PATTERN,
        activity: ActivityRule::Fixed("Consulta"),
    },
    PatternMatcher {
        name: "named_month",
        pattern: &NAMED_MONTH_PATTERN,
        activity: ActivityRule::FromKeyword,
    },
    PatternMatcher {
        name: "slash_date",
        pattern: &SLASH_DATE_PATTERN,
        activity: ActivityRule::FromKeyword,
    },
    PatternMatcher {
        name: "loose_slash_date",
        pattern: &LOOSE_SLASH_DATE_PATTERN,
        activity: ActivityRule::FromKeyword,
    },
];

/// "Consulta" for any keyword containing it, otherwise the keyword capitalized.
pub fn activity_label(keyword: &str) -> String {
    let keyword = keyword.trim();
    if keyword.to_lowercase().contains("consulta") {
        return "Consulta".to_string();
    }
    let mut chars = keyword.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// ═══════════════════════════════════════════════════════════
// Matcher trait
// ═══════════════════════════════════════════════════════════

/// One extraction strategy.
///
/// `Err` is reserved for internal faults; an ordinary miss is
/// `Ok(MatchAttempt::NoStructuralMatch)`.
pub trait Matcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn attempt(&self, text: &str) -> Result<MatchAttempt, InterpretError>;
}

/// Regex-backed strategy. Definitions are static and compiled on first use.
#[derive(Debug, Clone, Copy)]
pub struct PatternMatcher {
    name: &'static str,
    pattern: &'static LazyLock<Regex>,
    activity: ActivityRule,
}

impl PatternMatcher {
    fn required(&self, caps: &Captures<'_>, group: &str) -> Result<String, InterpretError> {
        caps.name(group)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                InterpretError::Internal(format!(
                    "matcher `{}` matched without capturing `{group}`",
                    self.name
                ))
            })
    }
}

impl Matcher for PatternMatcher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn attempt(&self, text: &str) -> Result<MatchAttempt, InterpretError> {
        let Some(caps) = self.pattern.captures(text) else {
            return Ok(MatchAttempt::NoStructuralMatch);
        };

        let activity = match self.activity {
            ActivityRule::Fixed(label) => label.to_string(),
            ActivityRule::FromKeyword => activity_label(&self.required(&caps, "tipo")?),
        };

        Ok(MatchAttempt::Captured(CapturedFields {
            activity,
            patient_span: self.required(&caps, "paciente")?,
            doctor_span: self.required(&caps, "medico")?,
            date: DateParts {
                day: self.required(&caps, "dia")?,
                month: self.required(&caps, "mes")?,
                year: caps.name("ano").map(|m| m.as_str().to_string()),
            },
            start: self.required(&caps, "inicio")?,
            end: caps.name("fim").map(|m| m.as_str().to_string()),
        }))
    }
}

// ═══════════════════════════════════════════════════════════
// Chain evaluation
// ═══════════════════════════════════════════════════════════

/// Run one matcher and hand its capture to `accept`.
///
/// `accept` returning `Ok(None)` or an attempt-local error means "not this
/// one": the miss is logged and `Ok(None)` returned. Other errors propagate.
pub fn evaluate<T>(
    matcher: &dyn Matcher,
    text: &str,
    accept: &mut dyn FnMut(CapturedFields) -> Result<Option<T>, InterpretError>,
) -> Result<Option<T>, InterpretError> {
    let fields = match matcher.attempt(text)? {
        MatchAttempt::Captured(fields) => fields,
        MatchAttempt::NoStructuralMatch => {
            debug!(matcher = matcher.name(), "no structural match");
            return Ok(None);
        }
    };

    match accept(fields) {
        Ok(Some(value)) => {
            debug!(matcher = matcher.name(), "match accepted");
            Ok(Some(value))
        }
        Ok(None) => {
            debug!(matcher = matcher.name(), "match rejected: empty name");
            Ok(None)
        }
        Err(e) if e.is_attempt_local() => {
            debug!(matcher = matcher.name(), error = %e, "match abandoned");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Strategies in priority order.
pub struct MatcherChain {
    matchers: Vec<Box<dyn Matcher>>,
}

impl MatcherChain {
    /// The four built-in strategies.
    pub fn canonical() -> Self {
        Self {
            matchers: CANONICAL_MATCHERS
                .iter()
                .map(|m| Box::new(*m) as Box<dyn Matcher>)
                .collect(),
        }
    }

    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// First accepted capture, trying matchers strictly in order.
    pub fn first_match<T>(
        &self,
        text: &str,
        accept: &mut dyn FnMut(CapturedFields) -> Result<Option<T>, InterpretError>,
    ) -> Result<Option<T>, InterpretError> {
        for matcher in &self.matchers {
            if let Some(value) = evaluate(matcher.as_ref(), text, accept)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl Default for MatcherChain {
    fn default() -> Self {
        Self::canonical()
    }
}
