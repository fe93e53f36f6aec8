//! Entry point tying matchers, normalization and the fallback together.

use std::sync::Arc;

use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::datetime::{resolve_date, resolve_time};
use super::fallback::FallbackExtractor;
use super::matchers::{evaluate, MatcherChain};
use super::names::clean_name;
use super::types::{AppointmentDraft, CapturedFields, InterpretationOutcome};
use super::InterpretError;

/// Stateless command interpreter. Cheap to share behind an `Arc`.
pub struct CommandInterpreter {
    chain: MatcherChain,
    fallback: FallbackExtractor,
    clock: Arc<dyn Clock>,
}

impl CommandInterpreter {
    /// Canonical matcher chain with the given year source.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_chain(MatcherChain::canonical(), clock)
    }

    pub fn with_chain(chain: MatcherChain, clock: Arc<dyn Clock>) -> Self {
        Self {
            chain,
            fallback: FallbackExtractor::new(),
            clock,
        }
    }

    /// Interpret one command.
    ///
    /// Matching runs on the trimmed, lower-cased text; failures echo the
    /// trimmed text in its original case.
    pub fn interpret(&self, raw: &str) -> InterpretationOutcome {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            info!(outcome = "empty_input", "Command interpreted");
            return InterpretationOutcome::failure(InterpretError::EmptyInput, None);
        }

        let text = trimmed.to_lowercase();
        let current_year = self.clock.current_year();

        match self.extract(&text, current_year) {
            Ok(Some(draft)) => {
                info!(
                    outcome = "success",
                    activity = %draft.tipo_atividade,
                    has_end = draft.fim.is_some(),
                    "Command interpreted"
                );
                InterpretationOutcome::Success(draft)
            }
            Ok(None) => {
                info!(outcome = "no_match", chars = trimmed.chars().count(), "Command interpreted");
                InterpretationOutcome::failure(
                    InterpretError::NoPatternMatch,
                    Some(trimmed.to_string()),
                )
            }
            Err(e) => {
                warn!(error = %e, "Interpreter fault");
                InterpretationOutcome::failure(e, Some(trimmed.to_string()))
            }
        }
    }

    fn extract(
        &self,
        text: &str,
        current_year: u32,
    ) -> Result<Option<AppointmentDraft>, InterpretError> {
        let accept: &mut dyn FnMut(CapturedFields) -> Result<Option<AppointmentDraft>, InterpretError> =
            &mut |fields| build_draft(fields, current_year);

        if let Some(draft) = self.chain.first_match(text, &mut *accept)? {
            return Ok(Some(draft));
        }
        evaluate(&self.fallback, text, accept)
    }
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

/// Normalize a capture into a draft.
///
/// `Ok(None)` when a name cleans down to nothing. Date and start-time
/// failures are errors; a bad end time only drops `fim`.
fn build_draft(
    fields: CapturedFields,
    current_year: u32,
) -> Result<Option<AppointmentDraft>, InterpretError> {
    let paciente = clean_name(&fields.patient_span);
    let medico = clean_name(&fields.doctor_span);
    if paciente.is_empty() || medico.is_empty() {
        return Ok(None);
    }

    let date = resolve_date(
        &fields.date.day,
        &fields.date.month,
        fields.date.year.as_deref(),
        current_year,
    )?;
    let start = resolve_time(&fields.start)?;
    let end = fields.end.as_deref().and_then(|raw| resolve_time(raw).ok());

    Ok(Some(AppointmentDraft::new(
        fields.activity,
        paciente,
        medico,
        &date,
        &start,
        end.as_ref(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::clock::FixedClock;
    use crate::interpreter::matchers::Matcher;
    use crate::interpreter::types::{DateParts, MatchAttempt};

    fn interpreter() -> CommandInterpreter {
        CommandInterpreter::new(Arc::new(FixedClock(2026)))
    }

    fn draft(text: &str) -> AppointmentDraft {
        match interpreter().interpret(text) {
            InterpretationOutcome::Success(d) => d,
            InterpretationOutcome::Failure(f) => panic!("{text:?} failed: {}", f.reason),
        }
    }

    #[test]
    fn connector_command_with_full_date() {
        let d = draft(
            "Marcar consulta para Maria Souza com Dr. João no dia 20 de outubro de 2025 das 10:00 às 11:00",
        );
        assert_eq!(d.tipo_atividade, "Consulta");
        assert_eq!(d.paciente_nome, "Maria Souza");
        assert_eq!(d.medico_nome, "João");
        assert_eq!(d.inicio, "2025-10-20T10:00");
        assert_eq!(d.fim.as_deref(), Some("2025-10-20T11:00"));
    }

    #[test]
    fn blank_input_is_empty_input_without_echo() {
        for raw in ["", "   ", "\n\t"] {
            assert_eq!(
                interpreter().interpret(raw),
                InterpretationOutcome::failure(InterpretError::EmptyInput, None)
            );
        }
    }

    #[test]
    fn gibberish_is_no_match_with_original_case_echo() {
        let outcome = interpreter().interpret("  Blablabla sem sentido ");
        assert_eq!(
            outcome,
            InterpretationOutcome::failure(
                InterpretError::NoPatternMatch,
                Some("Blablabla sem sentido".into())
            )
        );
    }

    #[test]
    fn slash_date_command() {
        let d = draft(
            "consulta paciente Ana com o médico Pedro no dia 05/12/2025 às 09:00 até 10:00",
        );
        assert_eq!(d.tipo_atividade, "Consulta");
        assert_eq!(d.paciente_nome, "Ana");
        assert_eq!(d.medico_nome, "Pedro");
        assert_eq!(d.inicio, "2025-12-05T09:00");
        assert_eq!(d.fim.as_deref(), Some("2025-12-05T10:00"));
    }

    #[test]
    fn named_month_with_bare_hours() {
        let d = draft("Exame paciente Bia e o Dr. Lima dia 3 de março de 2026 das 8 às 9");
        assert_eq!(d.tipo_atividade, "Exame");
        assert_eq!(d.paciente_nome, "Bia");
        assert_eq!(d.medico_nome, "Lima");
        assert_eq!(d.inicio, "2026-03-03T08:00");
        assert_eq!(d.fim.as_deref(), Some("2026-03-03T09:00"));
    }

    #[test]
    fn unaccented_marco_reads_as_march() {
        let plain = draft("exame paciente Bia e o dr. Lima dia 3 de marco de 2026 das 8 às 9");
        let accented = draft("exame paciente Bia e o dr. Lima dia 3 de março de 2026 das 8 às 9");
        assert_eq!(plain, accented);
        assert_eq!(plain.inicio, "2026-03-03T08:00");
    }

    #[test]
    fn missing_year_uses_clock() {
        let d = draft(
            "Marque para o paciente Carlos Lima com a Dra. Helena no dia 7 de jan às 14h até 15h30",
        );
        assert_eq!(d.paciente_nome, "Carlos Lima");
        assert_eq!(d.medico_nome, "Helena");
        assert_eq!(d.inicio, "2026-01-07T14:00");
        assert_eq!(d.fim.as_deref(), Some("2026-01-07T15:30"));
    }

    #[test]
    fn two_digit_year_and_surgery_label() {
        let d = draft("Cirurgia paciente João e o Dr. Mendes para o dia 2 de fev de 27 das 7:30 às 12:00");
        assert_eq!(d.tipo_atividade, "Cirurgia");
        assert_eq!(d.paciente_nome, "João");
        assert_eq!(d.medico_nome, "Mendes");
        assert_eq!(d.inicio, "2027-02-02T07:30");
        assert_eq!(d.fim.as_deref(), Some("2027-02-02T12:00"));
    }

    #[test]
    fn teleconsulta_is_labelled_consulta() {
        let d = draft("Teleconsulta paciente Ana e o médico Pedro no dia 10 de novembro das 9h às 10h");
        assert_eq!(d.tipo_atividade, "Consulta");
        assert_eq!(d.inicio, "2026-11-10T09:00");
        assert_eq!(d.fim.as_deref(), Some("2026-11-10T10:00"));
    }

    #[test]
    fn loose_command_with_filler_words() {
        let d = draft("Consulta paciente Ana com Pedro, dia 05/12, das 09:00 horas até as 10:00");
        assert_eq!(d.paciente_nome, "Ana");
        assert_eq!(d.medico_nome, "Pedro");
        assert_eq!(d.inicio, "2026-12-05T09:00");
        assert_eq!(d.fim.as_deref(), Some("2026-12-05T10:00"));
    }

    #[test]
    fn fallback_has_no_end_time() {
        let d = draft("Preciso de um horário para paciente Joana, médico Carlos, 10/11/2025 às 14:30");
        assert_eq!(d.tipo_atividade, "Consulta");
        assert_eq!(d.paciente_nome, "Joana");
        assert_eq!(d.medico_nome, "Carlos");
        assert_eq!(d.inicio, "2025-11-10T14:30");
        assert_eq!(d.fim, None);
    }

    #[test]
    fn time_right_after_month_keeps_clock_year() {
        let named = draft("Consulta paciente Ana e o Dr. Lima dia 5 de dezembro 10:00 às 11:00");
        assert_eq!(named.paciente_nome, "Ana");
        assert_eq!(named.medico_nome, "Lima");
        assert_eq!(named.inicio, "2026-12-05T10:00");
        assert_eq!(named.fim.as_deref(), Some("2026-12-05T11:00"));

        let connector = draft("Marcar Ana com Pedro dia 5 de dezembro 10:00 às 11:00");
        assert_eq!(connector.inicio, named.inicio);
        assert_eq!(connector.fim, named.fim);
    }

    #[test]
    fn unresolvable_month_falls_through_to_no_match() {
        let outcome = interpreter()
            .interpret("Exame paciente Bia e o Dr. Lima dia 3 de brumário de 2026 das 8 às 9");
        assert_eq!(outcome.reason(), Some(&InterpretError::NoPatternMatch));
    }

    #[test]
    fn interpretation_is_deterministic() {
        let interp = interpreter();
        let text = "Marcar consulta para Maria Souza com Dr. João no dia 20 de outubro de 2025 das 10:00 às 11:00";
        assert_eq!(interp.interpret(text), interp.interpret(text));
    }

    #[test]
    fn shared_across_threads() {
        let interp = Arc::new(interpreter());
        std::thread::scope(|s| {
            for _ in 0..4 {
                let interp = Arc::clone(&interp);
                s.spawn(move || {
                    assert!(interp
                        .interpret("Exame paciente Bia e o Dr. Lima dia 3 de março de 2026 das 8 às 9")
                        .is_success());
                });
            }
        });
    }

    // ── Normalization rules with scripted captures ──

    struct Scripted(CapturedFields);

    impl Matcher for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn attempt(&self, _text: &str) -> Result<MatchAttempt, InterpretError> {
            Ok(MatchAttempt::Captured(self.0.clone()))
        }
    }

    struct Broken;

    impl Matcher for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn attempt(&self, _text: &str) -> Result<MatchAttempt, InterpretError> {
            Err(InterpretError::Internal("group missing".into()))
        }
    }

    fn fields(patient: &str, start: &str, end: Option<&str>) -> CapturedFields {
        CapturedFields {
            activity: "Retorno".into(),
            patient_span: patient.into(),
            doctor_span: "dr. pedro".into(),
            date: DateParts {
                day: "4".into(),
                month: "abril".into(),
                year: None,
            },
            start: start.into(),
            end: end.map(Into::into),
        }
    }

    fn scripted(chain: Vec<CapturedFields>) -> CommandInterpreter {
        let matchers = chain
            .into_iter()
            .map(|f| Box::new(Scripted(f)) as Box<dyn Matcher>)
            .collect();
        CommandInterpreter::with_chain(MatcherChain::new(matchers), Arc::new(FixedClock(2030)))
    }

    #[test]
    fn bad_end_time_only_drops_fim() {
        let d = scripted(vec![fields("ana", "9h", Some("depois"))])
            .interpret("qualquer")
            .into_result()
            .unwrap();
        assert_eq!(d.inicio, "2030-04-04T09:00");
        assert_eq!(d.fim, None);
    }

    #[test]
    fn bad_start_time_moves_to_next_matcher() {
        let d = scripted(vec![
            fields("ana", "cedo", Some("10:00")),
            fields("bia", "11:00", Some("12:00")),
        ])
        .interpret("qualquer")
        .into_result()
        .unwrap();
        assert_eq!(d.paciente_nome, "Bia");
        assert_eq!(d.fim.as_deref(), Some("2030-04-04T12:00"));
    }

    #[test]
    fn empty_cleaned_name_moves_to_next_matcher() {
        let d = scripted(vec![
            fields("dr.", "9:00", None),
            fields("uma consulta para o paciente rui", "9:00", None),
        ])
        .interpret("qualquer")
        .into_result()
        .unwrap();
        assert_eq!(d.paciente_nome, "Rui");
        assert_eq!(d.medico_nome, "Pedro");
        assert_eq!(d.tipo_atividade, "Retorno");
    }

    #[test]
    fn internal_fault_is_reported_with_echo() {
        let interp = CommandInterpreter::with_chain(
            MatcherChain::new(vec![Box::new(Broken)]),
            Arc::new(FixedClock(2030)),
        );
        let failure = interp.interpret(" Algo ").into_result().unwrap_err();
        assert_eq!(failure.reason, InterpretError::Internal("group missing".into()));
        assert_eq!(failure.echo.as_deref(), Some("Algo"));
    }
}
