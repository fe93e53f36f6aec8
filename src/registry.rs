//! Registry matching: turn an interpreted draft into an activity request.
//!
//! The scheduling backend expects ids, not names. Callers fetch the patient
//! and doctor listings, then resolve the draft names against them here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interpreter::AppointmentDraft;

const DEFAULT_ACTIVITY: &str = "Consulta";

/// One row of a patient or doctor listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: String,
    #[serde(default)]
    pub nome: String,
}

/// Payload for creating a medical activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    pub inicio: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub termino: Option<String>,
    pub tipo_atividade: String,
    pub paciente_id: String,
    pub medicos: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Paciente \"{0}\" não encontrado.")]
    PatientNotFound(String),

    #[error("Médico \"{0}\" não encontrado.")]
    DoctorNotFound(String),
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn find_by_name<'a>(entries: &'a [RegistryEntry], name: &str) -> Option<&'a RegistryEntry> {
    entries.iter().find(|e| same_name(&e.nome, name))
}

/// Resolve draft names to registry ids.
///
/// Names match exactly after trimming and lower-casing. The patient is
/// looked up first, so a draft with neither name found reports the patient.
pub fn build_activity_request(
    draft: &AppointmentDraft,
    patients: &[RegistryEntry],
    doctors: &[RegistryEntry],
) -> Result<ActivityRequest, RegistryError> {
    let patient = find_by_name(patients, &draft.paciente_nome)
        .ok_or_else(|| RegistryError::PatientNotFound(draft.paciente_nome.clone()))?;
    let doctor = find_by_name(doctors, &draft.medico_nome)
        .ok_or_else(|| RegistryError::DoctorNotFound(draft.medico_nome.clone()))?;

    let tipo_atividade = if draft.tipo_atividade.trim().is_empty() {
        DEFAULT_ACTIVITY.to_string()
    } else {
        draft.tipo_atividade.clone()
    };

    Ok(ActivityRequest {
        inicio: draft.inicio.clone(),
        termino: draft.fim.clone(),
        tipo_atividade,
        paciente_id: patient.id.clone(),
        medicos: vec![doctor.id.clone()],
    })
}
