use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{
    Contract, Partner, ProcessDefinition, ProcessId, Proponent, ProponentId, Requirements,
    RupStatus, Scoring,
};
use super::evaluation::{EvaluationConfig, EvaluationEngine, EvaluationOutcome};
use super::intake::{IntakeGuard, IntakeViolation};
use super::lenient::{
    date_or_none, flag_or_false, record_or_default, records_or_empty, text_or_empty,
};
use super::ranking::ProcessReport;
use super::repository::{ProcessRecord, ProcessRepository, RepositoryError};

/// Bidder data captured when a proponent is first registered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProponentRegistration {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "flag_or_false")]
    pub is_plural: bool,
    #[serde(default, deserialize_with = "records_or_empty")]
    pub partners: Vec<Partner>,
    #[serde(default, deserialize_with = "date_or_none")]
    pub rup_renewal_date: Option<NaiveDate>,
}

/// Edits made during the scoring step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringUpdate {
    #[serde(default, deserialize_with = "record_or_default")]
    pub scoring: Scoring,
    /// Replaces the partner list when present.
    #[serde(default)]
    pub partners: Option<Vec<Partner>>,
}

/// Edits made during the eligibility-verification step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationUpdate {
    #[serde(default, deserialize_with = "record_or_default")]
    pub requirements: Requirements,
    #[serde(default, deserialize_with = "records_or_empty")]
    pub contractors: Vec<Contract>,
    /// Replaces the proponent's RUP renewal date when present.
    #[serde(default, deserialize_with = "date_or_none")]
    pub rup_renewal_date: Option<NaiveDate>,
}

/// Self-contained process and proponents evaluated without touching storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationBundle {
    #[serde(default, deserialize_with = "record_or_default")]
    pub process: ProcessDefinition,
    #[serde(default, deserialize_with = "records_or_empty")]
    pub proponents: Vec<Proponent>,
}

/// Service composing the intake guard, repository, and evaluation engine.
///
/// Every proponent of a process lives in one stored record, so edits hold `writes` from fetch to
/// update and never overwrite each other.
pub struct ProcurementEvaluationService<R> {
    guard: Arc<IntakeGuard>,
    repository: Arc<R>,
    engine: Arc<EvaluationEngine>,
    writes: Mutex<()>,
}

static PROCESS_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PROPONENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_process_id() -> ProcessId {
    let id = PROCESS_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProcessId(format!("proc-{id:06}"))
}

fn next_proponent_id() -> ProponentId {
    let id = PROPONENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProponentId(format!("prop-{id:06}"))
}

impl<R> ProcurementEvaluationService<R>
where
    R: ProcessRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: EvaluationConfig) -> Self {
        Self {
            guard: Arc::new(IntakeGuard),
            repository,
            engine: Arc::new(EvaluationEngine::new(config)),
            writes: Mutex::new(()),
        }
    }

    /// Validate and store a new process definition.
    pub fn register_process(
        &self,
        process: ProcessDefinition,
    ) -> Result<ProcessRecord, ServiceError> {
        let mut process = self.guard.process(process)?;
        if process.id.is_unassigned() {
            process.id = next_process_id();
        }

        let stored = self.repository.insert(ProcessRecord::new(process))?;
        info!(
            process = %stored.id().0,
            additional_criteria = stored.process.additional_criteria().len(),
            "procurement process registered"
        );
        Ok(stored)
    }

    /// Register a bidder against an existing process.
    pub fn register_proponent(
        &self,
        process_id: &ProcessId,
        registration: ProponentRegistration,
    ) -> Result<Proponent, ServiceError> {
        if registration.name.trim().is_empty() {
            return Err(IntakeViolation::MissingProponentName.into());
        }
        self.guard.partners(&registration.partners)?;

        let _writing = self.lock_writes();
        let mut record = self.load(process_id)?;
        let mut proponent = Proponent {
            id: next_proponent_id(),
            name: registration.name.trim().to_string(),
            is_plural: registration.is_plural,
            partners: registration.partners,
            rup: RupStatus {
                renewal_date: registration.rup_renewal_date,
                complies: false,
            },
            ..Proponent::default()
        };
        self.engine.refresh(&mut proponent, &record.process);

        record.proponents.push(proponent.clone());
        self.repository.update(record)?;

        info!(
            process = %process_id.0,
            proponent = %proponent.id.0,
            plural = proponent.is_plural,
            "proponent registered"
        );
        Ok(proponent)
    }

    /// Apply the scoring step and recompute the proponent's derived fields.
    pub fn score_proponent(
        &self,
        process_id: &ProcessId,
        proponent_id: &ProponentId,
        update: ScoringUpdate,
    ) -> Result<Proponent, ServiceError> {
        if let Some(partners) = &update.partners {
            self.guard.partners(partners)?;
        }

        let proponent = self.edit_proponent(process_id, proponent_id, |proponent| {
            proponent.scoring = update.scoring;
            if let Some(partners) = update.partners {
                proponent.partners = partners;
            }
        })?;

        info!(
            proponent = %proponent_id.0,
            total_score = proponent.total_score,
            "proponent scored"
        );
        Ok(proponent)
    }

    /// Apply the eligibility-verification step and recompute the proponent's derived fields.
    pub fn verify_proponent(
        &self,
        process_id: &ProcessId,
        proponent_id: &ProponentId,
        update: VerificationUpdate,
    ) -> Result<Proponent, ServiceError> {
        self.guard.contracts(&update.contractors)?;

        let proponent = self.edit_proponent(process_id, proponent_id, |proponent| {
            proponent.requirements = update.requirements;
            proponent.contractors = update.contractors;
            if let Some(renewal_date) = update.rup_renewal_date {
                proponent.rup.renewal_date = Some(renewal_date);
            }
        })?;

        info!(
            proponent = %proponent_id.0,
            needs_subsanation = proponent.needs_subsanation,
            reasons = proponent.subsanation_details.len(),
            "proponent verified"
        );
        Ok(proponent)
    }

    /// Evaluate a stored proponent against its process.
    pub fn evaluate(
        &self,
        process_id: &ProcessId,
        proponent_id: &ProponentId,
    ) -> Result<EvaluationOutcome, ServiceError> {
        let record = self.load(process_id)?;
        let proponent = record
            .proponent(proponent_id)
            .ok_or_else(|| ServiceError::UnknownProponent {
                process: process_id.clone(),
                proponent: proponent_id.clone(),
            })?;

        let outcome = self.engine.evaluate(proponent, &record.process);
        debug!(
            proponent = %proponent_id.0,
            needs_subsanation = outcome.verdict.needs_subsanation,
            warnings = outcome.warnings.len(),
            "proponent evaluated"
        );
        Ok(outcome)
    }

    /// Final ranking for a stored process.
    pub fn report(&self, process_id: &ProcessId) -> Result<ProcessReport, ServiceError> {
        let record = self.load(process_id)?;
        Ok(self.engine.report(&record.process, &record.proponents))
    }

    /// Validate and rank a bundle that never touches the repository.
    pub fn evaluate_bundle(&self, bundle: EvaluationBundle) -> Result<ProcessReport, ServiceError> {
        let process = self.guard.process(bundle.process)?;
        for proponent in &bundle.proponents {
            self.guard.proponent(proponent)?;
        }

        let report = self.engine.report(&process, &bundle.proponents);
        info!(
            process = %process.id.0,
            proponents = report.proponents_evaluated,
            requiring_subsanation = report.requiring_subsanation,
            "evaluation bundle ranked"
        );
        Ok(report)
    }

    /// Fetch a process and its proponents.
    pub fn get(&self, process_id: &ProcessId) -> Result<ProcessRecord, ServiceError> {
        self.load(process_id)
    }

    fn load(&self, process_id: &ProcessId) -> Result<ProcessRecord, ServiceError> {
        let record = self
            .repository
            .fetch(process_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    // The lock guards no data, so a panic in another writer leaves nothing to repair.
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn edit_proponent<F>(
        &self,
        process_id: &ProcessId,
        proponent_id: &ProponentId,
        edit: F,
    ) -> Result<Proponent, ServiceError>
    where
        F: FnOnce(&mut Proponent),
    {
        let _writing = self.lock_writes();
        let mut record = self.load(process_id)?;
        let ProcessRecord {
            process,
            proponents,
        } = &mut record;

        let proponent = proponents
            .iter_mut()
            .find(|proponent| &proponent.id == proponent_id)
            .ok_or_else(|| ServiceError::UnknownProponent {
                process: process_id.clone(),
                proponent: proponent_id.clone(),
            })?;

        edit(proponent);
        self.engine.refresh(proponent, process);
        let updated = proponent.clone();

        self.repository.update(record)?;
        Ok(updated)
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("proponent {} is not registered in process {}", .proponent.0, .process.0)]
    UnknownProponent {
        process: ProcessId,
        proponent: ProponentId,
    },
}
