//! Proposal eligibility and scoring evaluation for public-procurement processes.
//!
//! The evaluation engine is pure: it receives the current process and proponent on every call and
//! returns freshly derived values. Intake validation, storage, and HTTP wiring sit around it.

pub mod domain;
pub mod evaluation;
pub(crate) mod intake;
pub(crate) mod lenient;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AdditionalComplianceResult, AdditionalCriterion, Contract, ContractType,
    ExperienceRequirements, MeasurementUnit, Partner, ProcessDefinition, ProcessId, Proponent,
    ProponentId, Requirements, RupStatus, Scoring, ScoringCriterion, ScoringMaxima,
};
pub use evaluation::{
    DisabilityCredit, EligibilityVerdict, EmptyClassifierPolicy, EvaluationConfig,
    EvaluationEngine, EvaluationOutcome, ScoringWarning,
};
pub use intake::{IntakeGuard, IntakeViolation, MAX_ADDITIONAL_CRITERIA};
pub use lenient::parse_calendar_date;
pub use ranking::{ProcessReport, RankingEntry};
pub use repository::{ProcessRecord, ProcessRepository, ProcessStatusView, RepositoryError};
pub use router::process_router;
pub use service::{
    EvaluationBundle, ProcurementEvaluationService, ProponentRegistration, ScoringUpdate,
    ServiceError, VerificationUpdate,
};
