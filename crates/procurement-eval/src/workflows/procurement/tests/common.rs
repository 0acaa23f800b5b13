use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::procurement::domain::{
    AdditionalCriterion, Contract, ContractType, ExperienceRequirements, MeasurementUnit, Partner,
    ProcessDefinition, ProcessId, Proponent, ProponentId, Requirements, RupStatus, Scoring,
    ScoringMaxima,
};
use crate::workflows::procurement::evaluation::{EvaluationConfig, EvaluationEngine};
use crate::workflows::procurement::repository::{
    ProcessRecord, ProcessRepository, RepositoryError,
};
use crate::workflows::procurement::{process_router, ProcurementEvaluationService};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn closing_date() -> NaiveDate {
    date(2024, 3, 1)
}

pub(super) fn maxima() -> ScoringMaxima {
    ScoringMaxima {
        woman_entrepreneurship: 0.25,
        mipyme: 0.25,
        disabled: 1.0,
        quality_factor: 20.0,
        environmental_quality: 10.0,
        national_industry_support: 20.0,
    }
}

pub(super) fn road_length_criterion() -> AdditionalCriterion {
    AdditionalCriterion {
        name: "Longitud en vías".to_string(),
        value: 500.0,
        unit: MeasurementUnit::Length,
    }
}

pub(super) fn process() -> ProcessDefinition {
    ProcessDefinition {
        id: ProcessId("proc-test".to_string()),
        name: "Mejoramiento de vías terciarias".to_string(),
        closing_date: Some(closing_date()),
        scoring_maxima: maxima(),
        experience_requirements: ExperienceRequirements {
            general: "Tres contratos de obra civil".to_string(),
            specific: "Un contrato de vías".to_string(),
            additional_specific: vec![road_length_criterion()],
        },
        classifier_codes: vec!["721410".to_string(), "811015".to_string()],
    }
}

pub(super) fn bare_process() -> ProcessDefinition {
    ProcessDefinition {
        experience_requirements: ExperienceRequirements::default(),
        classifier_codes: Vec::new(),
        ..process()
    }
}

pub(super) fn contract(contributor: &str, total_value_smmlv: f64, participation: f64) -> Contract {
    Contract {
        contracting_entity: "Gobernación de Boyacá".to_string(),
        contract_number: "CO-2021-118".to_string(),
        object: "Pavimentación vía Tunja - Villa de Leyva".to_string(),
        services_code: "721410".to_string(),
        total_value_smmlv,
        participation_percentage: participation,
        additional_specific_experience_contribution: vec![600.0],
        experience_contributor: contributor.to_string(),
        contract_type: ContractType::Public,
        selected_classifier_codes: vec!["721410".to_string()],
        contract_complies: true,
        ..Contract::default()
    }
}

pub(super) fn full_scoring() -> Scoring {
    Scoring {
        woman_entrepreneurship: 0.25,
        mipyme: 0.25,
        disabled: 1.0,
        quality_factor: 20.0,
        environmental_quality: 10.0,
        national_industry_support: 20.0,
        ..Scoring::default()
    }
}

pub(super) fn compliant_requirements() -> Requirements {
    Requirements {
        general_experience: true,
        specific_experience: true,
        professional_card: true,
        additional_specific: Vec::new(),
    }
}

pub(super) fn single_proponent() -> Proponent {
    Proponent {
        id: ProponentId("prop-single".to_string()),
        name: "Constructora Andina S.A.S.".to_string(),
        rup: RupStatus {
            renewal_date: Some(date(2024, 2, 15)),
            complies: false,
        },
        scoring: full_scoring(),
        requirements: compliant_requirements(),
        contractors: vec![contract("Constructora Andina S.A.S.", 1000.0, 100.0)],
        ..Proponent::default()
    }
}

pub(super) fn plural_proponent() -> Proponent {
    Proponent {
        id: ProponentId("prop-plural".to_string()),
        name: "Consorcio Vías del Norte".to_string(),
        is_plural: true,
        partners: vec![
            Partner {
                name: "A".to_string(),
                percentage: 50.0,
                rup_renewal_date: Some(date(2024, 2, 20)),
            },
            Partner {
                name: "B".to_string(),
                percentage: 50.0,
                rup_renewal_date: Some(date(2024, 2, 10)),
            },
        ],
        scoring: full_scoring(),
        requirements: compliant_requirements(),
        contractors: vec![contract("B", 80.0, 100.0)],
        ..Proponent::default()
    }
}

pub(super) fn engine() -> EvaluationEngine {
    EvaluationEngine::new(EvaluationConfig::default())
}

pub(super) fn refreshed(mut proponent: Proponent, process: &ProcessDefinition) -> Proponent {
    engine().refresh(&mut proponent, process);
    proponent
}

pub(super) fn build_service() -> (
    ProcurementEvaluationService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ProcurementEvaluationService::new(repository.clone(), EvaluationConfig::default());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ProcessId, ProcessRecord>>>,
}

impl ProcessRepository for MemoryRepository {
    fn insert(&self, record: ProcessRecord) -> Result<ProcessRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(record.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id().clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ProcessRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id().clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ProcessId) -> Result<Option<ProcessRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<ProcessRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().take(limit).cloned().collect())
    }
}

/// Memory repository whose reads take long enough for concurrent writers to interleave.
#[derive(Default, Clone)]
pub(super) struct SlowReadRepository {
    pub(super) inner: MemoryRepository,
}

impl ProcessRepository for SlowReadRepository {
    fn insert(&self, record: ProcessRecord) -> Result<ProcessRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: ProcessRecord) -> Result<(), RepositoryError> {
        self.inner.update(record)
    }

    fn fetch(&self, id: &ProcessId) -> Result<Option<ProcessRecord>, RepositoryError> {
        let record = self.inner.fetch(id);
        thread::sleep(Duration::from_millis(20));
        record
    }

    fn list(&self, limit: usize) -> Result<Vec<ProcessRecord>, RepositoryError> {
        self.inner.list(limit)
    }
}

pub(super) struct UnavailableRepository;

impl ProcessRepository for UnavailableRepository {
    fn insert(&self, _record: ProcessRecord) -> Result<ProcessRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ProcessRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ProcessId) -> Result<Option<ProcessRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _limit: usize) -> Result<Vec<ProcessRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: ProcurementEvaluationService<MemoryRepository>,
) -> axum::Router {
    process_router(Arc::new(service))
}
