use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{ProcessDefinition, ProcessId, Proponent, ProponentId};

/// Repository record holding a process and the proponents registered against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    pub process: ProcessDefinition,
    #[serde(default, deserialize_with = "super::lenient::records_or_empty")]
    pub proponents: Vec<Proponent>,
}

impl ProcessRecord {
    pub fn new(process: ProcessDefinition) -> Self {
        Self {
            process,
            proponents: Vec::new(),
        }
    }

    pub fn id(&self) -> &ProcessId {
        &self.process.id
    }

    pub fn proponent(&self, id: &ProponentId) -> Option<&Proponent> {
        self.proponents.iter().find(|proponent| &proponent.id == id)
    }

    pub fn status_view(&self) -> ProcessStatusView {
        ProcessStatusView {
            process_id: self.process.id.clone(),
            name: self.process.name.clone(),
            closing_date: self.process.closing_date,
            proponents: self.proponents.len(),
            requiring_subsanation: self
                .proponents
                .iter()
                .filter(|proponent| proponent.needs_subsanation)
                .count(),
        }
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait ProcessRepository: Send + Sync {
    fn insert(&self, record: ProcessRecord) -> Result<ProcessRecord, RepositoryError>;
    fn update(&self, record: ProcessRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ProcessId) -> Result<Option<ProcessRecord>, RepositoryError>;
    fn list(&self, limit: usize) -> Result<Vec<ProcessRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Summary of a stored process exposed to API clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatusView {
    pub process_id: ProcessId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_date: Option<NaiveDate>,
    pub proponents: usize,
    pub requiring_subsanation: usize,
}
