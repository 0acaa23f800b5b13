use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use procurement_eval::error::AppError;
use procurement_eval::workflows::procurement::{
    EvaluationBundle, ProcessId, ProcessRecord, ProcessRepository, RepositoryError,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process storage for the HTTP service and CLI. Records are listed in id order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProcessRepository {
    records: Arc<Mutex<BTreeMap<ProcessId, ProcessRecord>>>,
}

impl InMemoryProcessRepository {
    fn records(&self) -> Result<MutexGuard<'_, BTreeMap<ProcessId, ProcessRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl ProcessRepository for InMemoryProcessRepository {
    fn insert(&self, record: ProcessRecord) -> Result<ProcessRecord, RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(record.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id().clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ProcessRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(record.id()) {
            guard.insert(record.id().clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ProcessId) -> Result<Option<ProcessRecord>, RepositoryError> {
        let guard = self.records()?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<ProcessRecord>, RepositoryError> {
        let guard = self.records()?;
        Ok(guard.values().take(limit).cloned().collect())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn load_bundle(path: &Path) -> Result<EvaluationBundle, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
