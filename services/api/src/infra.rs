use credit_assess::config::StorageConfig;
use credit_assess::workflows::assessment::{
    AssessmentReport, DocumentReportWriter, DocumentStore, LocalDocumentStore, RepositoryError,
    ReportWriter, SessionId, SessionRecord, SessionRepository, SpreadsheetReportWriter,
    StorageError, StorageKey,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session storage. Sessions do not survive a restart.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl InMemorySessionRepository {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session map poisoned".to_string()))
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Ok(self.records()?.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        self.records()?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

/// Accepts documents and reports without persisting them, for previews.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DiscardingStore;

impl DocumentStore for DiscardingStore {
    fn store(
        &self,
        folder: &StorageKey,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        debug!(%folder, file = file_name, size = bytes.len(), "preview mode: document not saved");
        Ok(())
    }
}

impl ReportWriter for DiscardingStore {
    fn write(
        &self,
        report: &AssessmentReport,
        destination: &StorageKey,
    ) -> Result<(), StorageError> {
        debug!(
            %destination,
            retailer = %report.identity().retailer_name,
            "preview mode: report not saved"
        );
        Ok(())
    }
}

/// Storage collaborators backed by the local filesystem under `storage.root`.
pub(crate) struct StorageBackends {
    pub(crate) documents: Arc<dyn DocumentStore>,
    pub(crate) writers: Vec<Arc<dyn ReportWriter>>,
}

impl StorageBackends {
    pub(crate) fn local(storage: &StorageConfig) -> Self {
        Self {
            documents: Arc::new(LocalDocumentStore::new(&storage.root)),
            writers: vec![
                Arc::new(SpreadsheetReportWriter::new(
                    &storage.root,
                    &storage.report_base_name,
                )),
                Arc::new(DocumentReportWriter::new(
                    &storage.root,
                    &storage.report_base_name,
                )),
            ],
        }
    }

    pub(crate) fn preview() -> Self {
        Self {
            documents: Arc::new(DiscardingStore),
            writers: vec![Arc::new(DiscardingStore)],
        }
    }
}
