use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{AssessmentStage, FinancialRecord, QualitativeScores, SupportingDocument};
use super::error::AssessmentError;
use super::export::ReportWriter;
use super::report::AssessmentReport;
use super::repository::{RepositoryError, SessionId, SessionRecord, SessionRepository};
use super::storage::DocumentStore;
use super::workflow::{AssessmentSession, AssessmentWorkflow};

/// Intake form payload: the financial record plus any uploaded files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeSubmission {
    pub record: FinancialRecord,
    #[serde(default)]
    pub documents: Vec<SupportingDocument>,
}

/// Service composing the session repository with the storage collaborators.
///
/// Each action loads the session, runs it through an [`AssessmentWorkflow`]
/// and stores the returned session. Actions are serialized by a single lock
/// so one completes before the next starts.
pub struct AssessmentService<R> {
    repository: Arc<R>,
    documents: Arc<dyn DocumentStore>,
    writers: Vec<Arc<dyn ReportWriter>>,
    action_lock: Mutex<()>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("asm-{id:06}"))
}

impl<R> AssessmentService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        documents: Arc<dyn DocumentStore>,
        writers: Vec<Arc<dyn ReportWriter>>,
    ) -> Self {
        Self {
            repository,
            documents,
            writers,
            action_lock: Mutex::new(()),
        }
    }

    /// Start a new session at intake with an empty record.
    pub fn open(&self) -> Result<SessionRecord, AssessmentServiceError> {
        let now = Utc::now();
        let record = SessionRecord {
            id: next_session_id(),
            opened_at: now,
            updated_at: now,
            session: AssessmentSession::default(),
        };

        let stored = self.repository.insert(record)?;
        info!(session = %stored.id, "assessment session opened");
        Ok(stored)
    }

    pub fn get(&self, id: &SessionId) -> Result<SessionRecord, AssessmentServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn submit_intake(
        &self,
        id: &SessionId,
        submission: IntakeSubmission,
    ) -> Result<SessionRecord, AssessmentServiceError> {
        let IntakeSubmission { record, documents } = submission;
        self.apply(id, |workflow| workflow.submit_intake(record, documents))
            .map(|(record, _)| record)
    }

    pub fn advance(&self, id: &SessionId) -> Result<SessionRecord, AssessmentServiceError> {
        self.apply(id, AssessmentWorkflow::advance)
            .map(|(record, _)| record)
    }

    pub fn retreat(&self, id: &SessionId) -> Result<SessionRecord, AssessmentServiceError> {
        self.apply(id, AssessmentWorkflow::retreat)
            .map(|(record, _)| record)
    }

    pub fn generate_report(
        &self,
        id: &SessionId,
        qualitative: QualitativeScores,
    ) -> Result<AssessmentReport, AssessmentServiceError> {
        self.apply(id, |workflow| workflow.generate_report(qualitative))
            .map(|(_, report)| report)
    }

    /// End the session; its working data is discarded.
    pub fn close(&self, id: &SessionId) -> Result<(), AssessmentServiceError> {
        let _guard = self.action_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.repository.remove(id)?;
        info!(session = %id, "assessment session closed");
        Ok(())
    }

    pub fn stage(&self, id: &SessionId) -> Result<AssessmentStage, AssessmentServiceError> {
        self.get(id).map(|record| record.session.stage())
    }

    fn apply<T, F>(
        &self,
        id: &SessionId,
        action: F,
    ) -> Result<(SessionRecord, T), AssessmentServiceError>
    where
        F: FnOnce(&mut AssessmentWorkflow) -> Result<T, AssessmentError>,
    {
        let _guard = self.action_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        let mut workflow = AssessmentWorkflow::resume(
            record.session,
            Arc::clone(&self.documents),
            self.writers.clone(),
        );

        let output = action(&mut workflow)?;

        record.session = workflow.into_session();
        record.updated_at = Utc::now();
        self.repository.update(record.clone())?;
        Ok((record, output))
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
