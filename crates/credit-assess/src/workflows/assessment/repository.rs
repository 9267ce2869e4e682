use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AssessmentStage, QualitativeScores};
use super::ratios::{FinancialSummary, RatioEntry};
use super::report::ReportSummaryView;
use super::workflow::AssessmentSession;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored session plus bookkeeping timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub session: AssessmentSession,
}

impl SessionRecord {
    pub fn view(&self) -> SessionView {
        let stage = self.session.stage();
        SessionView {
            session_id: self.id.clone(),
            stage,
            stage_label: stage.label(),
            retailer_name: self.session.record().identity.retailer_name.clone(),
            pending_documents: self
                .session
                .documents()
                .iter()
                .map(|document| document.file_name.clone())
                .collect(),
            ratios: self.session.ratios().map(|ratios| ratios.entries()),
            summary: self.session.summary().cloned(),
            scores: self.session.scores().cloned(),
            report: self.session.report().map(|report| report.summary_view()),
            opened_at: self.opened_at,
            updated_at: self.updated_at,
        }
    }
}

/// What the presentation layer needs to render the current stage.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub stage: AssessmentStage,
    pub stage_label: &'static str,
    pub retailer_name: String,
    pub pending_documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratios: Option<Vec<RatioEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<FinancialSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<QualitativeScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportSummaryView>,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session storage abstraction so the service can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
