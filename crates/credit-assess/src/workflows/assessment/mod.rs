//! Retailer credit assessment: intake, ratio review and final scoring.

pub mod domain;
pub mod error;
pub mod export;
pub mod ratios;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod storage;
mod workflow;

#[cfg(test)]
mod tests;

pub use domain::{
    Assets, AssessmentStage, BalanceSheet, DealingPeriod, FinancialRecord, Liabilities, Location,
    ProfitAndLoss, QualitativeScores, RetailerIdentity, SupportingDocument,
};
pub use error::{AssessmentError, ComputationError, StorageError, ValidationError};
pub use export::{DocumentReportWriter, ReportWriter, SpreadsheetReportWriter};
pub use ratios::{FinancialSummary, RatioAnalysis, RatioEngine, RatioEntry, RatioKind, RatioSet};
pub use report::{AssessmentReport, ReportPayloadBuilder, ReportSummaryView};
pub use repository::{
    RepositoryError, SessionId, SessionRecord, SessionRepository, SessionView,
};
pub use router::assessment_router;
pub use scoring::{CreditRating, ScoreBreakdown, ScoreOutcome, ScoringEngine};
pub use service::{AssessmentService, AssessmentServiceError, IntakeSubmission};
pub use storage::{DocumentStore, LocalDocumentStore, StorageKey};
pub use workflow::{AssessmentSession, AssessmentWorkflow};
