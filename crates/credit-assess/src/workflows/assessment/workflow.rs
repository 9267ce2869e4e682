//! Stage sequencing for one assessment session.
//!
//! [`AssessmentSession`] is the whole per-session state. [`AssessmentWorkflow`]
//! wraps a session together with the storage collaborators, runs one action at
//! a time and hands the session back through [`AssessmentWorkflow::into_session`].
//! An action either completes or leaves the session exactly as it found it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{AssessmentStage, FinancialRecord, QualitativeScores, SupportingDocument};
use super::error::{AssessmentError, ValidationError};
use super::export::ReportWriter;
use super::ratios::{FinancialSummary, RatioEngine, RatioSet};
use super::report::{AssessmentReport, ReportPayloadBuilder};
use super::scoring::ScoringEngine;
use super::storage::{DocumentStore, StorageKey};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSession {
    stage: AssessmentStage,
    record: FinancialRecord,
    documents: Vec<SupportingDocument>,
    ratios: Option<RatioSet>,
    summary: Option<FinancialSummary>,
    scores: Option<QualitativeScores>,
    report: Option<AssessmentReport>,
}

impl AssessmentSession {
    pub fn stage(&self) -> AssessmentStage {
        self.stage
    }

    pub fn record(&self) -> &FinancialRecord {
        &self.record
    }

    pub fn documents(&self) -> &[SupportingDocument] {
        &self.documents
    }

    pub fn ratios(&self) -> Option<&RatioSet> {
        self.ratios.as_ref()
    }

    /// Intermediate figures behind the current ratios.
    pub fn summary(&self) -> Option<&FinancialSummary> {
        self.summary.as_ref()
    }

    /// Qualitative inputs of the last successful report, for pre-filling.
    pub fn scores(&self) -> Option<&QualitativeScores> {
        self.scores.as_ref()
    }

    pub fn report(&self) -> Option<&AssessmentReport> {
        self.report.as_ref()
    }
}

#[derive(Debug)]
pub struct AssessmentWorkflow {
    session: AssessmentSession,
    documents: Arc<dyn DocumentStore>,
    writers: Vec<Arc<dyn ReportWriter>>,
}

impl AssessmentWorkflow {
    /// Fresh session at intake with an empty record.
    pub fn new(documents: Arc<dyn DocumentStore>, writers: Vec<Arc<dyn ReportWriter>>) -> Self {
        Self::resume(AssessmentSession::default(), documents, writers)
    }

    pub fn resume(
        session: AssessmentSession,
        documents: Arc<dyn DocumentStore>,
        writers: Vec<Arc<dyn ReportWriter>>,
    ) -> Self {
        Self {
            session,
            documents,
            writers,
        }
    }

    pub fn session(&self) -> &AssessmentSession {
        &self.session
    }

    pub fn into_session(self) -> AssessmentSession {
        self.session
    }

    pub fn stage(&self) -> AssessmentStage {
        self.session.stage
    }

    /// Replace the intake data. Only possible while the session is at intake.
    pub fn submit_intake(
        &mut self,
        record: FinancialRecord,
        documents: Vec<SupportingDocument>,
    ) -> Result<(), AssessmentError> {
        self.require_stage("edit financial data", AssessmentStage::Intake)?;

        self.session.record = record;
        self.session.documents = documents;
        Ok(())
    }

    pub fn advance(&mut self) -> Result<AssessmentStage, AssessmentError> {
        let current = self.session.stage;
        let next = current.next().ok_or_else(|| {
            self.reject(ValidationError::ActionNotAllowed {
                action: "advance",
                stage: current,
            })
        })?;

        if current == AssessmentStage::Intake {
            self.leave_intake()?;
        } else if self.session.ratios.is_none() {
            return Err(self.reject(ValidationError::RatiosMissing));
        }

        info!(
            from = ?self.session.stage,
            to = ?next,
            retailer = %self.session.record.identity.retailer_name,
            "assessment advanced"
        );
        self.session.stage = next;
        Ok(next)
    }

    pub fn retreat(&mut self) -> Result<AssessmentStage, AssessmentError> {
        let current = self.session.stage;
        let previous = current.previous().ok_or_else(|| {
            self.reject(ValidationError::ActionNotAllowed {
                action: "go back",
                stage: current,
            })
        })?;

        // Ratios belong to the visit that computed them; re-advancing recomputes.
        self.session.ratios = None;
        self.session.summary = None;
        self.session.stage = previous;
        info!(from = ?current, to = ?previous, "assessment stepped back");
        Ok(previous)
    }

    /// Score, assemble and hand the report to every writer. The stage does not
    /// change, so the analyst may adjust inputs and regenerate.
    pub fn generate_report(
        &mut self,
        qualitative: QualitativeScores,
    ) -> Result<AssessmentReport, AssessmentError> {
        self.require_stage("generate a report", AssessmentStage::FinalScoring)?;

        let ratios = self
            .session
            .ratios
            .as_ref()
            .ok_or_else(|| self.reject(ValidationError::RatiosMissing))?;

        let outcome = ScoringEngine::score(ratios, &qualitative)?;
        let report =
            ReportPayloadBuilder::build(&self.session.record, ratios, &qualitative, &outcome)?;

        for writer in &self.writers {
            if let Err(err) = writer.write(&report, report.destination()) {
                warn!(destination = %report.destination(), error = %err, "report writer failed");
                return Err(err.into());
            }
        }

        info!(
            retailer = %report.identity().retailer_name,
            final_score = %report.final_score(),
            rating = %report.rating(),
            destination = %report.destination(),
            "assessment report generated"
        );

        self.session.scores = Some(qualitative);
        self.session.report = Some(report.clone());
        Ok(report)
    }

    /// Discard everything and start over at intake.
    pub fn reset(&mut self) {
        self.session = AssessmentSession::default();
    }

    fn leave_intake(&mut self) -> Result<(), AssessmentError> {
        let folder = StorageKey::for_identity(&self.session.record.identity)
            .map_err(|err| self.reject(err))?;

        let analysis = RatioEngine::analyze(&self.session.record)?;
        debug!(ratios = ?analysis.ratios, summary = ?analysis.summary, "ratios computed");

        for document in &self.session.documents {
            if let Err(err) = self
                .documents
                .store(&folder, &document.file_name, &document.content)
            {
                warn!(%folder, file = %document.file_name, error = %err, "document upload failed");
                return Err(err.into());
            }
        }

        self.session.ratios = Some(analysis.ratios);
        self.session.summary = Some(analysis.summary);
        Ok(())
    }

    fn require_stage(
        &self,
        action: &'static str,
        expected: AssessmentStage,
    ) -> Result<(), AssessmentError> {
        if self.session.stage == expected {
            Ok(())
        } else {
            Err(self.reject(ValidationError::ActionNotAllowed {
                action,
                stage: self.session.stage,
            }))
        }
    }

    fn reject(&self, err: ValidationError) -> AssessmentError {
        warn!(stage = ?self.session.stage, error = %err, "assessment action rejected");
        AssessmentError::Validation(err)
    }
}
