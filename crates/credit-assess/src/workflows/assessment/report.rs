use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{FinancialRecord, QualitativeScores, RetailerIdentity};
use super::error::{ComputationError, ValidationError};
use super::ratios::{RatioEntry, RatioSet};
use super::scoring::{CreditRating, ScoreBreakdown, ScoreOutcome, ScoringEngine};
use super::storage::StorageKey;

/// Final snapshot handed to report writers. Built once, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentReport {
    identity: RetailerIdentity,
    ratios: RatioSet,
    scores: QualitativeScores,
    final_score: Decimal,
    rating: CreditRating,
    breakdown: ScoreBreakdown,
    destination: StorageKey,
}

impl AssessmentReport {
    pub fn identity(&self) -> &RetailerIdentity {
        &self.identity
    }

    pub fn ratios(&self) -> &RatioSet {
        &self.ratios
    }

    pub fn scores(&self) -> &QualitativeScores {
        &self.scores
    }

    pub fn final_score(&self) -> Decimal {
        self.final_score
    }

    pub fn rating(&self) -> CreditRating {
        self.rating
    }

    pub fn breakdown(&self) -> &ScoreBreakdown {
        &self.breakdown
    }

    pub fn destination(&self) -> &StorageKey {
        &self.destination
    }

    /// Recomputes the outcome from the stored ratios and scores.
    pub fn rescore(&self) -> Result<ScoreOutcome, ComputationError> {
        ScoringEngine::score(&self.ratios, &self.scores)
    }

    pub fn summary_view(&self) -> ReportSummaryView {
        ReportSummaryView {
            retailer_name: self.identity.retailer_name.clone(),
            sap_code: self.identity.sap_code.clone(),
            file_number: self.identity.file_number.clone(),
            dealing_period: self.identity.dealing_period.label(),
            ratios: self.ratios.entries(),
            breakdown: self.breakdown.clone(),
            final_score: self.final_score,
            rating: self.rating,
            rating_label: self.rating.label(),
            analyst: self.scores.analyst.clone(),
            remarks: self.scores.remarks.clone(),
            destination: self.destination.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummaryView {
    pub retailer_name: String,
    pub sap_code: String,
    pub file_number: String,
    pub dealing_period: &'static str,
    pub ratios: Vec<RatioEntry>,
    pub breakdown: ScoreBreakdown,
    pub final_score: Decimal,
    pub rating: CreditRating,
    pub rating_label: &'static str,
    pub analyst: String,
    pub remarks: String,
    pub destination: String,
}

pub struct ReportPayloadBuilder;

impl ReportPayloadBuilder {
    /// Pure assembly: nothing is recomputed here.
    pub fn build(
        record: &FinancialRecord,
        ratios: &RatioSet,
        qualitative: &QualitativeScores,
        outcome: &ScoreOutcome,
    ) -> Result<AssessmentReport, ValidationError> {
        let destination = StorageKey::for_identity(&record.identity)?;

        Ok(AssessmentReport {
            identity: record.identity.clone(),
            ratios: ratios.clone(),
            scores: qualitative.clone(),
            final_score: outcome.final_score,
            rating: outcome.rating,
            breakdown: outcome.breakdown.clone(),
            destination,
        })
    }
}
