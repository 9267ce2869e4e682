use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::domain::QualitativeScores;
use super::error::ComputationError;
use super::ratios::{checked_sum, two_places, RatioSet};

/// Letter grade, declared worst to best so `Ord` follows creditworthiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreditRating {
    D,
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B-")]
    BMinus,
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    AMinus,
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl CreditRating {
    pub const fn label(self) -> &'static str {
        match self {
            Self::D => "D",
            Self::C => "C",
            Self::CPlus => "C+",
            Self::BMinus => "B-",
            Self::B => "B",
            Self::BPlus => "B+",
            Self::AMinus => "A-",
            Self::A => "A",
            Self::APlus => "A+",
        }
    }

    /// First band whose threshold the score strictly exceeds; `D` otherwise.
    pub fn from_score(score: Decimal) -> Self {
        RATING_LADDER
            .iter()
            .find(|(threshold, _)| score > *threshold)
            .map(|(_, rating)| *rating)
            .unwrap_or(Self::D)
    }
}

impl fmt::Display for CreditRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Exclusive lower bounds, evaluated top-down.
const RATING_LADDER: [(Decimal, CreditRating); 8] = [
    (dec!(80), CreditRating::APlus),
    (dec!(75), CreditRating::A),
    (dec!(70), CreditRating::AMinus),
    (dec!(65), CreditRating::BPlus),
    (dec!(60), CreditRating::B),
    (dec!(50), CreditRating::BMinus),
    (dec!(40), CreditRating::CPlus),
    (dec!(30), CreditRating::C),
];

/// Contribution of each input group to the final score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub financial_ratios_total: Decimal,
    pub business: u8,
    pub managerial: u8,
    pub quantity_increase: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub final_score: Decimal,
    pub rating: CreditRating,
    pub breakdown: ScoreBreakdown,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Ratios of different units are added straight onto the qualitative
    /// points. The rating bands are calibrated against that sum.
    pub fn score(
        ratios: &RatioSet,
        qualitative: &QualitativeScores,
    ) -> Result<ScoreOutcome, ComputationError> {
        Self::check_bounds(qualitative)?;

        let financial_ratios_total = ratios.total()?;
        let final_score = two_places(
            "final score",
            checked_sum(
                "final score",
                &[financial_ratios_total, qualitative.points()],
            )?,
        )?;

        Ok(ScoreOutcome {
            final_score,
            rating: CreditRating::from_score(final_score),
            breakdown: ScoreBreakdown {
                financial_ratios_total,
                business: qualitative.business,
                managerial: qualitative.managerial,
                quantity_increase: qualitative.quantity_increase,
            },
        })
    }

    fn check_bounds(qualitative: &QualitativeScores) -> Result<(), ComputationError> {
        let bounds = [
            ("business", qualitative.business, QualitativeScores::BUSINESS_MAX),
            (
                "managerial",
                qualitative.managerial,
                QualitativeScores::MANAGERIAL_MAX,
            ),
            (
                "quantity increase",
                qualitative.quantity_increase,
                QualitativeScores::QUANTITY_INCREASE_MAX,
            ),
        ];

        for (field, value, max) in bounds {
            if value > max {
                return Err(ComputationError::ScoreOutOfRange { field, value, max });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratios(tol_tnw: Decimal, net_cash: Decimal) -> RatioSet {
        RatioSet {
            tol_tnw,
            current_ratio: dec!(0.00),
            pbdit_interest: dec!(0.00),
            net_cash_accruals_to_total_debt: net_cash,
            asset_turnover: dec!(0.00),
        }
    }

    fn zero_points() -> QualitativeScores {
        QualitativeScores {
            business: 0,
            managerial: 0,
            quantity_increase: 0,
            ..QualitativeScores::default()
        }
    }

    #[test]
    fn band_lower_bounds_are_exclusive() {
        assert_eq!(CreditRating::from_score(dec!(80.00)), CreditRating::A);
        assert_eq!(CreditRating::from_score(dec!(80.01)), CreditRating::APlus);
        assert_eq!(CreditRating::from_score(dec!(75)), CreditRating::AMinus);
        assert_eq!(CreditRating::from_score(dec!(50)), CreditRating::CPlus);
        assert_eq!(CreditRating::from_score(dec!(30.00)), CreditRating::D);
        assert_eq!(CreditRating::from_score(dec!(30.01)), CreditRating::C);
        assert_eq!(CreditRating::from_score(dec!(-12.5)), CreditRating::D);
    }

    #[test]
    fn every_band_is_reachable() {
        let cases = [
            (dec!(81), CreditRating::APlus),
            (dec!(76), CreditRating::A),
            (dec!(71), CreditRating::AMinus),
            (dec!(66), CreditRating::BPlus),
            (dec!(61), CreditRating::B),
            (dec!(51), CreditRating::BMinus),
            (dec!(41), CreditRating::CPlus),
            (dec!(31), CreditRating::C),
            (dec!(29), CreditRating::D),
        ];
        for (score, expected) in cases {
            assert_eq!(CreditRating::from_score(score), expected, "score {score}");
        }
    }

    #[test]
    fn rating_never_drops_as_score_rises() {
        let mut previous = CreditRating::D;
        let mut score = dec!(-5.00);
        while score <= dec!(110.00) {
            let rating = CreditRating::from_score(score);
            assert!(rating >= previous, "{score} rated {rating} below {previous}");
            previous = rating;
            score += dec!(0.01);
        }
        assert_eq!(previous, CreditRating::APlus);
    }

    #[test]
    fn sums_ratios_and_points() {
        let outcome = ScoringEngine::score(
            &RatioSet {
                tol_tnw: dec!(0.93),
                current_ratio: dec!(0.76),
                pbdit_interest: dec!(4.50),
                net_cash_accruals_to_total_debt: dec!(70.00),
                asset_turnover: dec!(4.00),
            },
            &QualitativeScores::default(),
        )
        .expect("score computes");

        assert_eq!(outcome.final_score, dec!(105.19));
        assert_eq!(outcome.rating, CreditRating::APlus);
        assert_eq!(outcome.breakdown.financial_ratios_total, dec!(80.19));
        assert_eq!(outcome.breakdown.business, 15);
    }

    #[test]
    fn exact_eighty_is_an_a() {
        let outcome = ScoringEngine::score(&ratios(dec!(0.00), dec!(80.00)), &zero_points())
            .expect("score computes");
        assert_eq!(outcome.final_score.to_string(), "80.00");
        assert_eq!(outcome.rating, CreditRating::A);

        let outcome = ScoringEngine::score(&ratios(dec!(0.01), dec!(80.00)), &zero_points())
            .expect("score computes");
        assert_eq!(outcome.rating, CreditRating::APlus);
    }

    #[test]
    fn rejects_scores_beyond_their_scale() {
        let scores = QualitativeScores {
            business: 26,
            ..QualitativeScores::default()
        };
        let err = ScoringEngine::score(&ratios(dec!(1.00), dec!(1.00)), &scores)
            .expect_err("business above 25 rejected");
        assert_eq!(
            err,
            ComputationError::ScoreOutOfRange {
                field: "business",
                value: 26,
                max: 25,
            }
        );
    }

    #[test]
    fn score_too_large_for_two_places_is_an_overflow() {
        let err = ScoringEngine::score(
            &ratios(dec!(70000000000000000000000000000), dec!(0.00)),
            &QualitativeScores::default(),
        )
        .expect_err("cannot carry two places");
        assert!(matches!(err, ComputationError::Overflow { .. }));
    }

    #[test]
    fn labels_serialize_as_grades() {
        let json = serde_json::to_string(&CreditRating::BMinus).expect("serialize");
        assert_eq!(json, "\"B-\"");
        assert_eq!(CreditRating::APlus.to_string(), "A+");
    }
}
