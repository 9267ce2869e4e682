//! Credit-analysis ratios derived from a [`FinancialRecord`].
//!
//! Every ratio treats a zero denominator as a ratio of zero so the review
//! stage always has a number to show. Values are rounded half-to-even to two
//! decimal places and always carry exactly two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::domain::FinancialRecord;
use super::error::ComputationError;

pub const RATIO_DECIMAL_PLACES: u32 = 2;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKind {
    TolTnw,
    CurrentRatio,
    PbditInterest,
    NetCashAccrualsToTotalDebt,
    AssetTurnover,
}

impl RatioKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::TolTnw,
            Self::CurrentRatio,
            Self::PbditInterest,
            Self::NetCashAccrualsToTotalDebt,
            Self::AssetTurnover,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TolTnw => "TOL/TNW",
            Self::CurrentRatio => "Current Ratio",
            Self::PbditInterest => "PBDIT/Interest",
            Self::NetCashAccrualsToTotalDebt => "Net Cash Accruals/Total Debt (%)",
            Self::AssetTurnover => "Asset Turnover",
        }
    }
}

/// The five ratios shown on the review stage and summed into the final score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioSet {
    pub tol_tnw: Decimal,
    pub current_ratio: Decimal,
    pub pbdit_interest: Decimal,
    pub net_cash_accruals_to_total_debt: Decimal,
    pub asset_turnover: Decimal,
}

impl RatioSet {
    pub fn get(&self, kind: RatioKind) -> Decimal {
        match kind {
            RatioKind::TolTnw => self.tol_tnw,
            RatioKind::CurrentRatio => self.current_ratio,
            RatioKind::PbditInterest => self.pbdit_interest,
            RatioKind::NetCashAccrualsToTotalDebt => self.net_cash_accruals_to_total_debt,
            RatioKind::AssetTurnover => self.asset_turnover,
        }
    }

    pub fn entries(&self) -> Vec<RatioEntry> {
        RatioKind::ordered()
            .into_iter()
            .map(|kind| RatioEntry {
                kind,
                label: kind.label(),
                value: self.get(kind),
            })
            .collect()
    }

    /// Sum of the already-rounded ratios.
    pub fn total(&self) -> Result<Decimal, ComputationError> {
        let total = checked_sum(
            "financial ratios total",
            &RatioKind::ordered().map(|kind| self.get(kind)),
        )?;
        two_places("financial ratios total", total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatioEntry {
    pub kind: RatioKind,
    pub label: &'static str,
    pub value: Decimal,
}

/// Unrounded intermediate figures the ratios are built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_outside_liabilities: Decimal,
    pub tangible_net_worth: Decimal,
    pub current_assets: Decimal,
    pub current_liabilities: Decimal,
    pub total_income: Decimal,
    pub pbdit: Decimal,
    pub pat: Decimal,
    pub net_cash_accrual: Decimal,
    pub total_debt: Decimal,
    pub working_assets: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioAnalysis {
    pub summary: FinancialSummary,
    pub ratios: RatioSet,
}

pub struct RatioEngine;

impl RatioEngine {
    pub fn compute(record: &FinancialRecord) -> Result<RatioSet, ComputationError> {
        Self::analyze(record).map(|analysis| analysis.ratios)
    }

    pub fn analyze(record: &FinancialRecord) -> Result<RatioAnalysis, ComputationError> {
        let summary = Self::summarize(record)?;
        let pnl = &record.profit_and_loss;

        let net_cash_share = ratio(
            "net cash accruals / total debt",
            summary.net_cash_accrual,
            summary.total_debt,
        )?;

        let ratios = RatioSet {
            tol_tnw: round_ratio(
                "TOL/TNW",
                ratio(
                    "TOL/TNW",
                    summary.total_outside_liabilities,
                    summary.tangible_net_worth,
                )?,
            )?,
            current_ratio: round_ratio(
                "current ratio",
                ratio(
                    "current ratio",
                    summary.current_assets,
                    summary.current_liabilities,
                )?,
            )?,
            pbdit_interest: round_ratio(
                "PBDIT/interest",
                ratio("PBDIT/interest", summary.pbdit, pnl.finance_costs)?,
            )?,
            net_cash_accruals_to_total_debt: round_ratio(
                "net cash accruals / total debt",
                net_cash_share
                    .checked_mul(HUNDRED)
                    .ok_or(ComputationError::Overflow {
                        context: "net cash accruals / total debt",
                    })?,
            )?,
            asset_turnover: round_ratio(
                "asset turnover",
                ratio("asset turnover", pnl.revenue, summary.working_assets)?,
            )?,
        };

        Ok(RatioAnalysis { summary, ratios })
    }

    pub fn summarize(record: &FinancialRecord) -> Result<FinancialSummary, ComputationError> {
        let liabilities = &record.balance_sheet.liabilities;
        let assets = &record.balance_sheet.assets;
        let pnl = &record.profit_and_loss;

        let total_outside_liabilities = checked_sum(
            "total outside liabilities",
            &[
                liabilities.long_term_borrowings,
                liabilities.short_term_borrowings,
                liabilities.other_current_liabilities,
                liabilities.trade_payables,
            ],
        )?;
        let tangible_net_worth = checked_sum(
            "tangible net worth",
            &[liabilities.owners_capital, liabilities.reserves_and_surplus],
        )?;
        let current_assets = checked_sum(
            "current assets",
            &[
                assets.inventories,
                assets.trade_receivables,
                assets.cash_and_bank,
                assets.other_current_assets,
            ],
        )?;
        let current_liabilities = checked_sum(
            "current liabilities",
            &[
                liabilities.short_term_borrowings,
                liabilities.trade_payables,
                liabilities.other_current_liabilities,
                liabilities.short_term_provisions,
            ],
        )?;
        let total_income = checked_sum("total income", &[pnl.revenue, pnl.other_income])?;
        let pbdit = checked_difference(
            "PBDIT",
            total_income,
            &[pnl.cost_of_goods_sold, pnl.other_expenses],
        )?;
        let pat = checked_difference(
            "PAT",
            total_income,
            &[
                pnl.cost_of_goods_sold,
                pnl.finance_costs,
                pnl.depreciation,
                pnl.other_expenses,
            ],
        )?;
        let net_cash_accrual = checked_sum("net cash accrual", &[pat, pnl.depreciation])?;
        let total_debt = checked_sum(
            "total debt",
            &[
                liabilities.long_term_borrowings,
                liabilities.short_term_borrowings,
            ],
        )?;
        let working_assets = checked_sum(
            "inventories and receivables",
            &[assets.inventories, assets.trade_receivables],
        )?;

        Ok(FinancialSummary {
            total_outside_liabilities,
            tangible_net_worth,
            current_assets,
            current_liabilities,
            total_income,
            pbdit,
            pat,
            net_cash_accrual,
            total_debt,
            working_assets,
        })
    }
}

/// Round half-to-even to two places and pin the scale so `4.5` reads `4.50`.
fn round_ratio(context: &'static str, value: Decimal) -> Result<Decimal, ComputationError> {
    let mut rounded =
        value.round_dp_with_strategy(RATIO_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    two_places(context, rounded)
}

/// Values too large to carry two decimal places are an overflow.
pub(crate) fn two_places(
    context: &'static str,
    mut value: Decimal,
) -> Result<Decimal, ComputationError> {
    value.rescale(RATIO_DECIMAL_PLACES);
    if value.scale() == RATIO_DECIMAL_PLACES {
        Ok(value)
    } else {
        Err(ComputationError::Overflow { context })
    }
}

fn ratio(
    context: &'static str,
    numerator: Decimal,
    denominator: Decimal,
) -> Result<Decimal, ComputationError> {
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }

    numerator
        .checked_div(denominator)
        .ok_or(ComputationError::Overflow { context })
}

pub(crate) fn checked_sum(
    context: &'static str,
    values: &[Decimal],
) -> Result<Decimal, ComputationError> {
    values.iter().try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(*value)
            .ok_or(ComputationError::Overflow { context })
    })
}

fn checked_difference(
    context: &'static str,
    minuend: Decimal,
    subtrahends: &[Decimal],
) -> Result<Decimal, ComputationError> {
    subtrahends.iter().try_fold(minuend, |acc, value| {
        acc.checked_sub(*value)
            .ok_or(ComputationError::Overflow { context })
    })
}
