use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stages of a single assessment session, in the order an analyst walks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStage {
    #[default]
    Intake,
    RatioReview,
    FinalScoring,
}

impl AssessmentStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Intake => "Financial Data Entry",
            Self::RatioReview => "Ratios & Financial Scoring",
            Self::FinalScoring => "Scoring & Final Report",
        }
    }

    /// Stage reached by the "advance" action, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Intake => Some(Self::RatioReview),
            Self::RatioReview => Some(Self::FinalScoring),
            Self::FinalScoring => None,
        }
    }

    /// Stage reached by the "retreat" action. Only ratio review may step back.
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::RatioReview => Some(Self::Intake),
            Self::Intake | Self::FinalScoring => None,
        }
    }
}

/// Tenure of the retailer's relationship with the principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealingPeriod {
    #[default]
    MoreThanFiveYears,
    ThreeToFiveYears,
    OneToThreeYears,
    LessThanOneYear,
    NewDealer,
}

impl DealingPeriod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MoreThanFiveYears => "More Than 5 years Active",
            Self::ThreeToFiveYears => "From 3 to 5 Years Active",
            Self::OneToThreeYears => "From 1 to 3 years Active",
            Self::LessThanOneYear => "Less than 1 year Active",
            Self::NewDealer => "New Dealer",
        }
    }
}

/// Optional state / district hierarchy the retailer folder is nested under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RetailerIdentity {
    pub retailer_name: String,
    #[serde(default)]
    pub sap_code: String,
    #[serde(default)]
    pub file_number: String,
    #[serde(default)]
    pub dealing_period: DealingPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl RetailerIdentity {
    pub fn has_name(&self) -> bool {
        !self.retailer_name.trim().is_empty()
    }
}

/// Equity and liabilities side of the balance sheet (amounts in Rs.).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Liabilities {
    pub owners_capital: Decimal,
    pub reserves_and_surplus: Decimal,
    pub long_term_borrowings: Decimal,
    pub deferred_tax_liabilities: Decimal,
    pub other_long_term_liabilities: Decimal,
    pub short_term_borrowings: Decimal,
    pub trade_payables: Decimal,
    pub other_current_liabilities: Decimal,
    pub short_term_provisions: Decimal,
}

/// Assets side of the balance sheet (amounts in Rs.).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Assets {
    pub property_plant_equipment: Decimal,
    pub intangible_assets: Decimal,
    pub capital_work_in_progress: Decimal,
    pub non_current_investments: Decimal,
    pub inventories: Decimal,
    pub trade_receivables: Decimal,
    pub cash_and_bank: Decimal,
    pub other_current_assets: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceSheet {
    pub liabilities: Liabilities,
    pub assets: Assets,
}

/// Profit & loss statement (amounts in Rs.).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitAndLoss {
    pub revenue: Decimal,
    pub other_income: Decimal,
    pub cost_of_goods_sold: Decimal,
    pub finance_costs: Decimal,
    pub depreciation: Decimal,
    pub other_expenses: Decimal,
}

/// Everything captured on the intake form. Missing amounts default to zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub identity: RetailerIdentity,
    #[serde(default)]
    pub balance_sheet: BalanceSheet,
    #[serde(default)]
    pub profit_and_loss: ProfitAndLoss,
}

/// An uploaded financial statement or supporting file awaiting persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportingDocument {
    pub file_name: String,
    #[serde(default)]
    pub content: Vec<u8>,
}

impl SupportingDocument {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// Analyst judgement collected on the final scoring stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitativeScores {
    pub business: u8,
    pub managerial: u8,
    pub quantity_increase: u8,
    pub analyst: String,
    pub remarks: String,
}

impl QualitativeScores {
    pub const BUSINESS_MAX: u8 = 25;
    pub const MANAGERIAL_MAX: u8 = 10;
    pub const QUANTITY_INCREASE_MAX: u8 = 10;

    pub fn points(&self) -> Decimal {
        Decimal::from(self.business)
            + Decimal::from(self.managerial)
            + Decimal::from(self.quantity_increase)
    }
}

impl Default for QualitativeScores {
    fn default() -> Self {
        Self {
            business: 15,
            managerial: 5,
            quantity_increase: 5,
            analyst: String::new(),
            remarks: String::new(),
        }
    }
}
