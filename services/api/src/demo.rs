use crate::infra::{InMemorySessionRepository, StorageBackends};
use clap::Args;
use credit_assess::config::StorageConfig;
use credit_assess::error::AppError;
use credit_assess::workflows::assessment::{
    AssessmentReport, AssessmentService, Assets, BalanceSheet, DealingPeriod, FinancialRecord,
    IntakeSubmission, Liabilities, Location, ProfitAndLoss, QualitativeScores, RetailerIdentity,
    SupportingDocument,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// JSON file holding the financial record, document paths and analyst scores
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Override the configured storage root for retailer folders
    #[arg(long)]
    pub(crate) output_root: Option<PathBuf>,
    /// Compute and print the assessment without saving documents or reports
    #[arg(long)]
    pub(crate) no_write: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Save the sample documents and reports under the configured storage root
    #[arg(long)]
    pub(crate) write: bool,
}

/// Shape of the `assess --input` file.
#[derive(Debug, Deserialize)]
pub(crate) struct AssessmentInput {
    pub(crate) record: FinancialRecord,
    /// Local files to upload as supporting documents.
    #[serde(default)]
    pub(crate) documents: Vec<PathBuf>,
    #[serde(default)]
    pub(crate) scores: QualitativeScores,
}

pub(crate) fn load_assessment_input(path: &Path) -> Result<AssessmentInput, AppError> {
    let raw = fs::read(path)?;
    let input = serde_json::from_slice(&raw).map_err(std::io::Error::from)?;
    Ok(input)
}

fn read_documents(paths: &[PathBuf]) -> Result<Vec<SupportingDocument>, AppError> {
    paths
        .iter()
        .map(|path| -> Result<SupportingDocument, AppError> {
            let content = fs::read(path)?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(SupportingDocument::new(file_name, content))
        })
        .collect()
}

pub(crate) fn run_assess(args: AssessArgs, mut storage: StorageConfig) -> Result<(), AppError> {
    let AssessArgs {
        input,
        output_root,
        no_write,
    } = args;

    if let Some(root) = output_root {
        storage.root = root;
    }

    let input = load_assessment_input(&input)?;
    let documents = read_documents(&input.documents)?;
    let backends = if no_write {
        StorageBackends::preview()
    } else {
        StorageBackends::local(&storage)
    };

    let report = run_session(
        backends,
        IntakeSubmission {
            record: input.record,
            documents,
        },
        input.scores,
    )?;
    render_report(&report);

    if no_write {
        println!("\nPreview only: nothing was saved");
    } else {
        println!(
            "\nSaved under {}",
            report.destination().to_path(&storage.root).display()
        );
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs, storage: StorageConfig) -> Result<(), AppError> {
    println!("Retailer credit assessment demo");
    let backends = if args.write {
        StorageBackends::local(&storage)
    } else {
        StorageBackends::preview()
    };

    let submission = IntakeSubmission {
        record: demo_record(),
        documents: vec![SupportingDocument::new(
            "balance_sheet_fy24.pdf",
            b"%PDF-1.4 sample".to_vec(),
        )],
    };
    let report = run_session(backends, submission, QualitativeScores::default())?;
    render_report(&report);

    if args.write {
        println!(
            "\nSaved under {}",
            report.destination().to_path(&storage.root).display()
        );
    }
    Ok(())
}

/// Drives one session from intake to a generated report.
fn run_session(
    backends: StorageBackends,
    submission: IntakeSubmission,
    scores: QualitativeScores,
) -> Result<AssessmentReport, AppError> {
    let service = AssessmentService::new(
        Arc::new(InMemorySessionRepository::default()),
        backends.documents,
        backends.writers,
    );

    let id = service.open()?.id;
    service.submit_intake(&id, submission)?;
    let review = service.advance(&id)?;
    if let Some(ratios) = review.session.ratios() {
        println!("\nRatio review for {}", review.session.record().identity.retailer_name);
        for entry in ratios.entries() {
            println!("- {}: {}", entry.label, entry.value);
        }
    }
    if let Some(summary) = review.session.summary() {
        println!(
            "  (TNW {}, TOL {}, PBDIT {}, net cash accrual {})",
            summary.tangible_net_worth,
            summary.total_outside_liabilities,
            summary.pbdit,
            summary.net_cash_accrual
        );
    }
    service.advance(&id)?;
    let report = service.generate_report(&id, scores)?;
    service.close(&id)?;
    Ok(report)
}

fn render_report(report: &AssessmentReport) {
    let identity = report.identity();
    let breakdown = report.breakdown();

    println!("\nFinal scoring");
    println!(
        "- Retailer: {} (SAP {}, file {})",
        identity.retailer_name,
        dash_if_blank(&identity.sap_code),
        dash_if_blank(&identity.file_number)
    );
    println!("- Dealing period: {}", identity.dealing_period.label());
    println!("Score breakdown:");
    println!(
        "  - Financial ratios total: {}",
        breakdown.financial_ratios_total
    );
    println!("  - Business score: {}", breakdown.business);
    println!("  - Managerial score: {}", breakdown.managerial);
    println!("  - Quantity increase: {}", breakdown.quantity_increase);
    println!(
        "Final credit score {} -> rating {}",
        report.final_score(),
        report.rating()
    );
    println!("Report destination: {}", report.destination());
}

fn dash_if_blank(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Worked example: ratios 0.93 / 0.76 / 4.50 / 70.00 / 4.00.
pub(crate) fn demo_record() -> FinancialRecord {
    FinancialRecord {
        identity: RetailerIdentity {
            retailer_name: "Sri Lakshmi Traders".to_string(),
            sap_code: "700981".to_string(),
            file_number: "CR/DEMO/001".to_string(),
            dealing_period: DealingPeriod::ThreeToFiveYears,
            location: Some(Location {
                state: "Andhra Pradesh".to_string(),
                district: Some("Guntur".to_string()),
            }),
        },
        balance_sheet: BalanceSheet {
            liabilities: Liabilities {
                owners_capital: Decimal::from(100_000),
                reserves_and_surplus: Decimal::from(50_000),
                long_term_borrowings: Decimal::from(60_000),
                short_term_borrowings: Decimal::from(40_000),
                trade_payables: Decimal::from(30_000),
                other_current_liabilities: Decimal::from(10_000),
                short_term_provisions: Decimal::from(5_000),
                ..Liabilities::default()
            },
            assets: Assets {
                inventories: Decimal::from(20_000),
                trade_receivables: Decimal::from(30_000),
                cash_and_bank: Decimal::from(10_000),
                other_current_assets: Decimal::from(5_000),
                ..Assets::default()
            },
        },
        profit_and_loss: ProfitAndLoss {
            revenue: Decimal::from(200_000),
            other_income: Decimal::from(5_000),
            cost_of_goods_sold: Decimal::from(100_000),
            finance_costs: Decimal::from(20_000),
            depreciation: Decimal::from(10_000),
            other_expenses: Decimal::from(15_000),
        },
    }
}
