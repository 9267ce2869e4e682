use std::fmt::{self, Debug};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::StorageError;
use super::ratios::RatioKind;
use super::report::AssessmentReport;
use super::storage::{ensure_directory, StorageKey};

/// Serializes a finished report somewhere under `destination`.
pub trait ReportWriter: Debug + Send + Sync {
    fn write(&self, report: &AssessmentReport, destination: &StorageKey)
        -> Result<(), StorageError>;
}

/// One-row spreadsheet export, overwritten on every regeneration.
#[derive(Debug, Clone)]
pub struct SpreadsheetReportWriter {
    root: PathBuf,
    base_name: String,
}

impl SpreadsheetReportWriter {
    pub fn new(root: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_name: base_name.into(),
        }
    }

    pub fn path_for(&self, destination: &StorageKey) -> PathBuf {
        destination
            .to_path(&self.root)
            .join(format!("{}.csv", self.base_name))
    }

    pub fn render(report: &AssessmentReport) -> Result<Vec<u8>, StorageError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec![
            "Retailer Name".to_string(),
            "SAP Code".to_string(),
            "File Number".to_string(),
            "Dealing Period".to_string(),
        ];
        header.extend(RatioKind::ordered().map(|kind| kind.label().to_string()));
        header.extend(
            [
                "Financial Ratios Total",
                "Business Score",
                "Managerial Score",
                "Quantity Increase",
                "Final Score",
                "Rating",
                "Analyst",
                "Remarks",
            ]
            .map(str::to_string),
        );
        writer.write_record(&header)?;

        let identity = report.identity();
        let breakdown = report.breakdown();
        let scores = report.scores();
        let mut row = vec![
            identity.retailer_name.clone(),
            identity.sap_code.clone(),
            identity.file_number.clone(),
            identity.dealing_period.label().to_string(),
        ];
        row.extend(
            RatioKind::ordered().map(|kind| report.ratios().get(kind).to_string()),
        );
        row.extend([
            breakdown.financial_ratios_total.to_string(),
            breakdown.business.to_string(),
            breakdown.managerial.to_string(),
            breakdown.quantity_increase.to_string(),
            report.final_score().to_string(),
            report.rating().label().to_string(),
            scores.analyst.clone(),
            scores.remarks.clone(),
        ]);
        writer.write_record(&row)?;

        writer
            .into_inner()
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

impl ReportWriter for SpreadsheetReportWriter {
    fn write(
        &self,
        report: &AssessmentReport,
        destination: &StorageKey,
    ) -> Result<(), StorageError> {
        let bytes = Self::render(report)?;
        write_file(&self.path_for(destination), &bytes)
    }
}

/// Narrative Markdown write-up of the assessment.
#[derive(Debug, Clone)]
pub struct DocumentReportWriter {
    root: PathBuf,
    base_name: String,
}

impl DocumentReportWriter {
    pub fn new(root: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_name: base_name.into(),
        }
    }

    pub fn path_for(&self, destination: &StorageKey) -> PathBuf {
        destination
            .to_path(&self.root)
            .join(format!("{}.md", self.base_name))
    }

    pub fn render(report: &AssessmentReport) -> String {
        MarkdownReport(report).to_string()
    }
}

struct MarkdownReport<'a>(&'a AssessmentReport);

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let identity = report.identity();
        let breakdown = report.breakdown();
        let scores = report.scores();

        writeln!(f, "# Credit Assessment: {}", identity.retailer_name)?;
        writeln!(f)?;
        writeln!(f, "- SAP Code: {}", or_dash(&identity.sap_code))?;
        writeln!(f, "- File Number: {}", or_dash(&identity.file_number))?;
        writeln!(f, "- Dealing Period: {}", identity.dealing_period.label())?;
        if let Some(location) = &identity.location {
            match location.district.as_deref() {
                Some(district) if !district.trim().is_empty() => {
                    writeln!(f, "- Location: {}, {}", district, location.state)?;
                }
                _ => writeln!(f, "- Location: {}", location.state)?,
            }
        }

        writeln!(f)?;
        writeln!(f, "## Financial Ratios")?;
        writeln!(f)?;
        writeln!(f, "| Ratio | Value |")?;
        writeln!(f, "|---|---|")?;
        for entry in report.ratios().entries() {
            writeln!(f, "| {} | {} |", entry.label, entry.value)?;
        }

        writeln!(f)?;
        writeln!(f, "## Score Breakdown")?;
        writeln!(f)?;
        writeln!(
            f,
            "- Financial Ratios Total: {}",
            breakdown.financial_ratios_total
        )?;
        writeln!(f, "- Business Score: {}", breakdown.business)?;
        writeln!(f, "- Managerial Score: {}", breakdown.managerial)?;
        writeln!(f, "- Quantity Increase: {}", breakdown.quantity_increase)?;
        writeln!(f)?;
        writeln!(
            f,
            "**Final Credit Score: {} | Rating: {}**",
            report.final_score(),
            report.rating()
        )?;

        writeln!(f)?;
        writeln!(f, "## Analyst Notes")?;
        writeln!(f)?;
        writeln!(f, "- Analysed By: {}", or_dash(&scores.analyst))?;
        writeln!(f, "- Remarks: {}", or_dash(&scores.remarks))
    }
}

impl ReportWriter for DocumentReportWriter {
    fn write(
        &self,
        report: &AssessmentReport,
        destination: &StorageKey,
    ) -> Result<(), StorageError> {
        let body = Self::render(report);
        write_file(&self.path_for(destination), body.as_bytes())
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }
    fs::write(path, bytes).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}
