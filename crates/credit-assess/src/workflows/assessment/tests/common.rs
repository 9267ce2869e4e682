use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::workflows::assessment::domain::{
    Assets, BalanceSheet, DealingPeriod, FinancialRecord, Liabilities, Location, ProfitAndLoss,
    QualitativeScores, RetailerIdentity, SupportingDocument,
};
use crate::workflows::assessment::error::StorageError;
use crate::workflows::assessment::export::ReportWriter;
use crate::workflows::assessment::report::AssessmentReport;
use crate::workflows::assessment::repository::{
    RepositoryError, SessionId, SessionRecord, SessionRepository,
};
use crate::workflows::assessment::storage::{DocumentStore, StorageKey};
use crate::workflows::assessment::{AssessmentService, AssessmentWorkflow};

pub(super) fn reference_record() -> FinancialRecord {
    FinancialRecord {
        identity: RetailerIdentity {
            retailer_name: "Balaji Enterprises".to_string(),
            sap_code: "700123".to_string(),
            file_number: "CR/2024/091".to_string(),
            dealing_period: DealingPeriod::ThreeToFiveYears,
            location: Some(Location {
                state: "Tamil Nadu".to_string(),
                district: Some("Coimbatore".to_string()),
            }),
        },
        balance_sheet: BalanceSheet {
            liabilities: Liabilities {
                owners_capital: dec!(100000),
                reserves_and_surplus: dec!(50000),
                long_term_borrowings: dec!(60000),
                short_term_borrowings: dec!(40000),
                trade_payables: dec!(30000),
                other_current_liabilities: dec!(10000),
                short_term_provisions: dec!(5000),
                ..Liabilities::default()
            },
            assets: Assets {
                inventories: dec!(20000),
                trade_receivables: dec!(30000),
                cash_and_bank: dec!(10000),
                other_current_assets: dec!(5000),
                ..Assets::default()
            },
        },
        profit_and_loss: ProfitAndLoss {
            revenue: dec!(200000),
            other_income: dec!(5000),
            cost_of_goods_sold: dec!(100000),
            finance_costs: dec!(20000),
            depreciation: dec!(10000),
            other_expenses: dec!(15000),
        },
    }
}

pub(super) fn documents() -> Vec<SupportingDocument> {
    vec![
        SupportingDocument::new("balance_sheet_fy24.pdf", b"%PDF-balance".to_vec()),
        SupportingDocument::new("gst_returns.xlsx", b"PK-gst".to_vec()),
    ]
}

pub(super) fn analyst_scores() -> QualitativeScores {
    QualitativeScores {
        business: 15,
        managerial: 5,
        quantity_increase: 5,
        analyst: "K. Menon".to_string(),
        remarks: "Long standing dealer".to_string(),
    }
}

#[derive(Debug, Default)]
pub(super) struct MemoryStore {
    pub(super) stored: Mutex<Vec<(String, String, Vec<u8>)>>,
}

impl MemoryStore {
    pub(super) fn stored(&self) -> Vec<(String, String, Vec<u8>)> {
        self.stored.lock().expect("store mutex poisoned").clone()
    }
}

impl DocumentStore for MemoryStore {
    fn store(
        &self,
        folder: &StorageKey,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(), StorageError> {
        self.stored.lock().expect("store mutex poisoned").push((
            folder.to_string(),
            file_name.to_string(),
            bytes.to_vec(),
        ));
        Ok(())
    }
}

#[derive(Debug)]
pub(super) struct OfflineStore;

impl DocumentStore for OfflineStore {
    fn store(
        &self,
        folder: &StorageKey,
        _file_name: &str,
        _bytes: &[u8],
    ) -> Result<(), StorageError> {
        Err(StorageError::Io {
            path: folder.to_path(std::path::Path::new("Retailers")),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume"),
        })
    }
}

#[derive(Debug, Default)]
pub(super) struct MemoryWriter {
    pub(super) reports: Mutex<Vec<(String, AssessmentReport)>>,
}

impl MemoryWriter {
    pub(super) fn reports(&self) -> Vec<(String, AssessmentReport)> {
        self.reports.lock().expect("writer mutex poisoned").clone()
    }
}

impl ReportWriter for MemoryWriter {
    fn write(
        &self,
        report: &AssessmentReport,
        destination: &StorageKey,
    ) -> Result<(), StorageError> {
        self.reports
            .lock()
            .expect("writer mutex poisoned")
            .push((destination.to_string(), report.clone()));
        Ok(())
    }
}

#[derive(Debug)]
pub(super) struct BrokenWriter;

impl ReportWriter for BrokenWriter {
    fn write(
        &self,
        _report: &AssessmentReport,
        _destination: &StorageKey,
    ) -> Result<(), StorageError> {
        Err(StorageError::Serialization("spreadsheet engine crashed".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemorySessions {
    records: Mutex<HashMap<SessionId, SessionRecord>>,
}

impl SessionRepository for MemorySessions {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        match guard.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

pub(super) struct OfflineSessions;

impl SessionRepository for OfflineSessions {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("session cache offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("session cache offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("session cache offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("session cache offline".to_string()))
    }
}

pub(super) struct Harness {
    pub(super) store: Arc<MemoryStore>,
    pub(super) writer: Arc<MemoryWriter>,
}

impl Harness {
    pub(super) fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
            writer: Arc::new(MemoryWriter::default()),
        }
    }

    pub(super) fn workflow(&self) -> AssessmentWorkflow {
        AssessmentWorkflow::new(
            self.store.clone(),
            vec![self.writer.clone() as Arc<dyn ReportWriter>],
        )
    }

    pub(super) fn service(&self) -> AssessmentService<MemorySessions> {
        AssessmentService::new(
            Arc::new(MemorySessions::default()),
            self.store.clone(),
            vec![self.writer.clone() as Arc<dyn ReportWriter>],
        )
    }
}

/// Workflow already moved through intake into ratio review.
pub(super) fn workflow_at_review(harness: &Harness) -> AssessmentWorkflow {
    let mut workflow = harness.workflow();
    workflow
        .submit_intake(reference_record(), documents())
        .expect("intake accepted");
    workflow.advance().expect("advance to ratio review");
    workflow
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
