//! Compliance report generation.
//!
//! [`compose`] lays out a single-page PDF from a [`ReportData`] snapshot.
//! Required metadata is validated before anything is drawn, so a failed
//! composition never yields a partial document.

pub mod composer;
pub mod fonts;
pub mod pdf;

pub use composer::{certificate_id, certificate_text, compose, to_base36, DISCLAIMER};

use crate::core::{ComplianceStatus, RegulatoryLimits, ScoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the composer needs for one report, captured at request time.
///
/// Metadata fields are optional so that absent values can be reported as
/// `MissingField` instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(default)]
    pub batch_id: Option<String>,
    #[serde(default)]
    pub test_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub oil_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_address: Option<String>,
    pub results: ReportResults,
    #[serde(default)]
    pub limits: RegulatoryLimits,
}

/// Score fields of a finished test as printed on the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportResults {
    pub ffa: f64,
    pub tpc: f64,
    pub pv: f64,
    pub score: u8,
    pub classification: ComplianceStatus,
    pub confidence: f64,
}

impl Default for ReportResults {
    fn default() -> Self {
        Self {
            ffa: 0.0,
            tpc: 0.0,
            pv: 0.0,
            score: 100,
            classification: ComplianceStatus::Pass,
            confidence: 0.0,
        }
    }
}

impl From<&ScoreResult> for ReportResults {
    fn from(result: &ScoreResult) -> Self {
        Self {
            ffa: result.ffa,
            tpc: result.tpc,
            pv: result.pv,
            score: result.score,
            classification: result.classification,
            confidence: result.confidence,
        }
    }
}

/// A composed report ready to be written out.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub bytes: Vec<u8>,
    pub certificate_id: String,
    pub generated_at: DateTime<Utc>,
    pub batch_id: String,
}

impl ReportDocument {
    pub fn file_name(&self) -> String {
        report_file_name(&self.batch_id, self.generated_at.date_naive())
    }

    pub fn write_to(&self, path: &Path) -> crate::errors::Result<()> {
        crate::io::write_bytes(path, &self.bytes)?;
        log::info!(
            "Wrote report {} ({} bytes) to {}",
            self.certificate_id,
            self.bytes.len(),
            path.display()
        );
        Ok(())
    }
}

/// `FoodOilIQ_Report_<batchId>_<YYYY-MM-DD>.pdf`, with the batch id reduced
/// to a single safe path component.
pub fn report_file_name(batch_id: &str, date: NaiveDate) -> String {
    format!(
        "FoodOilIQ_Report_{}_{}.pdf",
        file_name_component(batch_id),
        date.format("%Y-%m-%d")
    )
}

/// Maps anything outside `[A-Za-z0-9_.-]` to `_` and breaks up `..` runs.
fn file_name_component(raw: &str) -> String {
    let mut component: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    while component.contains("..") {
        component = component.replace("..", "_");
    }
    component
}
