use crate::config::FoodOilConfig;
use crate::io::output::{OutputWriter, ReportSummary};
use crate::io::{dir_exists, read_file};
use crate::report::{compose, ReportData, ReportDocument};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

pub fn generate_report(
    input: &Path,
    output: Option<&Path>,
    config: &FoodOilConfig,
    writer: &mut dyn OutputWriter,
) -> Result<()> {
    let contents = read_file(input)
        .with_context(|| format!("Failed to read report data from {}", input.display()))?;
    let mut data: ReportData = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid report data in {}", input.display()))?;
    apply_report_defaults(&mut data, config);

    let document = compose(&data, Utc::now())?;
    let summary = write_document(&document, output)?;
    writer.write_report(&summary)
}

/// Fills company and operator fields the snapshot leaves out.
pub fn apply_report_defaults(data: &mut ReportData, config: &FoodOilConfig) {
    let defaults = &config.report;
    if data.company_name.is_none() {
        data.company_name = defaults.company_name.clone();
    }
    if data.company_address.is_none() {
        data.company_address = defaults.company_address.clone();
    }
    if data.operator_name.is_none() {
        data.operator_name = defaults.operator_name.clone();
    }
}

pub fn write_document(document: &ReportDocument, output: Option<&Path>) -> Result<ReportSummary> {
    let path = report_path(output, &document.file_name());
    document
        .write_to(&path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(ReportSummary {
        certificate_id: document.certificate_id.clone(),
        batch_id: document.batch_id.clone(),
        path,
        bytes: document.bytes.len(),
    })
}

/// An existing directory, or a path without a `.pdf` extension, receives the
/// generated file name; anything else is used as the file path itself.
pub fn report_path(output: Option<&Path>, file_name: &str) -> PathBuf {
    match output {
        None => PathBuf::from(file_name),
        Some(path) if dir_exists(path) || !has_pdf_extension(path) => path.join(file_name),
        Some(path) => path.to_path_buf(),
    }
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_report_path() {
        let name = "FoodOilIQ_Report_B_2024-01-15.pdf";
        assert_eq!(report_path(None, name), PathBuf::from(name));
        assert_eq!(
            report_path(Some(Path::new("out/reports")), name),
            PathBuf::from("out/reports").join(name)
        );
        assert_eq!(
            report_path(Some(Path::new("out/custom.PDF")), name),
            PathBuf::from("out/custom.PDF")
        );

        let dir = TempDir::new().unwrap();
        let odd = dir.path().join("looks.pdf");
        std::fs::create_dir(&odd).unwrap();
        assert_eq!(report_path(Some(&odd), name), odd.join(name));
    }

    #[test]
    fn test_apply_report_defaults_keeps_snapshot_values() {
        let mut config = FoodOilConfig::default();
        config.report.company_name = Some("Config Foods".into());
        config.report.operator_name = Some("Config Operator".into());

        let mut data = ReportData {
            operator_name: Some("Snapshot Operator".into()),
            ..Default::default()
        };
        apply_report_defaults(&mut data, &config);

        assert_eq!(data.company_name.as_deref(), Some("Config Foods"));
        assert_eq!(data.operator_name.as_deref(), Some("Snapshot Operator"));
        assert!(data.company_address.is_none());
    }

    #[test]
    fn test_batch_id_cannot_escape_output_dir() {
        use crate::core::{ComplianceStatus, RegulatoryLimits};
        use crate::report::ReportResults;

        let root = TempDir::new().unwrap();
        let out = root.path().join("out");
        let data = ReportData {
            batch_id: Some("x/../../escaped".into()),
            test_date: Some(Utc::now()),
            station_name: Some("Fryer A1".into()),
            location: Some("Kitchen Zone A".into()),
            equipment: Some("Industrial Fryer 50L".into()),
            oil_type: Some("Palm Olein".into()),
            results: ReportResults {
                ffa: 0.1,
                tpc: 10.0,
                pv: 3.0,
                score: 80,
                classification: ComplianceStatus::Pass,
                confidence: 90.0,
            },
            limits: RegulatoryLimits::default(),
            ..Default::default()
        };

        let document = compose(&data, Utc::now()).unwrap();
        let summary = write_document(&document, Some(&out)).unwrap();

        assert_eq!(summary.path.parent(), Some(out.as_path()));
        assert!(summary.path.exists());
        let entries: Vec<_> = std::fs::read_dir(root.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("out")]);
    }
}
