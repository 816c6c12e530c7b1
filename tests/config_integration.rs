//! Configuration flowing into assessments, sessions and reports.

use chrono::{TimeZone, Utc};
use foodoiliq::config::{parse_and_validate_config, RegulatoryStandard};
use foodoiliq::core::{ComplianceStatus, RegulatoryLimits};
use foodoiliq::prediction::LocalSimulator;
use foodoiliq::report::compose;
use foodoiliq::scoring::assess;
use foodoiliq::session::TestSession;
use foodoiliq::store::{InMemoryAlertRepository, InMemoryBatchRepository};
use indoc::indoc;
use pretty_assertions::assert_eq;

const KITCHEN_CONFIG: &str = indoc! {r#"
    [limits]
    standard = "eu"
    ffa = 0.4

    [report]
    company_name = "Golden Fry Foods"
    company_address = "12 Harbour Road"
    operator_name = "Shift Lead"

    [recommendations]
    ffa = 0.1
    tpc = 15.0
    pv = 5.0
"#};

#[test]
fn test_limits_and_thresholds_shape_assessment() {
    let config = parse_and_validate_config(KITCHEN_CONFIG).unwrap();
    let limits = config.limits().unwrap();
    let eu = RegulatoryStandard::Eu.limits();
    assert_eq!(limits, RegulatoryLimits::new(0.4, eu.tpc, eu.pv));

    let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    let assessment = assess(0.12, 16.0, 6.0, &limits, 95.0, &config.recommendations, at).unwrap();

    assert_eq!(assessment.limits, limits);
    assert_eq!(assessment.recommendations.len(), 3);

    let lenient = assess(0.12, 16.0, 6.0, &limits, 95.0, &Default::default(), at).unwrap();
    assert_eq!(lenient.recommendations.len(), 1);
    assert_eq!(assessment.result.score, lenient.result.score);
}

#[test]
fn test_report_carries_configured_company_and_operator() {
    let config = parse_and_validate_config(KITCHEN_CONFIG).unwrap();
    let batches = InMemoryBatchRepository::with_sample_data();
    let alerts = InMemoryAlertRepository::new();
    let predictor = LocalSimulator::with_seed(5, config.limits().unwrap())
        .with_thresholds(config.recommendations);

    let outcome = TestSession::new(&batches, &alerts, &predictor)
        .with_seed(5)
        .with_operator("op-7")
        .run("BATCH-2024-0115-A")
        .unwrap();
    let data = outcome.report_data(&config).unwrap();
    assert_eq!(data.limits, config.limits().unwrap());

    let doc = compose(&data, Utc::now()).unwrap();
    let content = String::from_utf8_lossy(&doc.bytes);
    assert!(content.contains("(Golden Fry Foods) Tj"));
    assert!(content.contains("(12 Harbour Road) Tj"));
    assert!(content.contains("(Shift Lead) Tj"));
}

#[test]
fn test_overall_band_ignores_configured_standard() {
    let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    let thresholds = Default::default();
    for standard in RegulatoryStandard::ALL {
        let limits = standard.limits();
        let clean = assess(0.0, 0.0, 0.0, &limits, 90.0, &thresholds, at).unwrap();
        assert_eq!(clean.result.score, 100);
        assert_eq!(clean.result.classification, ComplianceStatus::Pass);
    }
}
