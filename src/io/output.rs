use crate::config::RegulatoryStandard;
use crate::core::{ComplianceStatus, Parameter, RegulatoryLimits};
use crate::formatting::{ColoredFormatter, FormattingConfig, OutputFormatter};
use crate::scoring::Assessment;
use crate::session::TestOutcome;
use crate::store::{Batch, BatchStatistics};
use comfy_table::{presets, ContentArrangement, Table};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

/// A single value judged against a limit.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationOutput {
    pub value: f64,
    pub limit: f64,
    pub ratio: f64,
    pub status: ComplianceStatus,
}

/// Where a composed report was written.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub certificate_id: String,
    pub batch_id: String,
    pub path: PathBuf,
    pub bytes: usize,
}

pub trait OutputWriter {
    fn write_classification(&mut self, output: &ClassificationOutput) -> anyhow::Result<()>;

    fn write_assessment(
        &mut self,
        assessment: &Assessment,
        standard: Option<RegulatoryStandard>,
    ) -> anyhow::Result<()>;

    fn write_standards(&mut self, standards: &[RegulatoryStandard]) -> anyhow::Result<()>;

    fn write_batches(
        &mut self,
        batches: &[Batch],
        statistics: &BatchStatistics,
    ) -> anyhow::Result<()>;

    fn write_report(&mut self, summary: &ReportSummary) -> anyhow::Result<()>;

    fn write_test_outcome(
        &mut self,
        outcome: &TestOutcome,
        report: Option<&ReportSummary>,
    ) -> anyhow::Result<()>;
}

/// Writer for the requested format on stdout.
pub fn create_writer(format: OutputFormat, formatting: FormattingConfig) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(std::io::stdout(), formatting)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn emit<T: Serialize + ?Sized>(&mut self, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }
}

#[derive(Serialize)]
struct StandardEntry {
    standard: RegulatoryStandard,
    label: &'static str,
    limits: RegulatoryLimits,
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_classification(&mut self, output: &ClassificationOutput) -> anyhow::Result<()> {
        self.emit(output)
    }

    fn write_assessment(
        &mut self,
        assessment: &Assessment,
        standard: Option<RegulatoryStandard>,
    ) -> anyhow::Result<()> {
        #[derive(Serialize)]
        struct Payload<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            standard: Option<RegulatoryStandard>,
            #[serde(flatten)]
            assessment: &'a Assessment,
        }
        self.emit(&Payload {
            standard,
            assessment,
        })
    }

    fn write_standards(&mut self, standards: &[RegulatoryStandard]) -> anyhow::Result<()> {
        let entries: Vec<StandardEntry> = standards
            .iter()
            .map(|&standard| StandardEntry {
                standard,
                label: standard.label(),
                limits: standard.limits(),
            })
            .collect();
        self.emit(&entries)
    }

    fn write_batches(
        &mut self,
        batches: &[Batch],
        statistics: &BatchStatistics,
    ) -> anyhow::Result<()> {
        #[derive(Serialize)]
        struct Payload<'a> {
            statistics: &'a BatchStatistics,
            batches: &'a [Batch],
        }
        self.emit(&Payload {
            statistics,
            batches,
        })
    }

    fn write_report(&mut self, summary: &ReportSummary) -> anyhow::Result<()> {
        self.emit(summary)
    }

    fn write_test_outcome(
        &mut self,
        outcome: &TestOutcome,
        report: Option<&ReportSummary>,
    ) -> anyhow::Result<()> {
        #[derive(Serialize)]
        struct Payload<'a> {
            #[serde(flatten)]
            outcome: &'a TestOutcome,
            #[serde(skip_serializing_if = "Option::is_none")]
            report: Option<&'a ReportSummary>,
        }
        self.emit(&Payload { outcome, report })
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    formatter: ColoredFormatter,
    ascii_only: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig) -> Self {
        Self {
            writer,
            formatter: ColoredFormatter::new(formatting),
            ascii_only: formatting.ascii_only,
        }
    }

    fn table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(if self.ascii_only {
                presets::ASCII_FULL
            } else {
                presets::UTF8_FULL
            })
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    fn write_status_line(
        &mut self,
        score: u8,
        status: ComplianceStatus,
        confidence: f64,
    ) -> anyhow::Result<()> {
        let f = &self.formatter;
        writeln!(
            self.writer,
            "{} {}  Oil Health Score: {}/100  {}",
            f.status_marker(status),
            f.status(status, status.badge_label()),
            f.status(status, &score.to_string()),
            f.dim(&format!("(confidence {:.1}%)", confidence))
        )?;
        Ok(())
    }

    fn write_recommendations(&mut self, recommendations: &[String]) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.formatter.header("Recommendations"))?;
        for recommendation in recommendations {
            writeln!(self.writer, "  - {}", recommendation)?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_classification(&mut self, output: &ClassificationOutput) -> anyhow::Result<()> {
        let f = &self.formatter;
        writeln!(
            self.writer,
            "{} {} ({} of limit {})",
            f.status_marker(output.status),
            f.status(output.status, output.status.badge_label()),
            format_percent(output.ratio),
            output.limit
        )?;
        Ok(())
    }

    fn write_assessment(
        &mut self,
        assessment: &Assessment,
        standard: Option<RegulatoryStandard>,
    ) -> anyhow::Result<()> {
        if let Some(standard) = standard {
            writeln!(
                self.writer,
                "{}",
                self.formatter
                    .header(&format!("Assessed against {}", standard.label()))
            )?;
        }

        let result = &assessment.result;
        self.write_status_line(result.score, result.classification, result.confidence)?;

        let mut table = self.table();
        table.set_header(vec!["Parameter", "Value", "Limit", "% of limit", "Status"]);
        for p in &assessment.parameters {
            let parameter = p.reading.parameter;
            table.add_row(vec![
                parameter.display_name().to_string(),
                parameter.format_value(p.reading.value),
                parameter.format_value(p.reading.limit),
                format_percent(p.reading.value / p.reading.limit),
                p.status.badge_label().to_string(),
            ]);
        }
        writeln!(self.writer, "{}", table)?;

        self.write_recommendations(&assessment.recommendations)
    }

    fn write_standards(&mut self, standards: &[RegulatoryStandard]) -> anyhow::Result<()> {
        let mut table = self.table();
        let mut header = vec!["Standard".to_string(), "Name".to_string()];
        header.extend(
            Parameter::ALL
                .iter()
                .map(|p| format!("{} ({})", p.short_name(), p.unit())),
        );
        table.set_header(header);

        for standard in standards {
            let limits = standard.limits();
            let mut row = vec![standard.as_str().to_string(), standard.label().to_string()];
            row.extend(Parameter::ALL.iter().map(|&p| limits.get(p).to_string()));
            table.add_row(row);
        }
        writeln!(self.writer, "{}", table)?;
        Ok(())
    }

    fn write_batches(
        &mut self,
        batches: &[Batch],
        statistics: &BatchStatistics,
    ) -> anyhow::Result<()> {
        let mut table = self.table();
        table.set_header(vec![
            "Batch", "Station", "Oil", "Tests", "Score", "Status", "Last tested",
        ]);
        for batch in batches {
            table.add_row(vec![
                batch.id.clone(),
                batch.station_name.clone(),
                batch.oil_type.clone(),
                batch.tests_count.to_string(),
                batch
                    .current_score
                    .map_or_else(|| "-".to_string(), |s| s.to_string()),
                batch
                    .current_status
                    .map_or("untested", |s| s.badge_label())
                    .to_string(),
                batch.last_tested_at.map_or_else(
                    || "never".to_string(),
                    |t| t.format("%Y-%m-%d %H:%M").to_string(),
                ),
            ]);
        }
        writeln!(self.writer, "{}", table)?;

        let f = &self.formatter;
        let rate = format!("{}%", statistics.pass_rate);
        let rate = if statistics.pass_rate >= 75 {
            f.success(&rate)
        } else {
            f.warning(&rate)
        };
        writeln!(
            self.writer,
            "{} batches ({} tested), pass rate {}, {} needing attention",
            statistics.total_batches, statistics.active_batches, rate, statistics.alert_count
        )?;
        Ok(())
    }

    fn write_report(&mut self, summary: &ReportSummary) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} Report {} for batch {} written to {} ({} bytes)",
            self.formatter.success(&self.formatter.marker("✓", "[OK]")),
            summary.certificate_id,
            summary.batch_id,
            summary.path.display(),
            summary.bytes
        )?;
        Ok(())
    }

    fn write_test_outcome(
        &mut self,
        outcome: &TestOutcome,
        report: Option<&ReportSummary>,
    ) -> anyhow::Result<()> {
        let result = &outcome.prediction.result;
        writeln!(
            self.writer,
            "{}",
            self.formatter.header(&format!(
                "Batch {} ({}, {})",
                outcome.batch.id, outcome.batch.station_name, outcome.batch.oil_type
            ))
        )?;
        self.write_status_line(result.score, result.classification, result.confidence)?;
        for parameter in Parameter::ALL {
            writeln!(
                self.writer,
                "  {:<4} {}",
                parameter.short_name(),
                parameter.format_value(result.value(parameter))
            )?;
        }
        writeln!(
            self.writer,
            "{}",
            self.formatter.dim(&format!(
                "Test {} with model {}",
                outcome.record.id, outcome.prediction.model_version
            ))
        )?;

        if let Some(alert) = &outcome.alert {
            writeln!(
                self.writer,
                "{} {}: {}",
                self.formatter.marker("🚨", "[ALERT]"),
                self.formatter.severity(alert.severity, &alert.title),
                alert.message
            )?;
        }

        self.write_recommendations(&outcome.prediction.recommendations)?;

        if let Some(summary) = report {
            writeln!(self.writer)?;
            self.write_report(summary)?;
        }
        Ok(())
    }
}

fn format_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{assess, RecommendationThresholds};
    use chrono::Utc;

    fn sample_assessment() -> Assessment {
        assess(
            0.18,
            18.5,
            8.2,
            &RegulatoryLimits::default(),
            92.0,
            &RecommendationThresholds::default(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_json_assessment_includes_standard() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_assessment(&sample_assessment(), Some(RegulatoryStandard::Eu))
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["standard"], "eu");
        assert_eq!(value["result"]["score"], 28);
        assert_eq!(value["result"]["classification"], "reject");
        assert_eq!(value["parameters"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_terminal_assessment_plain() {
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer, FormattingConfig::plain())
            .write_assessment(&sample_assessment(), None)
            .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("[FAIL] REJECTED"));
        assert!(text.contains("Oil Health Score: 28/100"));
        assert!(text.contains("Total Polar Compounds"));
        assert!(text.contains("Peroxide value high - check storage conditions"));
    }

    #[test]
    fn test_terminal_standards_table() {
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer, FormattingConfig::plain())
            .write_standards(&RegulatoryStandard::ALL)
            .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("China (GB 2716-2018)"));
        assert!(text.contains("meq/kg"));
    }
}
