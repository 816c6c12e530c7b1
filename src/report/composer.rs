//! Page layout for the oil quality test report.
//!
//! Sections are drawn top to bottom in a fixed order: header band, status
//! badge, test information, results, confidence, compliance certificate,
//! disclaimer and footer. Positions are in millimetres on an A4 page.

use super::fonts::{line_height, wrap_text, Font, MM_PER_PT};
use super::pdf::{Align, Canvas, Color, DocumentInfo, PageSize, PdfWriter, TextStyle};
use super::{ReportData, ReportDocument, ReportResults};
use crate::core::{validate_limit, ComplianceStatus, Parameter, ParameterReading, RegulatoryLimits};
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};

pub const PRODUCT_NAME: &str = "FoodOil IQ";
pub const TAGLINE: &str = "Smart Oil Quality Testing";
pub const FOOTER_TEXT: &str = "FoodOil IQ - Smart Oil Quality Testing Platform";

pub const DISCLAIMER: &str = "Disclaimer: This is an AI-assisted screening tool. For borderline or \
rejected samples, laboratory confirmation is recommended. Results should be interpreted by \
qualified food safety personnel.";

const PASS_CERTIFICATE: &str = "This oil sample has been tested and meets the quality standards \
as per FSSAI/Codex Alimentarius guidelines. The oil is suitable for continued use in food \
preparation.";
const BORDERLINE_CERTIFICATE: &str = "This oil sample shows parameters approaching regulatory \
limits. Increased monitoring frequency is recommended. Consider replacement if values continue \
to rise.";
const REJECT_CERTIFICATE: &str = "This oil sample has FAILED to meet regulatory standards and is \
NOT recommended for food preparation. Immediate replacement is required.";

pub const PRIMARY: Color = Color(30, 64, 102);
pub const SUCCESS: Color = Color(34, 139, 72);
pub const WARNING: Color = Color(245, 158, 11);
pub const DANGER: Color = Color(220, 38, 38);
const CERTIFICATE_BACKGROUND: Color = Color(245, 247, 250);
const STRIPE: Color = Color(245, 245, 245);
const MUTED: Color = Color(100, 100, 100);
const BODY_TEXT: Color = Color(60, 60, 60);
const FAINT: Color = Color(120, 120, 120);
const RULE: Color = Color(200, 200, 200);
const FOOTER: Color = Color(150, 150, 150);

const MARGIN: f64 = 20.0;
const ROW_HEIGHT: f64 = 6.5;

/// Badge, score circle and certificate color for a classification.
pub fn status_color(status: ComplianceStatus) -> Color {
    match status {
        ComplianceStatus::Pass => SUCCESS,
        ComplianceStatus::Borderline => WARNING,
        ComplianceStatus::Reject => DANGER,
    }
}

pub fn certificate_text(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Pass => PASS_CERTIFICATE,
        ComplianceStatus::Borderline => BORDERLINE_CERTIFICATE,
        ComplianceStatus::Reject => REJECT_CERTIFICATE,
    }
}

/// Upper-case base 36 rendering of `n`.
pub fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// `CERT-<batchId>-<BASE36 millisecond timestamp>`
pub fn certificate_id(batch_id: &str, generated_at: DateTime<Utc>) -> String {
    let millis = u64::try_from(generated_at.timestamp_millis()).unwrap_or(0);
    format!("CERT-{}-{}", batch_id, to_base36(millis))
}

/// Report fields after validation; every required field is present.
struct ValidatedReport<'a> {
    batch_id: &'a str,
    test_date: DateTime<Utc>,
    station_name: &'a str,
    location: &'a str,
    equipment: &'a str,
    oil_type: &'a str,
    operator_name: &'a str,
    company_name: Option<&'a str>,
    company_address: Option<&'a str>,
    results: ReportResults,
    limits: RegulatoryLimits,
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(Error::MissingField { field })
}

fn optional(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn validate(data: &ReportData) -> Result<ValidatedReport<'_>> {
    let batch_id = required(&data.batch_id, "batch_id")?;
    let test_date = data.test_date.ok_or(Error::MissingField { field: "test_date" })?;
    let station_name = required(&data.station_name, "station_name")?;
    let location = required(&data.location, "location")?;
    let equipment = required(&data.equipment, "equipment")?;
    let oil_type = required(&data.oil_type, "oil_type")?;

    for parameter in Parameter::ALL {
        validate_limit(data.limits.get(parameter))?;
    }
    let mut results = data.results;
    for (parameter, value) in [
        (Parameter::Ffa, results.ffa),
        (Parameter::Tpc, results.tpc),
        (Parameter::Pv, results.pv),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidReading { parameter, value });
        }
    }
    results.score = results.score.min(100);
    results.confidence = if results.confidence.is_nan() {
        0.0
    } else {
        results.confidence.clamp(0.0, 100.0)
    };

    Ok(ValidatedReport {
        batch_id,
        test_date,
        station_name,
        location,
        equipment,
        oil_type,
        operator_name: optional(&data.operator_name).unwrap_or("N/A"),
        company_name: optional(&data.company_name),
        company_address: optional(&data.company_address),
        results,
        limits: data.limits,
    })
}

/// Compose the single-page compliance report.
///
/// Fails with `MissingField` when batch id, test date, station, location,
/// equipment or oil type is absent or blank. Only the operator name falls
/// back to `"N/A"`. Output is byte-identical for identical inputs.
pub fn compose(data: &ReportData, generated_at: DateTime<Utc>) -> Result<ReportDocument> {
    let report = validate(data)?;
    let certificate_id = certificate_id(report.batch_id, generated_at);
    log::debug!(
        "composing report for {} ({}, score {})",
        report.batch_id,
        report.results.classification,
        report.results.score
    );

    let mut page = ReportPage::new(&report);
    page.header(generated_at);
    page.status_badge();
    let y = page.test_information();
    let y = page.results(y);
    let y = page.confidence(y);
    let y = page.certificate(y, &certificate_id);
    page.disclaimer(y);
    page.footer(1, 1);

    let mut writer = PdfWriter::new(PageSize::A4);
    writer.add_page(page.canvas);
    let bytes = writer.finish(&DocumentInfo {
        title: format!("Oil Quality Test Report - {}", report.batch_id),
        producer: PRODUCT_NAME.to_string(),
        created: generated_at,
    });

    Ok(ReportDocument {
        bytes,
        certificate_id,
        generated_at,
        batch_id: report.batch_id.to_string(),
    })
}

struct ReportPage<'a> {
    report: &'a ValidatedReport<'a>,
    canvas: Canvas,
    width: f64,
    badge: Color,
}

impl<'a> ReportPage<'a> {
    fn new(report: &'a ValidatedReport<'a>) -> Self {
        Self {
            report,
            canvas: Canvas::new(PageSize::A4),
            width: PageSize::A4.width,
            badge: status_color(report.results.classification),
        }
    }

    fn header(&mut self, generated_at: DateTime<Utc>) {
        let right = self.width - MARGIN;
        self.canvas.fill_rect(0.0, 0.0, self.width, 40.0, PRIMARY);
        self.canvas.text(
            MARGIN,
            20.0,
            PRODUCT_NAME,
            TextStyle::new(Font::HelveticaBold, 24.0, Color::WHITE),
        );
        self.canvas.text(
            MARGIN,
            28.0,
            TAGLINE,
            TextStyle::new(Font::Helvetica, 10.0, Color::WHITE),
        );
        self.canvas.text(
            right,
            20.0,
            "OIL QUALITY TEST REPORT",
            TextStyle::new(Font::Helvetica, 12.0, Color::WHITE).aligned(Align::Right),
        );
        self.canvas.text(
            right,
            28.0,
            &format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
            TextStyle::new(Font::Helvetica, 9.0, Color::WHITE).aligned(Align::Right),
        );

        if let Some(company) = self.report.company_name {
            let style = TextStyle::new(Font::Helvetica, 10.0, MUTED);
            self.canvas.text(MARGIN, 50.0, company, style);
            if let Some(address) = self.report.company_address {
                self.canvas.text(MARGIN, 55.0, address, style);
            }
        }
    }

    fn status_badge(&mut self) {
        let classification = self.report.results.classification;
        let (x, y, w, h) = (self.width - 60.0, 47.0, 50.0, 16.0);
        self.canvas.fill_rounded_rect(x, y, w, h, 3.0, self.badge);
        self.canvas.text(
            x + w / 2.0,
            y + 9.0,
            classification.badge_label(),
            TextStyle::new(Font::HelveticaBold, 12.0, Color::WHITE).aligned(Align::Center),
        );
    }

    fn section_heading(&mut self, y: f64, title: &str) {
        self.canvas.text(
            MARGIN,
            y,
            title,
            TextStyle::new(Font::HelveticaBold, 14.0, Color::BLACK),
        );
        self.canvas.line(MARGIN, y + 3.0, 100.0, y + 3.0, 0.5, PRIMARY);
    }

    /// One table row; each cell is `(text, style)`. Returns the row bottom.
    fn row(&mut self, top: f64, widths: &[f64], cells: &[(&str, TextStyle)], fill: Option<Color>) -> f64 {
        if let Some(color) = fill {
            self.canvas
                .fill_rect(MARGIN, top, widths.iter().sum(), ROW_HEIGHT, color);
        }
        let mut x = MARGIN;
        for (width, (text, style)) in widths.iter().zip(cells) {
            let cap_height = 0.7 * style.size * MM_PER_PT;
            let baseline = top + (ROW_HEIGHT + cap_height) / 2.0;
            self.canvas.text(x + 2.0, baseline, text, *style);
            x += width;
        }
        top + ROW_HEIGHT
    }

    fn test_information(&mut self) -> f64 {
        self.section_heading(80.0, "Test Information");

        let report = self.report;
        let test_date = report.test_date.format("%Y-%m-%d %H:%M UTC").to_string();
        let rows = [
            ("Batch ID", report.batch_id),
            ("Test Date", test_date.as_str()),
            ("Station", report.station_name),
            ("Location", report.location),
            ("Equipment", report.equipment),
            ("Oil Type", report.oil_type),
            ("Operator", report.operator_name),
        ];

        let label = TextStyle::new(Font::HelveticaBold, 10.0, Color::BLACK);
        let value = TextStyle::new(Font::Helvetica, 10.0, Color::BLACK);
        let mut y = 88.0;
        for (name, text) in rows {
            y = self.row(y, &[40.0, 80.0], &[(name, label), (text, value)], None);
        }
        y
    }

    fn results(&mut self, top: f64) -> f64 {
        let y = top + 10.0;
        self.section_heading(y, "Test Results");

        let (cx, cy) = (self.width - 38.0, y + 25.0);
        self.canvas.fill_circle(cx, cy, 18.0, self.badge);
        self.canvas.text(
            cx,
            cy + 2.0,
            &self.report.results.score.to_string(),
            TextStyle::new(Font::HelveticaBold, 20.0, Color::WHITE).aligned(Align::Center),
        );
        self.canvas.text(
            cx,
            cy + 9.0,
            "SCORE",
            TextStyle::new(Font::HelveticaBold, 8.0, Color::WHITE).aligned(Align::Center),
        );

        let widths = [52.0, 24.0, 28.0, 26.0];
        let head = TextStyle::new(Font::HelveticaBold, 10.0, Color::WHITE);
        let mut row_top = self.row(
            y + 8.0,
            &widths,
            &[
                ("Parameter", head),
                ("Value", head),
                ("Limit", head),
                ("Status", head),
            ],
            Some(PRIMARY),
        );

        let results = self.report.results;
        let limits = self.report.limits;
        let body = TextStyle::new(Font::Helvetica, 10.0, Color::BLACK);
        for (i, parameter) in Parameter::ALL.into_iter().enumerate() {
            let value = match parameter {
                Parameter::Ffa => results.ffa,
                Parameter::Tpc => results.tpc,
                Parameter::Pv => results.pv,
            };
            let reading = ParameterReading::new(parameter, value, limits.get(parameter));
            let (status, status_color) = if reading.within_limit() {
                ("Within Limits", SUCCESS)
            } else {
                ("Exceeded", DANGER)
            };
            let name = format!("{} ({})", parameter.display_name(), parameter.short_name());
            let value = parameter.format_value(reading.value);
            let limit = format!("<= {} {}", reading.limit, parameter.unit());
            let fill = (i % 2 == 1).then_some(STRIPE);
            row_top = self.row(
                row_top,
                &widths,
                &[
                    (name.as_str(), body),
                    (value.as_str(), body),
                    (limit.as_str(), body),
                    (status, TextStyle::new(Font::HelveticaBold, 10.0, status_color)),
                ],
                fill,
            );
        }
        row_top
    }

    fn confidence(&mut self, table_bottom: f64) -> f64 {
        let y = table_bottom + 8.0;
        self.canvas.text(
            MARGIN,
            y,
            &format!("AI Confidence: {:.1}%", self.report.results.confidence),
            TextStyle::new(Font::Helvetica, 10.0, MUTED),
        );
        y
    }

    fn certificate(&mut self, confidence_y: f64, certificate_id: &str) -> f64 {
        let y = confidence_y + 12.0;
        let center = self.width / 2.0;
        self.canvas
            .fill_rounded_rect(15.0, y - 5.0, self.width - 30.0, 45.0, 3.0, CERTIFICATE_BACKGROUND);
        self.canvas.text(
            center,
            y + 5.0,
            "COMPLIANCE CERTIFICATE",
            TextStyle::new(Font::HelveticaBold, 12.0, PRIMARY).aligned(Align::Center),
        );

        let style = TextStyle::new(Font::Helvetica, 9.0, BODY_TEXT).aligned(Align::Center);
        let text = certificate_text(self.report.results.classification);
        let lines = wrap_text(text, style.font, style.size, self.width - 50.0);
        self.canvas
            .text_lines(center, y + 13.0, &lines, line_height(style.size), style);

        self.canvas.text(
            center,
            y + 35.0,
            &format!("Certificate ID: {certificate_id}"),
            TextStyle::new(Font::Helvetica, 8.0, BODY_TEXT).aligned(Align::Center),
        );
        y
    }

    fn disclaimer(&mut self, certificate_y: f64) {
        let style = TextStyle::new(Font::HelveticaOblique, 8.0, FAINT);
        let lines = wrap_text(DISCLAIMER, style.font, style.size, self.width - 2.0 * MARGIN);
        self.canvas.text_lines(
            MARGIN,
            certificate_y + 52.0,
            &lines,
            line_height(style.size),
            style,
        );
    }

    fn footer(&mut self, page: usize, pages: usize) {
        let y = PageSize::A4.height - 15.0;
        let right = self.width - MARGIN;
        self.canvas.line(MARGIN, y - 5.0, right, y - 5.0, 0.3, RULE);
        let style = TextStyle::new(Font::Helvetica, 8.0, FOOTER);
        self.canvas.text(MARGIN, y, FOOTER_TEXT, style);
        self.canvas.text(
            right,
            y,
            &format!("Page {page} of {pages}"),
            style.aligned(Align::Right),
        );
    }
}
