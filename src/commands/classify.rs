use crate::io::output::{ClassificationOutput, OutputWriter};
use crate::scoring::classify;
use anyhow::Result;

pub fn classify_value(value: f64, limit: f64, writer: &mut dyn OutputWriter) -> Result<()> {
    let status = classify(value, limit)?;
    writer.write_classification(&ClassificationOutput {
        value,
        limit,
        ratio: value / limit,
        status,
    })
}
