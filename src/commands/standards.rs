use crate::config::RegulatoryStandard;
use crate::io::output::OutputWriter;
use anyhow::Result;

pub fn list_standards(writer: &mut dyn OutputWriter) -> Result<()> {
    writer.write_standards(&RegulatoryStandard::ALL)
}
