use crate::core::ComplianceStatus;
use crate::io::output::OutputWriter;
use crate::store::{BatchFilter, BatchRepository};
use anyhow::Result;

pub fn list_batches(
    repository: &dyn BatchRepository,
    station: Option<String>,
    status: Option<ComplianceStatus>,
    writer: &mut dyn OutputWriter,
) -> Result<()> {
    let filter = BatchFilter {
        station_id: station,
        status,
    };
    let batches = repository.batches(&filter);
    writer.write_batches(&batches, &repository.statistics())
}
