use super::ids::{letter_suffix, timestamp_id, unique_id};
use crate::core::{ComplianceStatus, ScoreResult};
use crate::errors::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    Active,
    Maintenance,
    Inactive,
}

/// A fryer that batches of oil are used in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FryingStation {
    pub id: String,
    pub name: String,
    pub location: String,
    pub equipment: String,
    pub capacity: String,
    pub status: StationStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewStation {
    pub name: String,
    pub location: String,
    pub equipment: String,
    pub capacity: String,
    pub status: StationStatus,
}

/// Partial station update; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StationUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub equipment: Option<String>,
    pub capacity: Option<String>,
    pub status: Option<StationStatus>,
}

/// One fill of oil in a station, tracked across tests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: String,
    pub station_id: String,
    pub station_name: String,
    pub location: String,
    pub equipment: String,
    pub oil_type: String,
    pub created_at: DateTime<Utc>,
    pub last_tested_at: Option<DateTime<Utc>>,
    pub tests_count: u32,
    pub current_score: Option<u8>,
    pub current_status: Option<ComplianceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: String,
    pub batch_id: String,
    pub timestamp: DateTime<Utc>,
    pub ffa: f64,
    pub tpc: f64,
    pub pv: f64,
    pub score: u8,
    pub classification: ComplianceStatus,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewTestRecord {
    pub batch_id: String,
    pub result: ScoreResult,
    pub operator_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchFilter {
    pub station_id: Option<String>,
    pub status: Option<ComplianceStatus>,
}

impl BatchFilter {
    fn matches(&self, batch: &Batch) -> bool {
        self.station_id
            .as_deref()
            .is_none_or(|id| batch.station_id == id)
            && self
                .status
                .is_none_or(|status| batch.current_status == Some(status))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatistics {
    pub total_batches: usize,
    /// Batches that have been tested at least once.
    pub active_batches: usize,
    /// Share of active batches currently passing, in whole percent.
    pub pass_rate: u8,
    /// Batches currently borderline or rejected.
    pub alert_count: usize,
}

pub trait BatchRepository: Send + Sync {
    fn stations(&self) -> Vec<FryingStation>;

    fn station(&self, id: &str) -> Option<FryingStation>;

    fn add_station(&self, station: NewStation) -> FryingStation;

    fn update_station(&self, id: &str, update: StationUpdate) -> Option<FryingStation>;

    /// Matching batches, newest first.
    fn batches(&self, filter: &BatchFilter) -> Vec<Batch>;

    fn batch(&self, id: &str) -> Option<Batch>;

    fn create_batch(&self, station_id: &str, oil_type: &str, notes: Option<String>)
        -> Result<Batch>;

    fn update_batch_from_test(
        &self,
        batch_id: &str,
        score: u8,
        status: ComplianceStatus,
    ) -> Result<Batch>;

    fn add_test_record(&self, record: NewTestRecord) -> TestRecord;

    /// Test records, newest first, optionally for one batch.
    fn test_records(&self, batch_id: Option<&str>) -> Vec<TestRecord>;

    fn statistics(&self) -> BatchStatistics;
}

#[derive(Debug, Default)]
struct BatchState {
    stations: Vec<FryingStation>,
    batches: Vec<Batch>,
    records: Vec<TestRecord>,
}

#[derive(Debug, Default)]
pub struct InMemoryBatchRepository {
    state: RwLock<BatchState>,
}

impl InMemoryBatchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository preloaded with five stations and three batches.
    pub fn with_sample_data() -> Self {
        let stations = vec![
            sample_station("STATION-A1", "Fryer A1", "Kitchen Zone A", "Industrial Fryer 50L", "50L", StationStatus::Active),
            sample_station("STATION-A2", "Fryer A2", "Kitchen Zone A", "Industrial Fryer 50L", "50L", StationStatus::Active),
            sample_station("STATION-A3", "Fryer A3", "Kitchen Zone A", "Industrial Fryer 30L", "30L", StationStatus::Active),
            sample_station("STATION-B1", "Fryer B1", "Kitchen Zone B", "Commercial Fryer 25L", "25L", StationStatus::Maintenance),
            sample_station("STATION-B2", "Fryer B2", "Kitchen Zone B", "Commercial Fryer 25L", "25L", StationStatus::Active),
        ];
        let batches = vec![
            sample_batch(&stations[0], "BATCH-2024-0115-A", "Refined Sunflower Oil", (15, 8, 0), (15, 14, 32), 3, 84, ComplianceStatus::Pass),
            sample_batch(&stations[1], "BATCH-2024-0115-B", "Palm Olein", (15, 7, 30), (15, 11, 15), 2, 91, ComplianceStatus::Pass),
            sample_batch(&stations[2], "BATCH-2024-0115-C", "Refined Sunflower Oil", (14, 8, 0), (15, 9, 45), 5, 62, ComplianceStatus::Borderline),
        ];

        Self {
            state: RwLock::new(BatchState {
                stations,
                batches,
                records: Vec::new(),
            }),
        }
    }

    /// Creates a batch dated `now`; the id letter counts batches already
    /// created on the same day.
    pub fn create_batch_at(
        &self,
        station_id: &str,
        oil_type: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Batch> {
        let mut state = self.state.write();
        let station = state
            .stations
            .iter()
            .find(|s| s.id == station_id)
            .cloned()
            .ok_or_else(|| Error::not_found("station", station_id))?;

        let date = now.format("%Y%m%d").to_string();
        let same_day = state.batches.iter().filter(|b| b.id.contains(&date)).count();
        let batch = Batch {
            id: format!("BATCH-{}-{}", date, letter_suffix(same_day)),
            station_id: station.id,
            station_name: station.name,
            location: station.location,
            equipment: station.equipment,
            oil_type: oil_type.to_string(),
            created_at: now,
            last_tested_at: None,
            tests_count: 0,
            current_score: None,
            current_status: None,
            notes,
        };
        log::debug!("Created batch {} at {}", batch.id, batch.station_id);
        state.batches.insert(0, batch.clone());
        Ok(batch)
    }
}

fn sample_station(
    id: &str,
    name: &str,
    location: &str,
    equipment: &str,
    capacity: &str,
    status: StationStatus,
) -> FryingStation {
    FryingStation {
        id: id.to_string(),
        name: name.to_string(),
        location: location.to_string(),
        equipment: equipment.to_string(),
        capacity: capacity.to_string(),
        status,
    }
}

/// Sample batches all date from January 2024; times are (day, hour, minute).
#[allow(clippy::too_many_arguments)]
fn sample_batch(
    station: &FryingStation,
    id: &str,
    oil_type: &str,
    created: (u32, u32, u32),
    tested: (u32, u32, u32),
    tests_count: u32,
    score: u8,
    status: ComplianceStatus,
) -> Batch {
    let at = |(day, hour, minute): (u32, u32, u32)| {
        Utc.with_ymd_and_hms(2024, 1, day, hour, minute, 0)
            .single()
            .unwrap_or_default()
    };
    Batch {
        id: id.to_string(),
        station_id: station.id.clone(),
        station_name: station.name.clone(),
        location: station.location.clone(),
        equipment: station.equipment.clone(),
        oil_type: oil_type.to_string(),
        created_at: at(created),
        last_tested_at: Some(at(tested)),
        tests_count,
        current_score: Some(score),
        current_status: Some(status),
        notes: None,
    }
}

impl BatchRepository for InMemoryBatchRepository {
    fn stations(&self) -> Vec<FryingStation> {
        self.state.read().stations.clone()
    }

    fn station(&self, id: &str) -> Option<FryingStation> {
        self.state.read().stations.iter().find(|s| s.id == id).cloned()
    }

    fn add_station(&self, station: NewStation) -> FryingStation {
        let station = FryingStation {
            id: timestamp_id("STATION", Utc::now()),
            name: station.name,
            location: station.location,
            equipment: station.equipment,
            capacity: station.capacity,
            status: station.status,
        };
        self.state.write().stations.push(station.clone());
        station
    }

    fn update_station(&self, id: &str, update: StationUpdate) -> Option<FryingStation> {
        let mut state = self.state.write();
        let station = state.stations.iter_mut().find(|s| s.id == id)?;
        if let Some(name) = update.name {
            station.name = name;
        }
        if let Some(location) = update.location {
            station.location = location;
        }
        if let Some(equipment) = update.equipment {
            station.equipment = equipment;
        }
        if let Some(capacity) = update.capacity {
            station.capacity = capacity;
        }
        if let Some(status) = update.status {
            station.status = status;
        }
        Some(station.clone())
    }

    fn batches(&self, filter: &BatchFilter) -> Vec<Batch> {
        let mut batches: Vec<Batch> = self
            .state
            .read()
            .batches
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        batches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        batches
    }

    fn batch(&self, id: &str) -> Option<Batch> {
        self.state.read().batches.iter().find(|b| b.id == id).cloned()
    }

    fn create_batch(
        &self,
        station_id: &str,
        oil_type: &str,
        notes: Option<String>,
    ) -> Result<Batch> {
        self.create_batch_at(station_id, oil_type, notes, Utc::now())
    }

    fn update_batch_from_test(
        &self,
        batch_id: &str,
        score: u8,
        status: ComplianceStatus,
    ) -> Result<Batch> {
        let mut state = self.state.write();
        let batch = state
            .batches
            .iter_mut()
            .find(|b| b.id == batch_id)
            .ok_or_else(|| Error::not_found("batch", batch_id))?;
        batch.last_tested_at = Some(Utc::now());
        batch.tests_count += 1;
        batch.current_score = Some(score);
        batch.current_status = Some(status);
        Ok(batch.clone())
    }

    fn add_test_record(&self, record: NewTestRecord) -> TestRecord {
        let result = record.result;
        let record = TestRecord {
            id: unique_id("TEST", Utc::now()),
            batch_id: record.batch_id,
            timestamp: result.timestamp,
            ffa: result.ffa,
            tpc: result.tpc,
            pv: result.pv,
            score: result.score,
            classification: result.classification,
            confidence: result.confidence,
            operator_id: record.operator_id,
        };
        self.state.write().records.insert(0, record.clone());
        record
    }

    fn test_records(&self, batch_id: Option<&str>) -> Vec<TestRecord> {
        self.state
            .read()
            .records
            .iter()
            .filter(|r| batch_id.is_none_or(|id| r.batch_id == id))
            .cloned()
            .collect()
    }

    fn statistics(&self) -> BatchStatistics {
        let state = self.state.read();
        let statuses: Vec<ComplianceStatus> = state
            .batches
            .iter()
            .filter_map(|b| b.current_status)
            .collect();
        let passing = statuses.iter().filter(|s| s.is_pass()).count();
        let pass_rate = if statuses.is_empty() {
            100
        } else {
            (passing as f64 / statuses.len() as f64 * 100.0).round() as u8
        };

        BatchStatistics {
            total_batches: state.batches.len(),
            active_batches: statuses.len(),
            pass_rate,
            alert_count: statuses.len() - passing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RegulatoryLimits;
    use crate::scoring::aggregate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sample_data() {
        let repo = InMemoryBatchRepository::with_sample_data();
        assert_eq!(repo.stations().len(), 5);
        assert_eq!(
            repo.station("STATION-B1").map(|s| s.status),
            Some(StationStatus::Maintenance)
        );

        let ids: Vec<String> = repo
            .batches(&BatchFilter::default())
            .into_iter()
            .map(|b| b.id)
            .collect();
        // newest first
        assert_eq!(
            ids,
            vec!["BATCH-2024-0115-A", "BATCH-2024-0115-B", "BATCH-2024-0115-C"]
        );
    }

    #[test]
    fn test_batch_filters() {
        let repo = InMemoryBatchRepository::with_sample_data();
        let borderline = repo.batches(&BatchFilter {
            status: Some(ComplianceStatus::Borderline),
            ..Default::default()
        });
        assert_eq!(borderline.len(), 1);
        assert_eq!(borderline[0].station_id, "STATION-A3");

        let at_a2 = repo.batches(&BatchFilter {
            station_id: Some("STATION-A2".into()),
            status: Some(ComplianceStatus::Pass),
        });
        assert_eq!(at_a2.len(), 1);
        assert_eq!(at_a2[0].oil_type, "Palm Olein");
    }

    #[test]
    fn test_create_batch_letters_per_day() {
        let repo = InMemoryBatchRepository::with_sample_data();
        let now = Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap();

        let first = repo
            .create_batch_at("STATION-B2", "Canola", None, now)
            .unwrap();
        let second = repo
            .create_batch_at("STATION-A1", "Canola", Some("refill".into()), now)
            .unwrap();

        assert_eq!(first.id, "BATCH-20240302-A");
        assert_eq!(second.id, "BATCH-20240302-B");
        assert_eq!(first.station_name, "Fryer B2");
        assert_eq!(first.tests_count, 0);
        assert!(first.current_status.is_none());
    }

    #[test]
    fn test_create_batch_unknown_station() {
        let repo = InMemoryBatchRepository::new();
        let err = repo.create_batch("STATION-X", "Canola", None).unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "station", .. }));
    }

    #[test]
    fn test_update_batch_from_test() {
        let repo = InMemoryBatchRepository::with_sample_data();
        let batch = repo
            .update_batch_from_test("BATCH-2024-0115-C", 40, ComplianceStatus::Reject)
            .unwrap();
        assert_eq!(batch.tests_count, 6);
        assert_eq!(batch.current_score, Some(40));
        assert_eq!(batch.current_status, Some(ComplianceStatus::Reject));

        assert!(repo
            .update_batch_from_test("BATCH-NOPE", 40, ComplianceStatus::Reject)
            .is_err());
    }

    #[test]
    fn test_station_update_is_partial() {
        let repo = InMemoryBatchRepository::with_sample_data();
        let updated = repo
            .update_station(
                "STATION-B1",
                StationUpdate {
                    status: Some(StationStatus::Active),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, StationStatus::Active);
        assert_eq!(updated.name, "Fryer B1");
        assert!(repo.update_station("STATION-ZZ", StationUpdate::default()).is_none());

        let added = repo.add_station(NewStation {
            name: "Fryer C1".into(),
            location: "Kitchen Zone C".into(),
            equipment: "Countertop Fryer 10L".into(),
            capacity: "10L".into(),
            status: StationStatus::Inactive,
        });
        assert!(added.id.starts_with("STATION-"));
        assert_eq!(repo.stations().len(), 6);
    }

    #[test]
    fn test_records_newest_first_and_filtered() {
        let repo = InMemoryBatchRepository::with_sample_data();
        let limits = RegulatoryLimits::default();
        for batch_id in ["BATCH-2024-0115-A", "BATCH-2024-0115-B", "BATCH-2024-0115-A"] {
            repo.add_test_record(NewTestRecord {
                batch_id: batch_id.into(),
                result: aggregate(0.1, 10.0, 3.0, &limits, 90.0).unwrap(),
                operator_id: None,
            });
        }

        let all = repo.test_records(None);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].batch_id, "BATCH-2024-0115-A");
        assert_eq!(all[1].batch_id, "BATCH-2024-0115-B");
        assert_eq!(repo.test_records(Some("BATCH-2024-0115-A")).len(), 2);
        assert!(all[0].id.starts_with("TEST-"));
    }

    #[test]
    fn test_statistics() {
        let repo = InMemoryBatchRepository::with_sample_data();
        assert_eq!(
            repo.statistics(),
            BatchStatistics {
                total_batches: 3,
                active_batches: 3,
                pass_rate: 67,
                alert_count: 1,
            }
        );

        repo.create_batch("STATION-B2", "Canola", None).unwrap();
        let stats = repo.statistics();
        assert_eq!(stats.total_batches, 4);
        assert_eq!(stats.active_batches, 3);
    }

    #[test]
    fn test_statistics_empty_repository() {
        let stats = InMemoryBatchRepository::new().statistics();
        assert_eq!(stats.pass_rate, 100);
        assert_eq!(stats.alert_count, 0);
    }
}
