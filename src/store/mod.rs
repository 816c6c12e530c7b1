//! In-memory repositories for stations, batches, test records and alerts.
//!
//! Callers hold the repository traits, so a persistent backend can replace
//! the in-memory implementations without touching the test session.

pub mod alerts;
pub mod batches;
pub mod ids;
pub mod notify;

pub use alerts::{
    test_result_alert, Alert, AlertFilter, AlertKind, AlertRepository, AlertSeverity,
    InMemoryAlertRepository, NewAlert, NotificationPreferences, NotifyOn,
};
pub use batches::{
    Batch, BatchFilter, BatchRepository, BatchStatistics, FryingStation, InMemoryBatchRepository,
    NewStation, NewTestRecord, StationStatus, StationUpdate, TestRecord,
};
pub use notify::{Channel, LogNotifier, Notifier};
