use super::ids::unique_id;
use super::notify::{Channel, LogNotifier, Notifier};
use crate::core::ComplianceStatus;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Borderline,
    Reject,
    Equipment,
    Calibration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub batch_id: Option<String>,
    pub station_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub acknowledged: bool,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewAlert {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub batch_id: Option<String>,
    pub station_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlertFilter {
    pub kind: Option<AlertKind>,
    pub acknowledged: Option<bool>,
}

impl AlertFilter {
    fn matches(&self, alert: &Alert) -> bool {
        self.kind.is_none_or(|kind| alert.kind == kind)
            && self.acknowledged.is_none_or(|ack| alert.acknowledged == ack)
    }
}

/// Which alert kinds trigger outbound notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyOn {
    pub borderline: bool,
    pub reject: bool,
    pub equipment: bool,
    pub calibration: bool,
}

impl Default for NotifyOn {
    fn default() -> Self {
        Self {
            borderline: true,
            reject: true,
            equipment: true,
            calibration: false,
        }
    }
}

impl NotifyOn {
    pub fn allows(&self, kind: AlertKind) -> bool {
        match kind {
            AlertKind::Borderline => self.borderline,
            AlertKind::Reject => self.reject,
            AlertKind::Equipment => self.equipment,
            AlertKind::Calibration => self.calibration,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub email: bool,
    pub sms: bool,
    pub email_addresses: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub notify_on: NotifyOn,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            email_addresses: Vec::new(),
            phone_numbers: Vec::new(),
            notify_on: NotifyOn::default(),
        }
    }
}

/// The alert a finished test should raise, if any.
pub fn test_result_alert(
    classification: ComplianceStatus,
    score: u8,
    batch_id: &str,
    station_id: Option<&str>,
) -> Option<NewAlert> {
    let (kind, severity, title, message) = match classification {
        ComplianceStatus::Pass => return None,
        ComplianceStatus::Borderline => (
            AlertKind::Borderline,
            AlertSeverity::Warning,
            "Borderline Oil Quality Detected",
            format!(
                "Batch {} shows borderline oil quality (Score: {}). Increased monitoring recommended.",
                batch_id, score
            ),
        ),
        ComplianceStatus::Reject => (
            AlertKind::Reject,
            AlertSeverity::Critical,
            "Oil Quality Below Acceptable Limits",
            format!(
                "Batch {} has been REJECTED (Score: {}). Immediate oil replacement required.",
                batch_id, score
            ),
        ),
    };

    Some(NewAlert {
        kind,
        severity,
        title: title.to_string(),
        message,
        batch_id: Some(batch_id.to_string()),
        station_id: station_id.map(str::to_string),
    })
}

pub trait AlertRepository: Send + Sync {
    fn create(&self, alert: NewAlert) -> Alert;

    /// Matching alerts, newest first.
    fn alerts(&self, filter: &AlertFilter) -> Vec<Alert>;

    fn unacknowledged_count(&self) -> usize;

    /// Marks an alert acknowledged; `None` when the id is unknown.
    fn acknowledge(&self, id: &str, by: &str) -> Option<Alert>;

    fn preferences(&self) -> NotificationPreferences;

    fn update_preferences(&self, preferences: NotificationPreferences);

    fn create_test_result_alert(
        &self,
        classification: ComplianceStatus,
        score: u8,
        batch_id: &str,
        station_id: Option<&str>,
    ) -> Option<Alert> {
        test_result_alert(classification, score, batch_id, station_id).map(|a| self.create(a))
    }
}

pub struct InMemoryAlertRepository<N = LogNotifier> {
    alerts: RwLock<Vec<Alert>>,
    preferences: RwLock<NotificationPreferences>,
    notifier: N,
}

impl InMemoryAlertRepository<LogNotifier> {
    pub fn new() -> Self {
        Self::with_notifier(LogNotifier)
    }

    /// Repository holding the two demo alerts for station A3 and B1.
    pub fn with_sample_alerts() -> Self {
        let repo = Self::new();
        repo.create(NewAlert {
            kind: AlertKind::Borderline,
            severity: AlertSeverity::Warning,
            title: "Borderline TPC Level".into(),
            message: "Station A3 showing elevated TPC levels (22.5%). Monitor closely.".into(),
            batch_id: Some("BATCH-2024-0115-C".into()),
            station_id: Some("STATION-A3".into()),
        });
        repo.create(NewAlert {
            kind: AlertKind::Reject,
            severity: AlertSeverity::Critical,
            title: "Oil Quality Rejected".into(),
            message: "Station B1 oil failed quality test. Immediate replacement required."
                .into(),
            batch_id: Some("BATCH-2024-0114-B".into()),
            station_id: Some("STATION-B1".into()),
        });
        repo
    }
}

impl Default for InMemoryAlertRepository<LogNotifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Notifier> InMemoryAlertRepository<N> {
    pub fn with_notifier(notifier: N) -> Self {
        Self {
            alerts: RwLock::new(Vec::new()),
            preferences: RwLock::new(NotificationPreferences::default()),
            notifier,
        }
    }

    fn dispatch(&self, alert: &Alert) {
        let prefs = self.preferences.read().clone();
        if !prefs.notify_on.allows(alert.kind) {
            log::debug!("Notifications disabled for {:?} alerts", alert.kind);
            return;
        }

        if prefs.email && !prefs.email_addresses.is_empty() {
            self.notifier.send(
                Channel::Email,
                &prefs.email_addresses,
                &format!("FoodOil IQ Alert - {}", alert.title),
                &alert.message,
            );
        }
        if prefs.sms && !prefs.phone_numbers.is_empty() {
            self.notifier.send(
                Channel::Sms,
                &prefs.phone_numbers,
                &alert.title,
                &format!("{} - {}", alert.title, alert.message),
            );
        }
    }
}

impl<N: Notifier> AlertRepository for InMemoryAlertRepository<N> {
    fn create(&self, alert: NewAlert) -> Alert {
        let now = Utc::now();
        let alert = Alert {
            id: unique_id("ALT", now),
            kind: alert.kind,
            severity: alert.severity,
            title: alert.title,
            message: alert.message,
            batch_id: alert.batch_id,
            station_id: alert.station_id,
            timestamp: now,
            acknowledged: false,
            acknowledged_by: None,
            acknowledged_at: None,
        };
        log::info!("Alert {} raised: {}", alert.id, alert.title);
        self.alerts.write().insert(0, alert.clone());
        self.dispatch(&alert);
        alert
    }

    fn alerts(&self, filter: &AlertFilter) -> Vec<Alert> {
        self.alerts
            .read()
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect()
    }

    fn unacknowledged_count(&self) -> usize {
        self.alerts.read().iter().filter(|a| !a.acknowledged).count()
    }

    fn acknowledge(&self, id: &str, by: &str) -> Option<Alert> {
        let mut alerts = self.alerts.write();
        let alert = alerts.iter_mut().find(|a| a.id == id)?;
        alert.acknowledged = true;
        alert.acknowledged_by = Some(by.to_string());
        alert.acknowledged_at = Some(Utc::now());
        Some(alert.clone())
    }

    fn preferences(&self) -> NotificationPreferences {
        self.preferences.read().clone()
    }

    fn update_preferences(&self, preferences: NotificationPreferences) {
        *self.preferences.write() = preferences;
    }
}
