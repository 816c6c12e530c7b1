//! Outbound alert delivery.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

pub trait Notifier: Send + Sync {
    fn send(&self, channel: Channel, recipients: &[String], subject: &str, body: &str);
}

/// Writes notifications to the log instead of a mail or SMS gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, channel: Channel, recipients: &[String], subject: &str, body: &str) {
        match channel {
            Channel::Email => log::info!(
                "[Email Alert] To: {} | Subject: {} | Body: {}",
                recipients.join(", "),
                subject,
                body
            ),
            Channel::Sms => log::info!(
                "[SMS Alert] To: {} | Message: {}",
                recipients.join(", "),
                body
            ),
        }
    }
}
