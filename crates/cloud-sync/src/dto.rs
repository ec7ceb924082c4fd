//! Wire documents for the per-account challenge collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use daystreak_core::challenges::{clamp_completed_days, Challenge};

/// `startDate` on the wire: this client writes RFC3339, but older clients
/// wrote epoch seconds, so decode accepts both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartDateField {
    Rfc3339(DateTime<Utc>),
    EpochSeconds(f64),
}

impl StartDateField {
    fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Rfc3339(value) => Some(*value),
            Self::EpochSeconds(seconds) => DateTime::from_timestamp(*seconds as i64, 0),
        }
    }
}

/// Challenge document as stored in the cloud collection.
///
/// `completedDays` may arrive unsorted and may contain out-of-range
/// values written by other clients; decode always filters to `1..=100`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDocument {
    pub id: String,
    pub title: String,
    pub accent_color: String,
    pub start_date: StartDateField,
    #[serde(default)]
    pub completed_days: Vec<i64>,
}

impl ChallengeDocument {
    pub fn from_domain(challenge: &Challenge) -> Self {
        let mut completed: Vec<i64> = challenge
            .completed_days
            .iter()
            .map(|&day| i64::from(day))
            .collect();
        completed.sort_unstable();
        Self {
            id: challenge.id.clone(),
            title: challenge.title.clone(),
            accent_color: challenge.accent_color.clone(),
            start_date: StartDateField::Rfc3339(challenge.start_date),
            completed_days: completed,
        }
    }

    /// `None` when the document is malformed: blank title, empty accent
    /// color, or an unrepresentable start date. Malformed documents are
    /// skipped individually rather than failing a whole fetch.
    pub fn into_domain(self) -> Option<Challenge> {
        if self.title.trim().is_empty() || self.accent_color.is_empty() {
            return None;
        }
        let start_date = self.start_date.to_datetime()?;
        Some(Challenge {
            id: self.id,
            title: self.title,
            accent_color: self.accent_color,
            start_date,
            completed_days: clamp_completed_days(self.completed_days),
        })
    }
}
