//! The challenge record and its derived values.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard cap on challenge records within one owner scope.
pub const MAX_CHALLENGES_PER_SCOPE: usize = 3;

/// Challenges run for 100 days; day numbers are 1..=100.
pub const CHALLENGE_LENGTH_DAYS: u32 = 100;

/// A 100-day challenge.
///
/// `completed_days` always holds values within `1..=100`; every decode
/// boundary (local row, cloud document, legacy payload) filters foreign
/// values through [`clamp_completed_days`] before they reach this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub title: String,
    /// Hex color string; opaque to the engine, never validated.
    pub accent_color: String,
    pub start_date: DateTime<Utc>,
    pub completed_days: HashSet<u32>,
}

impl Challenge {
    /// Creates a challenge with a fresh id and an empty completed set.
    pub fn new(
        title: impl Into<String>,
        accent_color: impl Into<String>,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            accent_color: accent_color.into(),
            start_date,
            completed_days: HashSet::new(),
        }
    }

    /// Day number reached as of `now`, clamped to `1..=100`.
    ///
    /// Both endpoints are truncated to the start of their UTC day before
    /// the difference is taken, so a challenge started late in the evening
    /// still advances at midnight.
    pub fn current_day(&self, now: DateTime<Utc>) -> u32 {
        let elapsed = (now.date_naive() - self.start_date.date_naive()).num_days();
        (elapsed + 1).clamp(1, i64::from(CHALLENGE_LENGTH_DAYS)) as u32
    }

    /// Fraction of the 100 days completed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        self.completed_days.len() as f64 / f64::from(CHALLENGE_LENGTH_DAYS)
    }

    /// Whether the day reached as of `now` is already marked completed.
    pub fn is_day_completed(&self, now: DateTime<Utc>) -> bool {
        self.completed_days.contains(&self.current_day(now))
    }
}

/// Filters day numbers down to the valid `1..=100` range.
///
/// Out-of-range values from any source are dropped silently; they never
/// fail a decode.
pub fn clamp_completed_days<I>(days: I) -> HashSet<u32>
where
    I: IntoIterator<Item = i64>,
{
    days.into_iter()
        .filter(|day| (1..=i64::from(CHALLENGE_LENGTH_DAYS)).contains(day))
        .map(|day| day as u32)
        .collect()
}
