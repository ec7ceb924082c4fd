//! Database model for challenge rows.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

use daystreak_core::challenges::{clamp_completed_days, Challenge};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::challenges)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChallengeDB {
    pub id: String,
    pub owner_id: Option<String>,
    pub title: String,
    pub accent_color: String,
    pub start_date: NaiveDateTime,
    /// JSON array of day numbers, filtered to 1..=100 on both sides.
    pub completed_days: String,
}

impl ChallengeDB {
    pub fn from_domain(challenge: &Challenge, owner: Option<&str>) -> Self {
        let mut days: Vec<u32> =
            clamp_completed_days(challenge.completed_days.iter().map(|&day| i64::from(day)))
                .into_iter()
                .collect();
        days.sort_unstable();
        Self {
            id: challenge.id.clone(),
            owner_id: owner.map(str::to_string),
            title: challenge.title.clone(),
            accent_color: challenge.accent_color.clone(),
            start_date: challenge.start_date.naive_utc(),
            completed_days: serde_json::to_string(&days).unwrap_or_else(|_| "[]".to_string()),
        }
    }

    /// A malformed day payload decodes to an empty set; it never fails
    /// the row.
    pub fn into_domain(self) -> Challenge {
        let days: Vec<i64> = serde_json::from_str(&self.completed_days).unwrap_or_default();
        Challenge {
            id: self.id,
            title: self.title,
            accent_color: self.accent_color,
            start_date: DateTime::from_naive_utc_and_offset(self.start_date, Utc),
            completed_days: clamp_completed_days(days),
        }
    }
}
