//! One-time migration of the deprecated flat-file challenge payload.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::{debug, error, info};
use serde::Deserialize;

use daystreak_core::challenges::{clamp_completed_days, Challenge};
use daystreak_core::Result;

use crate::errors::StorageError;
use crate::schema::challenges;

use super::model::ChallengeDB;

/// Record shape written by the pre-SQLite releases: a flat JSON array in
/// a single file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyChallengeRecord {
    id: String,
    title: String,
    accent_color: String,
    start_date: DateTime<Utc>,
    #[serde(default)]
    completed_days_set: Vec<i64>,
}

impl LegacyChallengeRecord {
    fn into_domain(self) -> Challenge {
        Challenge {
            id: self.id,
            title: self.title,
            accent_color: self.accent_color,
            start_date: self.start_date,
            completed_days: clamp_completed_days(self.completed_days_set),
        }
    }
}

/// Moves challenges out of the deprecated flat file into the `challenges`
/// table. Runs at store initialization, before any other reader.
///
/// Records whose id already exists locally under ANY owner scope are
/// skipped (this step predates owner scoping); duplicate ids within the
/// payload keep their first occurrence. Survivors are inserted untagged.
/// The file is removed only after the batch insert commits. A missing or
/// undecodable payload means nothing to migrate, not an error.
pub fn migrate_legacy_challenges(conn: &mut SqliteConnection, path: &Path) -> Result<()> {
    let Ok(raw) = fs::read(path) else {
        return Ok(());
    };
    let decoded: Vec<LegacyChallengeRecord> = match serde_json::from_slice(&raw) {
        Ok(decoded) => decoded,
        Err(err) => {
            debug!("Legacy challenge payload not decodable, skipping migration: {err}");
            return Ok(());
        }
    };

    let mut seen: HashSet<String> = challenges::table
        .select(challenges::id)
        .load::<String>(conn)
        .map_err(StorageError::from)?
        .into_iter()
        .collect();

    let mut rows = Vec::new();
    for record in decoded {
        if !seen.insert(record.id.clone()) {
            continue;
        }
        rows.push(ChallengeDB::from_domain(&record.into_domain(), None));
    }

    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::insert_into(challenges::table)
            .values(&rows)
            .execute(conn)?;
        Ok(())
    })
    .map_err(StorageError::from)?;

    if !rows.is_empty() {
        info!("Migrated {} legacy challenge(s)", rows.len());
    }
    if let Err(err) = fs::remove_file(path) {
        error!("Failed to remove migrated legacy challenge file: {err}");
    }
    Ok(())
}
