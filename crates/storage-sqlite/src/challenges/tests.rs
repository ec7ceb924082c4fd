use std::collections::HashSet;
use std::fs;

use chrono::{DateTime, TimeZone, Utc};
use diesel::prelude::*;
use tempfile::TempDir;

use daystreak_core::challenges::{Challenge, ChallengeRepositoryTrait};

use crate::db::get_connection;
use crate::schema::challenges;
use crate::{open_store, ChallengeRepository};

use super::model::ChallengeDB;

fn date(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap()
}

fn challenge(record_id: &str, start_day: u32) -> Challenge {
    Challenge {
        id: record_id.to_string(),
        title: format!("Challenge {record_id}"),
        accent_color: "#FF5733".to_string(),
        start_date: date(start_day),
        completed_days: HashSet::new(),
    }
}

fn open_test_store(dir: &TempDir) -> ChallengeRepository {
    let db_path = dir.path().join("daystreak.sqlite");
    open_store(db_path.to_str().unwrap(), None).unwrap()
}

#[tokio::test]
async fn list_is_scoped_by_owner_and_ordered_by_start_date() {
    let dir = TempDir::new().unwrap();
    let repo = open_test_store(&dir);

    repo.insert(Some("u1"), challenge("late", 20)).await.unwrap();
    repo.insert(Some("u1"), challenge("early", 5)).await.unwrap();
    repo.insert(Some("u2"), challenge("other", 1)).await.unwrap();
    repo.insert(None, challenge("anon", 1)).await.unwrap();

    let ids: Vec<String> = repo
        .list(Some("u1"))
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["early", "late"]);

    let anon: Vec<String> = repo.list(None).unwrap().into_iter().map(|c| c.id).collect();
    assert_eq!(anon, vec!["anon"]);
}

#[tokio::test]
async fn update_only_touches_the_matching_owner_scope() {
    let dir = TempDir::new().unwrap();
    let repo = open_test_store(&dir);
    repo.insert(Some("u1"), challenge("a", 1)).await.unwrap();

    let mut renamed = challenge("a", 1);
    renamed.title = "Renamed".to_string();

    // Wrong scope: no-op.
    repo.update(Some("u2"), renamed.clone()).await.unwrap();
    assert_eq!(repo.list(Some("u1")).unwrap()[0].title, "Challenge a");

    repo.update(Some("u1"), renamed).await.unwrap();
    assert_eq!(repo.list(Some("u1")).unwrap()[0].title, "Renamed");
}

#[tokio::test]
async fn delete_only_touches_the_matching_owner_scope() {
    let dir = TempDir::new().unwrap();
    let repo = open_test_store(&dir);
    repo.insert(Some("u1"), challenge("a", 1)).await.unwrap();
    repo.insert(None, challenge("a2", 1)).await.unwrap();

    repo.delete(None, "a").await.unwrap();
    assert_eq!(repo.list(Some("u1")).unwrap().len(), 1);

    repo.delete(Some("u1"), "a").await.unwrap();
    assert!(repo.list(Some("u1")).unwrap().is_empty());
    assert_eq!(repo.list(None).unwrap().len(), 1);
}

#[tokio::test]
async fn replace_all_in_scope_swaps_exactly_one_scope() {
    let dir = TempDir::new().unwrap();
    let repo = open_test_store(&dir);
    repo.insert(Some("u1"), challenge("x", 1)).await.unwrap();
    repo.insert(None, challenge("anon", 1)).await.unwrap();

    repo.replace_all_in_scope(Some("u1"), vec![challenge("y", 2), challenge("z", 3)])
        .await
        .unwrap();

    let ids: Vec<String> = repo
        .list(Some("u1"))
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["y", "z"]);
    assert_eq!(repo.list(None).unwrap().len(), 1);
}

#[tokio::test]
async fn completed_days_round_trip_and_clamp_on_write() {
    let dir = TempDir::new().unwrap();
    let repo = open_test_store(&dir);

    let mut incoming = challenge("a", 1);
    incoming.completed_days = HashSet::from([3, 7, 150]);
    repo.insert(None, incoming).await.unwrap();

    let stored = &repo.list(None).unwrap()[0];
    assert_eq!(stored.completed_days, HashSet::from([3, 7]));
}

#[tokio::test]
async fn row_decode_clamps_foreign_day_values() {
    let dir = TempDir::new().unwrap();
    let repo = open_test_store(&dir);

    let row = ChallengeDB {
        id: "foreign".to_string(),
        owner_id: None,
        title: "Foreign".to_string(),
        accent_color: "#000000".to_string(),
        start_date: date(1).naive_utc(),
        completed_days: "[-1, 5, 150]".to_string(),
    };
    let pool = crate::create_pool(dir.path().join("daystreak.sqlite").to_str().unwrap()).unwrap();
    let mut conn = get_connection(&pool).unwrap();
    diesel::insert_into(challenges::table)
        .values(&row)
        .execute(&mut conn)
        .unwrap();

    let stored = &repo.list(None).unwrap()[0];
    assert_eq!(stored.completed_days, HashSet::from([5]));
}

#[tokio::test]
async fn malformed_day_payload_decodes_to_an_empty_set() {
    let dir = TempDir::new().unwrap();
    let repo = open_test_store(&dir);

    let row = ChallengeDB {
        id: "broken".to_string(),
        owner_id: None,
        title: "Broken".to_string(),
        accent_color: "#000000".to_string(),
        start_date: date(1).naive_utc(),
        completed_days: "not json".to_string(),
    };
    let pool = crate::create_pool(dir.path().join("daystreak.sqlite").to_str().unwrap()).unwrap();
    let mut conn = get_connection(&pool).unwrap();
    diesel::insert_into(challenges::table)
        .values(&row)
        .execute(&mut conn)
        .unwrap();

    let stored = &repo.list(None).unwrap()[0];
    assert!(stored.completed_days.is_empty());
}

#[tokio::test]
async fn legacy_migration_skips_existing_ids_and_removes_the_file() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("daystreak.sqlite");
    let legacy_path = dir.path().join("challenges.json");

    // Seed record A before migration runs.
    {
        let repo = open_store(db_path.to_str().unwrap(), None).unwrap();
        repo.insert(None, challenge("a", 1)).await.unwrap();
    }

    fs::write(
        &legacy_path,
        r##"[
            {"id": "a", "title": "Old A", "accentColor": "#111111",
             "startDate": "2026-03-01T09:00:00Z", "completedDaysSet": [1, 2]},
            {"id": "b", "title": "Old B", "accentColor": "#222222",
             "startDate": "2026-03-02T09:00:00Z", "completedDaysSet": [4, 200]}
        ]"##,
    )
    .unwrap();

    let repo = open_store(db_path.to_str().unwrap(), Some(&legacy_path)).unwrap();

    let stored = repo.list(None).unwrap();
    assert_eq!(stored.len(), 2);
    // A kept its pre-migration contents.
    assert_eq!(stored[0].id, "a");
    assert_eq!(stored[0].title, "Challenge a");
    assert_eq!(stored[1].id, "b");
    assert_eq!(stored[1].completed_days, HashSet::from([4]));
    assert!(!legacy_path.exists());
}

#[tokio::test]
async fn legacy_migration_keeps_the_first_of_duplicate_ids() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("daystreak.sqlite");
    let legacy_path = dir.path().join("challenges.json");

    fs::write(
        &legacy_path,
        r##"[
            {"id": "dup", "title": "First", "accentColor": "#111111",
             "startDate": "2026-03-01T09:00:00Z", "completedDaysSet": []},
            {"id": "dup", "title": "Second", "accentColor": "#222222",
             "startDate": "2026-03-02T09:00:00Z", "completedDaysSet": []}
        ]"##,
    )
    .unwrap();

    let repo = open_store(db_path.to_str().unwrap(), Some(&legacy_path)).unwrap();

    let stored = repo.list(None).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "First");
}

#[tokio::test]
async fn undecodable_legacy_payload_is_a_silent_no_op() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("daystreak.sqlite");
    let legacy_path = dir.path().join("challenges.json");
    fs::write(&legacy_path, "definitely not json").unwrap();

    let repo = open_store(db_path.to_str().unwrap(), Some(&legacy_path)).unwrap();

    assert!(repo.list(None).unwrap().is_empty());
    // Nothing migrated, so the payload stays put.
    assert!(legacy_path.exists());
}
