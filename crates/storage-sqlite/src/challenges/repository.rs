//! SQLite repository for challenge records.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use daystreak_core::challenges::{Challenge, ChallengeRepositoryTrait};
use daystreak_core::Result;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::challenges;
use crate::schema::challenges::dsl::*;

use super::model::ChallengeDB;

pub struct ChallengeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ChallengeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ChallengeRepository { pool, writer }
    }

    pub fn list_impl(&self, owner: Option<&str>) -> Result<Vec<Challenge>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = challenges::table.into_boxed();
        query = match owner {
            Some(uid) => query.filter(owner_id.eq(uid.to_string())),
            None => query.filter(owner_id.is_null()),
        };
        let rows = query
            .order(start_date.asc())
            .load::<ChallengeDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(ChallengeDB::into_domain).collect())
    }
}

#[async_trait]
impl ChallengeRepositoryTrait for ChallengeRepository {
    fn list(&self, owner: Option<&str>) -> Result<Vec<Challenge>> {
        self.list_impl(owner)
    }

    async fn insert(&self, owner: Option<&str>, challenge: Challenge) -> Result<()> {
        let row = ChallengeDB::from_domain(&challenge, owner);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(challenges::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn update(&self, owner: Option<&str>, challenge: Challenge) -> Result<()> {
        let row = ChallengeDB::from_domain(&challenge, owner);
        let owner_owned = owner.map(str::to_string);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let target = challenges::table.filter(id.eq(row.id.clone()));
                match owner_owned {
                    Some(uid) => diesel::update(target.filter(owner_id.eq(uid)))
                        .set(&row)
                        .execute(conn),
                    None => diesel::update(target.filter(owner_id.is_null()))
                        .set(&row)
                        .execute(conn),
                }
                .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn delete(&self, owner: Option<&str>, challenge_id: &str) -> Result<()> {
        let challenge_id_owned = challenge_id.to_string();
        let owner_owned = owner.map(str::to_string);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let target = challenges::table.filter(id.eq(challenge_id_owned));
                match owner_owned {
                    Some(uid) => diesel::delete(target.filter(owner_id.eq(uid))).execute(conn),
                    None => diesel::delete(target.filter(owner_id.is_null())).execute(conn),
                }
                .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn replace_all_in_scope(
        &self,
        owner: Option<&str>,
        incoming: Vec<Challenge>,
    ) -> Result<()> {
        let owner_owned = owner.map(str::to_string);
        let rows: Vec<ChallengeDB> = incoming
            .iter()
            .map(|challenge| ChallengeDB::from_domain(challenge, owner_owned.as_deref()))
            .collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                conn.transaction::<_, diesel::result::Error, _>(|conn| {
                    match owner_owned.as_deref() {
                        Some(uid) => {
                            diesel::delete(challenges::table.filter(owner_id.eq(uid)))
                                .execute(conn)?;
                        }
                        None => {
                            diesel::delete(challenges::table.filter(owner_id.is_null()))
                                .execute(conn)?;
                        }
                    }
                    diesel::insert_into(challenges::table)
                        .values(&rows)
                        .execute(conn)?;
                    Ok(())
                })
                .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
