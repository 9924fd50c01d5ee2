//! Episode persistence

use crate::validation::{require_text, EPISODE_DATE_MESSAGE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqliteExecutor, SqlitePool};
use tracing::{info, warn};

pub const NOT_FOUND_MESSAGE: &str = "Episode not found";

/// Episode record as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Episode {
    pub id: i64,
    pub date: String,
    pub number: i64,
}

/// Validated episode that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEpisode {
    date: String,
    number: i64,
}

impl NewEpisode {
    pub fn new(date: &str, number: i64) -> Result<Self> {
        Ok(Self {
            date: require_text(date, EPISODE_DATE_MESSAGE)?,
            number,
        })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn number(&self) -> i64 {
        self.number
    }
}

/// All episodes, ordered by id
pub async fn list(executor: impl SqliteExecutor<'_>) -> Result<Vec<Episode>> {
    let episodes = sqlx::query_as::<_, Episode>("SELECT id, date, number FROM episodes ORDER BY id")
        .fetch_all(executor)
        .await?;
    Ok(episodes)
}

pub async fn find(executor: impl SqliteExecutor<'_>, id: i64) -> Result<Option<Episode>> {
    let episode = sqlx::query_as::<_, Episode>("SELECT id, date, number FROM episodes WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(episode)
}

pub async fn insert(executor: impl SqliteExecutor<'_>, episode: &NewEpisode) -> Result<Episode> {
    let id = sqlx::query("INSERT INTO episodes (date, number) VALUES (?, ?)")
        .bind(episode.date())
        .bind(episode.number())
        .execute(executor)
        .await?
        .last_insert_rowid();

    Ok(Episode {
        id,
        date: episode.date.clone(),
        number: episode.number,
    })
}

pub async fn count(executor: impl SqliteExecutor<'_>) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM episodes")
        .fetch_one(executor)
        .await?;
    Ok(count)
}

/// Delete an episode together with its appearances
///
/// The cascade runs inside one transaction: dependents first, then the
/// episode. On failure the transaction is rolled back and the error returned.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let mut tx = super::begin_write(pool).await?;

    match delete_with_appearances(&mut tx, id).await {
        Ok(removed) => {
            tx.commit().await?;
            info!("Deleted episode {} and {} appearance(s)", id, removed);
            Ok(())
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after failed episode delete also failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn delete_with_appearances(conn: &mut SqliteConnection, id: i64) -> Result<u64> {
    if find(&mut *conn, id).await?.is_none() {
        return Err(Error::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    let removed = sqlx::query("DELETE FROM appearances WHERE episode_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM episodes WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(removed)
}
