//! Guest persistence
//!
//! A guest owns its appearances: deleting a guest deletes them first, in the
//! same transaction.

use crate::validation::{require_text, GUEST_NAME_MESSAGE, GUEST_OCCUPATION_MESSAGE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqliteExecutor, SqlitePool};
use tracing::{info, warn};

pub const NOT_FOUND_MESSAGE: &str = "Guest not found";

/// Guest record as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Guest {
    pub id: i64,
    pub name: String,
    pub occupation: String,
}

/// Validated guest that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuest {
    name: String,
    occupation: String,
}

impl NewGuest {
    pub fn new(name: &str, occupation: &str) -> Result<Self> {
        Ok(Self {
            name: require_text(name, GUEST_NAME_MESSAGE)?,
            occupation: require_text(occupation, GUEST_OCCUPATION_MESSAGE)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn occupation(&self) -> &str {
        &self.occupation
    }
}

/// All guests, ordered by id
pub async fn list(executor: impl SqliteExecutor<'_>) -> Result<Vec<Guest>> {
    let guests = sqlx::query_as::<_, Guest>("SELECT id, name, occupation FROM guests ORDER BY id")
        .fetch_all(executor)
        .await?;
    Ok(guests)
}

pub async fn find(executor: impl SqliteExecutor<'_>, id: i64) -> Result<Option<Guest>> {
    let guest =
        sqlx::query_as::<_, Guest>("SELECT id, name, occupation FROM guests WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
    Ok(guest)
}

pub async fn insert(executor: impl SqliteExecutor<'_>, guest: &NewGuest) -> Result<Guest> {
    let id = sqlx::query("INSERT INTO guests (name, occupation) VALUES (?, ?)")
        .bind(guest.name())
        .bind(guest.occupation())
        .execute(executor)
        .await?
        .last_insert_rowid();

    Ok(Guest {
        id,
        name: guest.name.clone(),
        occupation: guest.occupation.clone(),
    })
}

pub async fn count(executor: impl SqliteExecutor<'_>) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guests")
        .fetch_one(executor)
        .await?;
    Ok(count)
}

/// Delete a guest and its appearances
///
/// Returns `Error::NotFound` when the guest does not exist. Any failure
/// rolls the transaction back before the error is returned.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
    let mut tx = super::begin_write(pool).await?;

    match delete_with_appearances(&mut tx, id).await {
        Ok(removed) => {
            tx.commit().await?;
            info!("Deleted guest {} and {} appearance(s)", id, removed);
            Ok(())
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after failed guest delete also failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn delete_with_appearances(conn: &mut SqliteConnection, id: i64) -> Result<u64> {
    if find(&mut *conn, id).await?.is_none() {
        return Err(Error::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    let removed = sqlx::query("DELETE FROM appearances WHERE guest_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM guests WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(removed)
}
