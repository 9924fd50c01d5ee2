//! Appearance persistence
//!
//! An appearance joins one guest to one episode with a rating. Creation is a
//! linear pipeline run inside a single transaction:
//! episode lookup → guest lookup → duplicate check → insert.

use crate::db::episodes::{self, Episode};
use crate::db::guests::{self, Guest};
use crate::validation::Rating;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection, SqliteExecutor, SqlitePool};
use tracing::{info, warn};

pub const DUPLICATE_MESSAGE: &str = "Duplicate appearance for the guest and episode on this date";

/// Appearance record as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Appearance {
    pub id: i64,
    pub rating: Rating,
    pub guest_id: i64,
    pub episode_id: i64,
}

/// Appearance loaded together with both records it references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppearanceRecord {
    pub appearance: Appearance,
    pub guest: Guest,
    pub episode: Episode,
}

/// Validated appearance that has not been persisted yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAppearance {
    rating: Rating,
    guest_id: i64,
    episode_id: i64,
}

impl NewAppearance {
    pub fn new(rating: i64, guest_id: i64, episode_id: i64) -> Result<Self> {
        Ok(Self {
            rating: Rating::new(rating)?,
            guest_id,
            episode_id,
        })
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn guest_id(&self) -> i64 {
        self.guest_id
    }

    pub fn episode_id(&self) -> i64 {
        self.episode_id
    }
}

const RECORD_SELECT: &str = r#"
    SELECT a.id, a.rating, a.guest_id, a.episode_id,
           g.name AS guest_name, g.occupation AS guest_occupation,
           e.date AS episode_date, e.number AS episode_number
    FROM appearances a
    JOIN guests g ON g.id = a.guest_id
    JOIN episodes e ON e.id = a.episode_id
"#;

fn record_from_row(row: &SqliteRow) -> Result<AppearanceRecord> {
    let guest_id: i64 = row.try_get("guest_id")?;
    let episode_id: i64 = row.try_get("episode_id")?;

    Ok(AppearanceRecord {
        appearance: Appearance {
            id: row.try_get("id")?,
            rating: row.try_get("rating")?,
            guest_id,
            episode_id,
        },
        guest: Guest {
            id: guest_id,
            name: row.try_get("guest_name")?,
            occupation: row.try_get("guest_occupation")?,
        },
        episode: Episode {
            id: episode_id,
            date: row.try_get("episode_date")?,
            number: row.try_get("episode_number")?,
        },
    })
}

pub async fn find_record(
    executor: impl SqliteExecutor<'_>,
    id: i64,
) -> Result<Option<AppearanceRecord>> {
    let sql = format!("{} WHERE a.id = ?", RECORD_SELECT);
    let row = sqlx::query(&sql).bind(id).fetch_optional(executor).await?;
    row.as_ref().map(record_from_row).transpose()
}

/// Appearances on one episode, ordered by id
pub async fn list_for_episode(
    executor: impl SqliteExecutor<'_>,
    episode_id: i64,
) -> Result<Vec<AppearanceRecord>> {
    let sql = format!("{} WHERE a.episode_id = ? ORDER BY a.id", RECORD_SELECT);
    let rows = sqlx::query(&sql).bind(episode_id).fetch_all(executor).await?;
    rows.iter().map(record_from_row).collect()
}

/// Appearances by one guest, ordered by id
pub async fn list_for_guest(
    executor: impl SqliteExecutor<'_>,
    guest_id: i64,
) -> Result<Vec<AppearanceRecord>> {
    let sql = format!("{} WHERE a.guest_id = ? ORDER BY a.id", RECORD_SELECT);
    let rows = sqlx::query(&sql).bind(guest_id).fetch_all(executor).await?;
    rows.iter().map(record_from_row).collect()
}

pub async fn count(executor: impl SqliteExecutor<'_>) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM appearances")
        .fetch_one(executor)
        .await?;
    Ok(count)
}

/// Number of appearances linking this guest to this episode (0 or 1)
pub async fn count_for_pair(
    executor: impl SqliteExecutor<'_>,
    guest_id: i64,
    episode_id: i64,
) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM appearances WHERE guest_id = ? AND episode_id = ?",
    )
    .bind(guest_id)
    .bind(episode_id)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

/// Insert without lookups; used by seeding, where both parents are known
pub(crate) async fn insert(
    executor: impl SqliteExecutor<'_>,
    appearance: &NewAppearance,
) -> Result<Appearance> {
    let id = sqlx::query("INSERT INTO appearances (rating, guest_id, episode_id) VALUES (?, ?, ?)")
        .bind(appearance.rating())
        .bind(appearance.guest_id())
        .bind(appearance.episode_id())
        .execute(executor)
        .await
        .map_err(map_unique_violation)?
        .last_insert_rowid();

    Ok(Appearance {
        id,
        rating: appearance.rating(),
        guest_id: appearance.guest_id(),
        episode_id: appearance.episode_id(),
    })
}

/// Create an appearance after checking both parents and the pair
///
/// Errors, in pipeline order:
/// - `NotFound("Episode not found")`
/// - `NotFound("Guest not found")`
/// - `Conflict(DUPLICATE_MESSAGE)`, also produced if the insert trips the
///   `UNIQUE (guest_id, episode_id)` constraint
/// - `Database` for anything the store rejects
///
/// The transaction holds the write lock from the first lookup, so concurrent
/// creates run one after another. It is rolled back on every error path.
pub async fn create(pool: &SqlitePool, appearance: &NewAppearance) -> Result<AppearanceRecord> {
    let mut tx = super::begin_write(pool).await?;

    match create_checked(&mut tx, appearance).await {
        Ok(record) => {
            tx.commit().await.map_err(map_unique_violation)?;
            info!(
                "Created appearance {} (guest {}, episode {}, rating {})",
                record.appearance.id,
                record.guest.id,
                record.episode.id,
                record.appearance.rating.value()
            );
            Ok(record)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after failed appearance insert also failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn create_checked(
    conn: &mut SqliteConnection,
    appearance: &NewAppearance,
) -> Result<AppearanceRecord> {
    let episode = episodes::find(&mut *conn, appearance.episode_id())
        .await?
        .ok_or_else(|| Error::NotFound(episodes::NOT_FOUND_MESSAGE.to_string()))?;

    let guest = guests::find(&mut *conn, appearance.guest_id())
        .await?
        .ok_or_else(|| Error::NotFound(guests::NOT_FOUND_MESSAGE.to_string()))?;

    if count_for_pair(&mut *conn, guest.id, episode.id).await? > 0 {
        return Err(Error::Conflict(DUPLICATE_MESSAGE.to_string()));
    }

    let appearance = insert(&mut *conn, appearance).await?;

    Ok(AppearanceRecord {
        appearance,
        guest,
        episode,
    })
}

fn map_unique_violation(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Error::Conflict(DUPLICATE_MESSAGE.to_string())
        }
        _ => Error::Database(err),
    }
}
