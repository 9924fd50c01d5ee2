//! Entity store: schema, per-entity queries and sample data

pub mod appearances;
pub mod episodes;
pub mod guests;
pub mod init;
pub mod seed;

pub use appearances::{Appearance, AppearanceRecord, NewAppearance};
pub use episodes::{Episode, NewEpisode};
pub use guests::{Guest, NewGuest};
pub use init::{connect_in_memory, create_schema, init_database};
pub use seed::{seed_database, SeedSummary};

use sqlx::{Sqlite, SqlitePool, Transaction};

/// Start a transaction that takes the write lock up front
///
/// A deferred transaction that reads and then writes cannot wait for a
/// concurrent writer: SQLite fails the lock upgrade with `SQLITE_BUSY`
/// straight away. `BEGIN IMMEDIATE` waits on the busy timeout instead.
pub(crate) async fn begin_write(pool: &SqlitePool) -> crate::Result<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}
