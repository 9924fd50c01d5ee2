//! Sample data
//!
//! Wipes all three tables and repopulates them with a fixed set of ten
//! guests, ten episodes and ten appearances. Everything happens in one
//! transaction; a failure leaves the previous contents untouched.

use crate::db::appearances::{self, NewAppearance};
use crate::db::episodes::{self, NewEpisode};
use crate::db::guests::{self, NewGuest};
use crate::Result;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

const GUESTS: [(&str, &str); 10] = [
    ("John Mwangi", "Actor"),
    ("Jane Achieng", "Musician"),
    ("Chris Mutua", "Comedian"),
    ("Emily Chebet", "Author"),
    ("Michael Juma", "Director"),
    ("Anna Muteti", "Producer"),
    ("David Mutisya", "Singer"),
    ("Sara Wairimu", "Dancer"),
    ("Mark Silisya", "Photographer"),
    ("Sophia Mutheu", "Influencer"),
];

const EPISODES: [(&str, i64); 10] = [
    ("2023-01-01", 1),
    ("2023-01-02", 2),
    ("2023-01-03", 3),
    ("2023-01-04", 4),
    ("2023-01-05", 5),
    ("2023-01-06", 6),
    ("2023-01-07", 7),
    ("2023-01-08", 8),
    ("2023-01-09", 9),
    ("2023-01-10", 10),
];

/// Rating of guest *i* on episode *i*
const RATINGS: [i64; 10] = [5, 4, 3, 5, 2, 4, 3, 5, 2, 4];

/// Row counts written by a seed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub guests: usize,
    pub episodes: usize,
    pub appearances: usize,
}

/// Clear every table and insert the sample data
pub async fn seed_database(pool: &SqlitePool) -> Result<SeedSummary> {
    let mut tx = super::begin_write(pool).await?;

    match seed_in(&mut tx).await {
        Ok(summary) => {
            tx.commit().await?;
            info!(
                "Database seeded with {} guests, {} episodes, and {} appearances",
                summary.guests, summary.episodes, summary.appearances
            );
            Ok(summary)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after failed seed also failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn seed_in(conn: &mut SqliteConnection) -> Result<SeedSummary> {
    info!("Clearing database");
    // Children first so foreign keys stay satisfied
    sqlx::query("DELETE FROM appearances").execute(&mut *conn).await?;
    sqlx::query("DELETE FROM guests").execute(&mut *conn).await?;
    sqlx::query("DELETE FROM episodes").execute(&mut *conn).await?;

    let mut guest_ids = Vec::with_capacity(GUESTS.len());
    for (name, occupation) in GUESTS {
        let guest = guests::insert(&mut *conn, &NewGuest::new(name, occupation)?).await?;
        guest_ids.push(guest.id);
    }

    let mut episode_ids = Vec::with_capacity(EPISODES.len());
    for (date, number) in EPISODES {
        let episode = episodes::insert(&mut *conn, &NewEpisode::new(date, number)?).await?;
        episode_ids.push(episode.id);
    }

    let mut appearance_count = 0;
    for ((rating, guest_id), episode_id) in RATINGS.iter().zip(&guest_ids).zip(&episode_ids) {
        let appearance = NewAppearance::new(*rating, *guest_id, *episode_id)?;
        appearances::insert(&mut *conn, &appearance).await?;
        appearance_count += 1;
    }

    Ok(SeedSummary {
        guests: guest_ids.len(),
        episodes: episode_ids.len(),
        appearances: appearance_count,
    })
}
