//! Response shaping
//!
//! Guest ↔ Appearance ↔ Episode forms a cycle, so each view builder takes
//! the relation it was reached through and leaves that side out. Nested
//! guests and episodes are always rendered as leaf records, which caps the
//! depth at entity → direct relations → leaf fields.

use crate::db::{AppearanceRecord, Episode, Guest};
use serde::Serialize;

/// Side of an appearance to leave out when nesting it under its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Guest,
    Episode,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppearanceView<'a> {
    pub id: i64,
    pub rating: i64,
    pub guest_id: i64,
    pub episode_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<&'a Episode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest: Option<&'a Guest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeView<'a> {
    #[serde(flatten)]
    pub episode: &'a Episode,
    pub appearances: Vec<AppearanceView<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuestView<'a> {
    #[serde(flatten)]
    pub guest: &'a Guest,
    pub appearances: Vec<AppearanceView<'a>>,
}

/// Render an appearance, omitting the `exclude` side if given
pub fn appearance_view(record: &AppearanceRecord, exclude: Option<Relation>) -> AppearanceView<'_> {
    AppearanceView {
        id: record.appearance.id,
        rating: record.appearance.rating.value(),
        guest_id: record.appearance.guest_id,
        episode_id: record.appearance.episode_id,
        episode: (exclude != Some(Relation::Episode)).then_some(&record.episode),
        guest: (exclude != Some(Relation::Guest)).then_some(&record.guest),
    }
}

/// Render an episode with its appearances; each appearance carries its guest only
pub fn episode_view<'a>(episode: &'a Episode, appearances: &'a [AppearanceRecord]) -> EpisodeView<'a> {
    EpisodeView {
        episode,
        appearances: appearances
            .iter()
            .map(|record| appearance_view(record, Some(Relation::Episode)))
            .collect(),
    }
}

/// Render a guest with its appearances; each appearance carries its episode only
pub fn guest_view<'a>(guest: &'a Guest, appearances: &'a [AppearanceRecord]) -> GuestView<'a> {
    GuestView {
        guest,
        appearances: appearances
            .iter()
            .map(|record| appearance_view(record, Some(Relation::Guest)))
            .collect(),
    }
}
