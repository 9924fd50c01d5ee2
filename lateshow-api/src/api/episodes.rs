//! Episode routes
//!
//! GET /episodes, GET /episodes/:id, DELETE /episodes/:id

use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use lateshow_common::db::{appearances, episodes, Episode};
use lateshow_common::views::episode_view;
use tracing::debug;

use super::home::MessageResponse;
use crate::{ApiError, ApiResult, AppState};

/// Path ids that are not integers are treated like unknown ids
fn episode_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound(episodes::NOT_FOUND_MESSAGE.to_string()))
}

/// GET /episodes
///
/// Flat list of `{id, date, number}`; appearances are not included.
pub async fn list_episodes(State(state): State<AppState>) -> ApiResult<Json<Vec<Episode>>> {
    let episodes = episodes::list(&state.db).await?;
    debug!("Listing {} episodes", episodes.len());
    Ok(Json(episodes))
}

/// GET /episodes/:id
///
/// Episode with its appearances; each appearance nests its guest but not
/// the episode it already sits under.
pub async fn get_episode(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Response> {
    let id = episode_id(path)?;

    let episode = episodes::find(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(episodes::NOT_FOUND_MESSAGE.to_string()))?;
    let records = appearances::list_for_episode(&state.db, id).await?;

    Ok(Json(episode_view(&episode, &records)).into_response())
}

/// DELETE /episodes/:id
///
/// Removes the episode and, in the same transaction, its appearances.
pub async fn delete_episode(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id = episode_id(path)?;

    episodes::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Episode deleted successfully")))
}
