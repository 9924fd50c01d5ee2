//! Guest routes

use axum::{
    extract::{rejection::PathRejection, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use lateshow_common::db::{appearances, guests, Guest};
use lateshow_common::views::guest_view;

use crate::{ApiError, ApiResult, AppState};

/// GET /guests
pub async fn list_guests(State(state): State<AppState>) -> ApiResult<Json<Vec<Guest>>> {
    Ok(Json(guests::list(&state.db).await?))
}

/// GET /guests/:id
///
/// Guest with its appearances; each appearance nests its episode only.
pub async fn get_guest(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Response> {
    let not_found = || ApiError::NotFound(guests::NOT_FOUND_MESSAGE.to_string());
    let Path(id) = path.map_err(|_| not_found())?;

    let guest = guests::find(&state.db, id).await?.ok_or_else(not_found)?;
    let records = appearances::list_for_guest(&state.db, id).await?;

    Ok(Json(guest_view(&guest, &records)).into_response())
}
