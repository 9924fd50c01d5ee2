//! POST /appearances
//!
//! Pipeline with an early exit at every step:
//! 1. all three form fields present
//! 2. all three fields are integers
//! 3. rating within 1..=5
//! 4. episode exists, then guest exists
//! 5. no existing appearance for the pair
//! 6. insert
//!
//! Fields are read from a urlencoded or a multipart body. Any other body,
//! or none at all, carries no fields and fails step 1.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use lateshow_common::db::{appearances, NewAppearance};
use lateshow_common::validation::{is_blank, parse_integer};
use lateshow_common::views::appearance_view;
use serde::Deserialize;

use crate::{ApiError, ApiResult, AppState};

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
pub const NOT_INTEGER_MESSAGE: &str = "guest_id, episode_id, and rating must be integers";

/// Raw form body; fields stay strings until each step has checked them
#[derive(Debug, Default, Deserialize)]
pub struct AppearanceForm {
    pub rating: Option<String>,
    pub guest_id: Option<String>,
    pub episode_id: Option<String>,
}

impl AppearanceForm {
    /// Steps 1-3: presence, integer parsing, then field validation
    pub fn validate(&self) -> ApiResult<NewAppearance> {
        let fields = [&self.rating, &self.guest_id, &self.episode_id];
        if fields.iter().any(|field| is_blank(field.as_deref())) {
            return Err(ApiError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
        }

        let [rating, guest_id, episode_id] =
            fields.map(|field| field.as_deref().and_then(parse_integer));
        let (Some(rating), Some(guest_id), Some(episode_id)) = (rating, guest_id, episode_id) else {
            return Err(ApiError::BadRequest(NOT_INTEGER_MESSAGE.to_string()));
        };

        Ok(NewAppearance::new(rating, guest_id, episode_id)?)
    }

    /// Collect text parts; file parts and unknown names are skipped, and the
    /// first value wins when a name repeats
    async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| ApiError::BadRequest(err.body_text()))?
        {
            if field.file_name().is_some() {
                continue;
            }
            let slot = match field.name() {
                Some("rating") => &mut form.rating,
                Some("guest_id") => &mut form.guest_id,
                Some("episode_id") => &mut form.episode_id,
                _ => continue,
            };
            let value = field
                .text()
                .await
                .map_err(|err| ApiError::BadRequest(err.body_text()))?;
            if slot.is_none() {
                *slot = Some(value);
            }
        }

        Ok(form)
    }
}

#[async_trait]
impl<S> FromRequest<S> for AppearanceForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(form) = Form::<AppearanceForm>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            Ok(form)
        } else if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            Self::from_multipart(multipart).await
        } else {
            Ok(Self::default())
        }
    }
}

/// POST /appearances
///
/// 201 with `{id, rating, guest_id, episode_id, episode, guest}` on success.
pub async fn create_appearance(
    State(state): State<AppState>,
    form: AppearanceForm,
) -> ApiResult<Response> {
    let appearance = form.validate()?;
    let record = appearances::create(&state.db, &appearance).await?;

    Ok((StatusCode::CREATED, Json(appearance_view(&record, None))).into_response())
}
