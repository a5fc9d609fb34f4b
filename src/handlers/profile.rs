use axum::{extract::State, Extension, Json};
use tracing::instrument;

use crate::dtos::profile::{ProfileResponse, UpdateContactRequest};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::profile::{Profile, PROFILE_COLUMNS};
use crate::state::AppState;

pub async fn get_me(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = sqlx::query_as::<_, Profile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
    ))
    .bind(auth.user_id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Profile not found"))?;

    Ok(Json(ProfileResponse::from(profile)))
}

/// Only contact fields are editable; a milkman's row mirrors them.
#[instrument(skip(db_pool, auth), fields(user_id = auth.user_id))]
pub async fn update_me(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateContactRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut tx = db_pool.begin().await?;

    let profile = sqlx::query_as::<_, Profile>(&format!(
        "UPDATE profiles SET
         phone = COALESCE($1, phone),
         location = COALESCE($2, location)
         WHERE id = $3
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(&payload.phone)
    .bind(&payload.location)
    .bind(auth.user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::not_found("Profile not found"))?;

    sqlx::query(
        "UPDATE milkmen SET
         phone = COALESCE($1, phone),
         location = COALESCE($2, location)
         WHERE id = $3"
    )
    .bind(&payload.phone)
    .bind(&payload.location)
    .bind(auth.user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Json(ProfileResponse::from(profile)))
}
