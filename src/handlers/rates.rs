use axum::{extract::State, Extension, Json};
use sqlx::PgExecutor;
use tracing::{info, instrument};

use crate::dtos::rates::{RatesResponse, SetRatesRequest};
use crate::error::AppError;
use crate::ledger::rates::DairyRates;
use crate::ledger::Role;
use crate::middleware::auth::AuthContext;
use crate::models::rates::{RatesRow, RATES_COLUMNS};
use crate::state::AppState;

async fn fetch_rates_row<'e, E: PgExecutor<'e>>(executor: E, lock: bool) -> Result<RatesRow, AppError> {
    let lock_clause = if lock { " FOR SHARE" } else { "" };
    sqlx::query_as::<_, RatesRow>(&format!(
        "SELECT {RATES_COLUMNS} FROM dairy_rates WHERE id = 1{lock_clause}"
    ))
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::internal("Dairy rates have not been configured"))
}

/// Rates in force right now. Inside a transaction this holds a share lock
/// so a concurrent rate change waits until the caller's snapshot is written.
pub async fn current_rates<'e, E: PgExecutor<'e>>(executor: E) -> Result<DairyRates, AppError> {
    Ok(fetch_rates_row(executor, true).await?.rates()?)
}

pub async fn get_rates(
    State(AppState { db_pool, .. }): State<AppState>,
) -> Result<Json<RatesResponse>, AppError> {
    let row = fetch_rates_row(&db_pool, false).await?;
    Ok(Json(RatesResponse::from(row)))
}

#[instrument(skip(db_pool, auth), fields(admin = auth.user_id))]
pub async fn set_rates(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<SetRatesRequest>,
) -> Result<Json<RatesResponse>, AppError> {
    auth.require_role(Role::Admin, "set rates")?;
    let rates = DairyRates::new(payload.milkman_rate, payload.buyer_rate)?;

    let row = sqlx::query_as::<_, RatesRow>(&format!(
        "INSERT INTO dairy_rates (id, milkman_rate, buyer_rate, updated_at)
         VALUES (1, $1::FLOAT8, $2::FLOAT8, NOW())
         ON CONFLICT (id) DO UPDATE SET
            milkman_rate = EXCLUDED.milkman_rate,
            buyer_rate = EXCLUDED.buyer_rate,
            updated_at = EXCLUDED.updated_at
         RETURNING {RATES_COLUMNS}"
    ))
    .bind(rates.milkman_rate())
    .bind(rates.buyer_rate())
    .fetch_one(&db_pool)
    .await?;

    info!(milkman_rate = row.milkman_rate, buyer_rate = row.buyer_rate, "Dairy rates updated");
    Ok(Json(RatesResponse::from(row)))
}
