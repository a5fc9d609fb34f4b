use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::dtos::daily_record::{CreateDailyRecordRequest, DailyRecordQuery, DailyRecordResponse};
use crate::error::AppError;
use crate::handlers::milkman::fetch_milkman;
use crate::handlers::rates::current_rates;
use crate::ledger::milkman::accrue_supply;
use crate::ledger::rates::PricedEntry;
use crate::ledger::{RecordType, Role};
use crate::middleware::auth::AuthContext;
use crate::models::daily_record::{DailyRecord, DAILY_RECORD_COLUMNS};
use crate::models::profile::{Profile, PROFILE_COLUMNS};
use crate::state::AppState;

fn check_date_range(filter: &DailyRecordQuery) -> Result<(), AppError> {
    match (filter.from, filter.to) {
        (Some(from), Some(to)) if from > to => {
            Err(AppError::validation("'from' must not be after 'to'"))
        }
        _ => Ok(()),
    }
}

pub async fn load_records(db_pool: &PgPool, filter: &DailyRecordQuery) -> Result<Vec<DailyRecord>, AppError> {
    check_date_range(filter)?;

    let records = sqlx::query_as::<_, DailyRecord>(&format!(
        "SELECT {DAILY_RECORD_COLUMNS} FROM daily_records
         WHERE ($1::BIGINT IS NULL OR user_id = $1)
           AND ($2::TEXT IS NULL OR record_type = $2)
           AND ($3::DATE IS NULL OR record_date >= $3)
           AND ($4::DATE IS NULL OR record_date <= $4)
         ORDER BY record_date DESC, id DESC"
    ))
    .bind(filter.user_id)
    .bind(filter.record_type.map(|t| t.as_str()))
    .bind(filter.from)
    .bind(filter.to)
    .fetch_all(db_pool)
    .await?;
    Ok(records)
}

/// The rate is read inside the insert's transaction and stored on the row,
/// so the amount is fixed at write time. A supply also raises the milkman's
/// cached due in the same transaction.
#[instrument(skip(db_pool, auth), fields(admin = auth.user_id))]
pub async fn create_record(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateDailyRecordRequest>,
) -> Result<(StatusCode, Json<DailyRecordResponse>), AppError> {
    auth.require_role(Role::Admin, "create daily records")?;

    let mut tx = db_pool.begin().await?;

    let user = sqlx::query_as::<_, Profile>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
    ))
    .bind(req.user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    let record_type = RecordType::for_role(user.role)?;

    let milkman = match record_type {
        RecordType::Supply => {
            let milkman = fetch_milkman(&mut *tx, user.id, true).await?;
            milkman.status.ensure_approved()?;
            Some(milkman)
        }
        RecordType::Purchase => None,
    };

    let rates = current_rates(&mut *tx).await?;
    let priced = PricedEntry::for_record(req.quantity, &rates, record_type)?;

    let record = sqlx::query_as::<_, DailyRecord>(&format!(
        "INSERT INTO daily_records
            (user_id, user_name, user_role, record_date, quantity, rate, amount, record_type)
         VALUES ($1, $2, $3, $4, $5::FLOAT8, $6::FLOAT8, $7::FLOAT8, $8)
         RETURNING {DAILY_RECORD_COLUMNS}"
    ))
    .bind(user.id)
    .bind(&user.username)
    .bind(user.role.as_str())
    .bind(req.record_date.unwrap_or_else(|| Utc::now().date_naive()))
    .bind(priced.quantity)
    .bind(priced.rate)
    .bind(priced.amount)
    .bind(record_type.as_str())
    .fetch_one(&mut *tx)
    .await?;

    if let Some(milkman) = milkman {
        sqlx::query("UPDATE milkmen SET total_due = $1::FLOAT8 WHERE id = $2")
            .bind(accrue_supply(milkman.total_due, record.amount))
            .bind(milkman.id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!(record_id = record.id, user_id = record.user_id, %record_type, amount = record.amount, "Daily record created");

    Ok((StatusCode::CREATED, Json(DailyRecordResponse::from(record))))
}

/// Admins may filter by any user; everyone else is pinned to their own rows.
pub async fn list_records(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(mut filter): Query<DailyRecordQuery>,
) -> Result<Json<Vec<DailyRecordResponse>>, AppError> {
    if !auth.is_admin() {
        if let Some(user_id) = filter.user_id {
            auth.require_self_or_admin(user_id)?;
        }
        filter.user_id = Some(auth.user_id);
    }

    let records = load_records(&db_pool, &filter).await?;
    Ok(Json(records.into_iter().map(DailyRecordResponse::from).collect()))
}
