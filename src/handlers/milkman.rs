use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sqlx::{PgExecutor, PgPool};
use tracing::{info, instrument};

use crate::dtos::milkman::{
    AvailabilityRequest, BankDetailsRequest, MilkmanListQuery, MilkmanPaymentResponse,
    MilkmanResponse, PayMilkmanRequest, PayMilkmanResponse, RatingRequest,
};
use crate::error::{map_unique_violation, AppError};
use crate::ledger::milkman::{apply_payment, validate_rating, MilkmanAction, Transition};
use crate::ledger::payment_method::transaction_id;
use crate::ledger::{round_money, Role};
use crate::middleware::auth::AuthContext;
use crate::models::milkman::{Milkman, MILKMAN_COLUMNS};
use crate::models::payment::{MilkmanPayment, MILKMAN_PAYMENT_COLUMNS};
use crate::state::AppState;

/// `for_update` locks the row until the surrounding transaction ends.
pub async fn fetch_milkman<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    for_update: bool,
) -> Result<Milkman, AppError> {
    let lock_clause = if for_update { " FOR UPDATE" } else { "" };
    sqlx::query_as::<_, Milkman>(&format!(
        "SELECT {MILKMAN_COLUMNS} FROM milkmen WHERE id = $1{lock_clause}"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::not_found("Milkman not found"))
}

pub async fn load_milkmen(db_pool: &PgPool, query: &MilkmanListQuery) -> Result<Vec<Milkman>, AppError> {
    let milkmen = sqlx::query_as::<_, Milkman>(&format!(
        "SELECT {MILKMAN_COLUMNS} FROM milkmen
         WHERE ($1::TEXT IS NULL OR status = $1)
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(query.status.map(|s| s.as_str()))
    .fetch_all(db_pool)
    .await?;
    Ok(milkmen)
}

pub async fn load_milkman_payments(
    db_pool: &PgPool,
    milkman_id: Option<i64>,
) -> Result<Vec<MilkmanPayment>, AppError> {
    let payments = sqlx::query_as::<_, MilkmanPayment>(&format!(
        "SELECT {MILKMAN_PAYMENT_COLUMNS} FROM milkman_payments
         WHERE ($1::BIGINT IS NULL OR milkman_id = $1)
         ORDER BY payment_date DESC, id DESC"
    ))
    .bind(milkman_id)
    .fetch_all(db_pool)
    .await?;
    Ok(payments)
}

pub async fn list_milkmen(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<MilkmanListQuery>,
) -> Result<Json<Vec<MilkmanResponse>>, AppError> {
    auth.require_role(Role::Admin, "list milkmen")?;
    let milkmen = load_milkmen(&db_pool, &query).await?;
    Ok(Json(milkmen.into_iter().map(MilkmanResponse::from).collect()))
}

pub async fn get_milkman(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<MilkmanResponse>, AppError> {
    auth.require_self_or_admin(id)?;
    let milkman = fetch_milkman(&db_pool, id, false).await?;
    Ok(Json(MilkmanResponse::from(milkman)))
}

async fn decide(db_pool: &PgPool, id: i64, action: MilkmanAction) -> Result<Milkman, AppError> {
    let mut tx = db_pool.begin().await?;
    let milkman = fetch_milkman(&mut *tx, id, true).await?;

    let milkman = match milkman.status.transition(action) {
        Transition::Unchanged => milkman,
        Transition::Changed(status) => {
            let updated = sqlx::query_as::<_, Milkman>(&format!(
                "UPDATE milkmen SET status = $1 WHERE id = $2 RETURNING {MILKMAN_COLUMNS}"
            ))
            .bind(status.as_str())
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
            info!(milkman_id = id, from = %milkman.status, to = %status, "Milkman status changed");
            updated
        }
    };

    tx.commit().await?;
    Ok(milkman)
}

#[instrument(skip(db_pool, auth), fields(admin = auth.user_id))]
pub async fn approve_milkman(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<MilkmanResponse>, AppError> {
    auth.require_role(Role::Admin, "approve milkmen")?;
    let milkman = decide(&db_pool, id, MilkmanAction::Approve).await?;
    Ok(Json(MilkmanResponse::from(milkman)))
}

#[instrument(skip(db_pool, auth), fields(admin = auth.user_id))]
pub async fn reject_milkman(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<MilkmanResponse>, AppError> {
    auth.require_role(Role::Admin, "reject milkmen")?;
    let milkman = decide(&db_pool, id, MilkmanAction::Reject).await?;
    Ok(Json(MilkmanResponse::from(milkman)))
}

#[instrument(skip(db_pool, auth), fields(admin = auth.user_id))]
pub async fn rate_milkman(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<RatingRequest>,
) -> Result<Json<MilkmanResponse>, AppError> {
    auth.require_role(Role::Admin, "rate milkmen")?;
    let rating = validate_rating(req.rating)?;

    let milkman = sqlx::query_as::<_, Milkman>(&format!(
        "UPDATE milkmen SET rating = $1::FLOAT8 WHERE id = $2 RETURNING {MILKMAN_COLUMNS}"
    ))
    .bind(rating)
    .bind(id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Milkman not found"))?;

    info!(milkman_id = id, rating, "Milkman rated");
    Ok(Json(MilkmanResponse::from(milkman)))
}

pub async fn set_availability(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<AvailabilityRequest>,
) -> Result<Json<MilkmanResponse>, AppError> {
    if auth.user_id != id {
        return Err(AppError::forbidden("You can only change your own availability"));
    }

    let milkman = sqlx::query_as::<_, Milkman>(&format!(
        "UPDATE milkmen SET available = $1 WHERE id = $2 RETURNING {MILKMAN_COLUMNS}"
    ))
    .bind(req.available)
    .bind(id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Milkman not found"))?;

    Ok(Json(MilkmanResponse::from(milkman)))
}

fn validate_bank_details(req: &BankDetailsRequest) -> Result<(), AppError> {
    let account = req.account_number.trim();
    if !(9..=18).contains(&account.len()) || !account.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation("Account number must be 9 to 18 digits"));
    }
    // IFSC: four letters, a zero, six alphanumerics
    let ifsc = req.ifsc_code.trim();
    let valid_ifsc = ifsc.is_ascii()
        && ifsc.len() == 11
        && ifsc[..4].chars().all(|c| c.is_ascii_uppercase())
        && ifsc.as_bytes()[4] == b'0'
        && ifsc[5..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    if !valid_ifsc {
        return Err(AppError::validation("Invalid IFSC code"));
    }
    Ok(())
}

pub async fn set_bank_details(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<BankDetailsRequest>,
) -> Result<Json<MilkmanResponse>, AppError> {
    if auth.user_id != id {
        return Err(AppError::forbidden("You can only change your own bank details"));
    }
    validate_bank_details(&req)?;

    let milkman = sqlx::query_as::<_, Milkman>(&format!(
        "UPDATE milkmen SET account_number = $1, ifsc_code = $2 WHERE id = $3 RETURNING {MILKMAN_COLUMNS}"
    ))
    .bind(req.account_number.trim())
    .bind(req.ifsc_code.trim())
    .bind(id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("Milkman not found"))?;

    Ok(Json(MilkmanResponse::from(milkman)))
}

/// Ledger row and due decrement commit together, under a row lock on the
/// milkman so concurrent payouts cannot both pass the due check.
#[instrument(skip(db_pool, auth, req), fields(admin = auth.user_id, amount = req.amount))]
pub async fn pay_milkman(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<PayMilkmanRequest>,
) -> Result<(StatusCode, Json<PayMilkmanResponse>), AppError> {
    auth.require_role(Role::Admin, "pay milkmen")?;
    req.details.validate()?;

    let mut tx = db_pool.begin().await?;

    let milkman = fetch_milkman(&mut *tx, id, true).await?;
    milkman.status.ensure_approved()?;
    let remaining_due = apply_payment(milkman.total_due, req.amount)?;

    let payment = sqlx::query_as::<_, MilkmanPayment>(&format!(
        "INSERT INTO milkman_payments (milkman_id, amount, method, transaction_id, payment_date)
         VALUES ($1, $2::FLOAT8, $3, $4, $5)
         RETURNING {MILKMAN_PAYMENT_COLUMNS}"
    ))
    .bind(id)
    .bind(round_money(req.amount))
    .bind(req.details.method_name())
    .bind(transaction_id())
    .bind(req.payment_date.unwrap_or_else(|| Utc::now().date_naive()))
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_unique_violation(e, "Duplicate transaction id, retry the payment"))?;

    sqlx::query("UPDATE milkmen SET total_due = $1::FLOAT8 WHERE id = $2")
        .bind(remaining_due)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!(milkman_id = id, transaction_id = %payment.transaction_id, remaining_due, "Milkman payment recorded");

    Ok((
        StatusCode::CREATED,
        Json(PayMilkmanResponse {
            payment: MilkmanPaymentResponse::from(payment),
            remaining_due,
        }),
    ))
}

pub async fn list_milkman_payments(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<MilkmanPaymentResponse>>, AppError> {
    auth.require_self_or_admin(id)?;
    let payments = load_milkman_payments(&db_pool, Some(id)).await?;
    Ok(Json(payments.into_iter().map(MilkmanPaymentResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(account: &str, ifsc: &str) -> BankDetailsRequest {
        BankDetailsRequest { account_number: account.into(), ifsc_code: ifsc.into() }
    }

    #[test]
    fn bank_details_are_checked() {
        assert!(validate_bank_details(&bank("123456789012", "SBIN0001234")).is_ok());
        assert!(validate_bank_details(&bank("12345", "SBIN0001234")).is_err());
        assert!(validate_bank_details(&bank("12345678901a", "SBIN0001234")).is_err());
        assert!(validate_bank_details(&bank("123456789012", "SBIN1001234")).is_err());
        assert!(validate_bank_details(&bank("123456789012", "sbin0001234")).is_err());
        assert!(validate_bank_details(&bank("123456789012", "SBIN000123")).is_err());
    }
}
