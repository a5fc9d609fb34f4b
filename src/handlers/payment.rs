use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::dtos::payment::{CreatePaymentRequest, PaymentQuery, PaymentResponse};
use crate::error::{map_unique_violation, AppError};
use crate::ledger::payment_method::transaction_id;
use crate::ledger::rates::positive_cents;
use crate::ledger::{LedgerError, Role};
use crate::middleware::auth::AuthContext;
use crate::models::payment::{Payment, PAYMENT_COLUMNS};
use crate::state::AppState;

pub async fn load_payments(db_pool: &PgPool, buyer_id: Option<i64>) -> Result<Vec<Payment>, AppError> {
    let payments = sqlx::query_as::<_, Payment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments
         WHERE ($1::BIGINT IS NULL OR buyer_id = $1)
         ORDER BY payment_date DESC, id DESC"
    ))
    .bind(buyer_id)
    .fetch_all(db_pool)
    .await?;
    Ok(payments)
}

/// Buyers pay for themselves; admins record a payment for a named buyer.
fn payer(auth: &AuthContext, requested: Option<i64>) -> Result<i64, AppError> {
    match auth.role {
        Role::Buyer => match requested {
            Some(id) if id != auth.user_id => {
                Err(AppError::forbidden("You can only pay your own dues"))
            }
            _ => Ok(auth.user_id),
        },
        Role::Admin => requested.ok_or_else(|| AppError::validation("buyer_id is required")),
        Role::Milkman => Err(AppError::forbidden("Milkmen do not make payments")),
    }
}

/// Payments above the current due are accepted; the surplus shows up as a
/// negative due (credit).
#[instrument(skip(db_pool, auth, req), fields(user = auth.user_id, amount = req.amount))]
pub async fn create_payment(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    let buyer_id = payer(&auth, req.buyer_id)?;

    let amount = positive_cents(req.amount).ok_or(LedgerError::InvalidAmount)?;
    req.details.validate()?;

    let is_buyer = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1 AND role = 'buyer')"
    )
    .bind(buyer_id)
    .fetch_one(&db_pool)
    .await?;
    if !is_buyer {
        return Err(AppError::not_found("Buyer not found"));
    }

    let payment = sqlx::query_as::<_, Payment>(&format!(
        "INSERT INTO payments (buyer_id, amount, method, transaction_id, payment_date)
         VALUES ($1, $2::FLOAT8, $3, $4, $5)
         RETURNING {PAYMENT_COLUMNS}"
    ))
    .bind(buyer_id)
    .bind(amount)
    .bind(req.details.method_name())
    .bind(transaction_id())
    .bind(req.payment_date.unwrap_or_else(|| Utc::now().date_naive()))
    .fetch_one(&db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Duplicate transaction id, retry the payment"))?;

    info!(payment_id = payment.id, buyer_id, transaction_id = %payment.transaction_id, "Buyer payment recorded");
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

pub async fn list_payments(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<PaymentQuery>,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    let buyer_id = if auth.is_admin() {
        query.buyer_id
    } else {
        auth.require_role(Role::Buyer, "view payments")?;
        Some(payer(&auth, query.buyer_id)?)
    };

    let payments = load_payments(&db_pool, buyer_id).await?;
    Ok(Json(payments.into_iter().map(PaymentResponse::from).collect()))
}
