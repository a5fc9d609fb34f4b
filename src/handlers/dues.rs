use std::collections::HashMap;

use axum::{extract::State, Extension, Json};

use crate::dtos::daily_record::DailyRecordQuery;
use crate::dtos::dues::{BuyerDueResponse, DuesOverview};
use crate::error::AppError;
use crate::handlers::daily_record::load_records;
use crate::handlers::payment::load_payments;
use crate::ledger::dues::{due_for, reconcile_dues, total_outstanding, DueSummary};
use crate::ledger::{RecordType, Role};
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

fn purchases_for(user_id: Option<i64>) -> DailyRecordQuery {
    DailyRecordQuery {
        user_id,
        record_type: Some(RecordType::Purchase),
        ..Default::default()
    }
}

pub async fn list_dues(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<DuesOverview>, AppError> {
    auth.require_role(Role::Admin, "view all dues")?;

    let records = load_records(&db_pool, &purchases_for(None)).await?;
    let payments = load_payments(&db_pool, None).await?;
    let dues = reconcile_dues(&records, &payments);

    let names: HashMap<i64, String> = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, username FROM profiles WHERE role = 'buyer'"
    )
    .fetch_all(&db_pool)
    .await?
    .into_iter()
    .collect();

    let total_outstanding = total_outstanding(&dues);
    let buyers = dues
        .into_iter()
        .map(|(buyer_id, summary)| BuyerDueResponse {
            buyer_id,
            buyer_name: names.get(&buyer_id).cloned().unwrap_or_default(),
            summary,
        })
        .collect();

    Ok(Json(DuesOverview { buyers, total_outstanding }))
}

pub async fn my_due(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<DueSummary>, AppError> {
    auth.require_role(Role::Buyer, "view their due")?;

    let records = load_records(&db_pool, &purchases_for(Some(auth.user_id))).await?;
    let payments = load_payments(&db_pool, Some(auth.user_id)).await?;

    Ok(Json(due_for(auth.user_id, &records, &payments)))
}
