use axum::{extract::State, Extension, Json};

use crate::dtos::daily_record::{DailyRecordQuery, DailyRecordResponse};
use crate::dtos::dashboard::{AdminDashboard, BuyerDashboard, MilkmanDashboard};
use crate::dtos::milkman::{MilkmanListQuery, MilkmanResponse};
use crate::error::AppError;
use crate::handlers::daily_record::load_records;
use crate::handlers::milkman::{fetch_milkman, load_milkman_payments, load_milkmen};
use crate::handlers::payment::load_payments;
use crate::handlers::product_sale::load_product_sales;
use crate::handlers::rates::current_rates;
use crate::ledger::milkman::MilkmanStatus;
use crate::ledger::summary::{AdminLedgers, AdminSummary, BuyerSummary, MilkmanSummary};
use crate::ledger::{RecordType, Role};
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

const RECENT: usize = 10;

pub async fn admin_dashboard(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<AdminDashboard>, AppError> {
    auth.require_role(Role::Admin, "view the admin dashboard")?;

    let records = load_records(&db_pool, &DailyRecordQuery::default()).await?;
    let payments = load_payments(&db_pool, None).await?;
    let milkman_payments = load_milkman_payments(&db_pool, None).await?;
    let product_sales = load_product_sales(&db_pool).await?;
    let milkmen = load_milkmen(&db_pool, &MilkmanListQuery { status: None }).await?;
    let rates = current_rates(&db_pool).await?;

    let summary = AdminSummary::compute(&AdminLedgers {
        records: &records,
        payments: &payments,
        milkman_payments: &milkman_payments,
        product_sales: &product_sales,
        milkmen: &milkmen,
    });

    let pending_milkmen = milkmen
        .into_iter()
        .filter(|m| m.status == MilkmanStatus::Pending)
        .map(MilkmanResponse::from)
        .collect();

    Ok(Json(AdminDashboard {
        summary,
        buyer_rate: rates.buyer_rate(),
        milkman_rate: rates.milkman_rate(),
        pending_milkmen,
    }))
}

pub async fn buyer_dashboard(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<BuyerDashboard>, AppError> {
    auth.require_role(Role::Buyer, "view the buyer dashboard")?;

    let records = load_records(&db_pool, &DailyRecordQuery {
        user_id: Some(auth.user_id),
        record_type: Some(RecordType::Purchase),
        ..Default::default()
    })
    .await?;
    let payments = load_payments(&db_pool, Some(auth.user_id)).await?;
    let rates = current_rates(&db_pool).await?;

    let summary = BuyerSummary::compute(auth.user_id, &records, &payments);

    Ok(Json(BuyerDashboard {
        summary,
        buyer_rate: rates.buyer_rate(),
        recent_purchases: records.into_iter().take(RECENT).map(DailyRecordResponse::from).collect(),
    }))
}

pub async fn milkman_dashboard(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<MilkmanDashboard>, AppError> {
    auth.require_role(Role::Milkman, "view the milkman dashboard")?;

    let milkman = fetch_milkman(&db_pool, auth.user_id, false).await?;
    let records = load_records(&db_pool, &DailyRecordQuery {
        user_id: Some(auth.user_id),
        record_type: Some(RecordType::Supply),
        ..Default::default()
    })
    .await?;
    let payouts = load_milkman_payments(&db_pool, Some(auth.user_id)).await?;
    let rates = current_rates(&db_pool).await?;

    let summary = MilkmanSummary::compute(&milkman, &records, &payouts);

    Ok(Json(MilkmanDashboard {
        profile: MilkmanResponse::from(milkman),
        summary,
        milkman_rate: rates.milkman_rate(),
        recent_deliveries: records.into_iter().take(RECENT).map(DailyRecordResponse::from).collect(),
    }))
}
