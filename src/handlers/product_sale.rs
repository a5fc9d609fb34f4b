use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::dtos::product::{CreateProductSaleRequest, ProductSaleResponse};
use crate::error::AppError;
use crate::ledger::rates::PricedEntry;
use crate::ledger::{round_money, Role};
use crate::middleware::auth::AuthContext;
use crate::models::product::{Product, ProductSale, PRODUCT_COLUMNS, PRODUCT_SALE_COLUMNS};
use crate::state::AppState;

pub async fn load_product_sales(db_pool: &PgPool) -> Result<Vec<ProductSale>, AppError> {
    let sales = sqlx::query_as::<_, ProductSale>(&format!(
        "SELECT {PRODUCT_SALE_COLUMNS} FROM product_sales ORDER BY sale_date DESC, id DESC"
    ))
    .fetch_all(db_pool)
    .await?;
    Ok(sales)
}

/// Price is copied from the catalog at sale time; stock is decremented under
/// a row lock so two sales cannot oversell.
#[instrument(skip(db_pool, auth), fields(admin = auth.user_id))]
pub async fn create_sale(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProductSaleRequest>,
) -> Result<(StatusCode, Json<ProductSaleResponse>), AppError> {
    auth.require_role(Role::Admin, "record product sales")?;

    let mut tx = db_pool.begin().await?;

    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
    ))
    .bind(req.product_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    let priced = PricedEntry::price(req.quantity, product.price)?;
    if priced.quantity > product.stock {
        return Err(AppError::validation(format!(
            "Insufficient stock for '{}'. Need {}, have {}",
            product.name, priced.quantity, product.stock
        )));
    }

    if let Some(buyer_id) = req.buyer_id {
        let is_buyer = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE id = $1 AND role = 'buyer')"
        )
        .bind(buyer_id)
        .fetch_one(&mut *tx)
        .await?;
        if !is_buyer {
            return Err(AppError::not_found("Buyer not found"));
        }
    }

    sqlx::query("UPDATE products SET stock = $1::FLOAT8 WHERE id = $2")
        .bind(round_money(product.stock - priced.quantity))
        .bind(product.id)
        .execute(&mut *tx)
        .await?;

    let sale = sqlx::query_as::<_, ProductSale>(&format!(
        "INSERT INTO product_sales (product_id, product_name, buyer_id, quantity, price, amount, sale_date)
         VALUES ($1, $2, $3, $4::FLOAT8, $5::FLOAT8, $6::FLOAT8, $7)
         RETURNING {PRODUCT_SALE_COLUMNS}"
    ))
    .bind(product.id)
    .bind(&product.name)
    .bind(req.buyer_id)
    .bind(priced.quantity)
    .bind(priced.rate)
    .bind(priced.amount)
    .bind(req.sale_date.unwrap_or_else(|| Utc::now().date_naive()))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(sale_id = sale.id, product_id = sale.product_id, amount = sale.amount, "Product sale recorded");

    Ok((StatusCode::CREATED, Json(ProductSaleResponse::from(sale))))
}

pub async fn list_sales(
    State(AppState { db_pool, .. }): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<ProductSaleResponse>>, AppError> {
    auth.require_role(Role::Admin, "view product sales")?;
    let sales = load_product_sales(&db_pool).await?;
    Ok(Json(sales.into_iter().map(ProductSaleResponse::from).collect()))
}
