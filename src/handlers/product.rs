use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use crate::dtos::product::{CreateProductRequest, UpdateProductRequest, ProductResponse};
use crate::models::product::{Product, PRODUCT_COLUMNS};
use crate::middleware::auth::AuthContext;
use crate::ledger::rates::positive_cents;
use crate::ledger::{round_money, Role};
use crate::state::AppState;
use crate::error::{map_unique_violation, AppError};
use tracing::{error, info, instrument};

/// Price and stock rounded to the stored two decimals, then range-checked.
fn validate_price_and_stock(price: Option<f64>, stock: Option<f64>) -> Result<(Option<f64>, Option<f64>), AppError> {
    let price = price
        .map(|p| positive_cents(p).ok_or_else(|| AppError::validation("Price must be greater than 0")))
        .transpose()?;
    let stock = stock
        .map(|s| {
            if s.is_finite() && s >= 0.0 {
                Ok(round_money(s))
            } else {
                Err(AppError::validation("Stock cannot be negative"))
            }
        })
        .transpose()?;
    Ok((price, stock))
}

#[instrument(skip(state))]
pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    match sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
    ))
        .fetch_all(&state.db_pool)
        .await {
        Ok(products) => {
            let response = products.into_iter().map(ProductResponse::from).collect();
            Ok(Json(response))
        }
        Err(e) => {
            error!(?e, "Failed to fetch products");
            Err(e.into())
        }
    }
}

#[instrument(skip(state))]
pub async fn get_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
        .bind(id)
        .fetch_optional(&state.db_pool)
        .await?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

#[instrument(skip(state, auth, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    auth.require_role(Role::Admin, "manage products")?;
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Product name required"));
    }
    let (price, stock) = validate_price_and_stock(Some(payload.price), Some(payload.stock))?;

    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (name, price, stock, unit)
         VALUES ($1, $2::FLOAT8, $3::FLOAT8, $4) RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(payload.name.trim())
    .bind(price)
    .bind(stock)
    .bind(payload.unit.as_deref().unwrap_or("unit"))
    .fetch_one(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Product name already exists"))?;

    info!(product_id = product.id, "Product created");
    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

#[instrument(skip(state, auth, payload))]
pub async fn update_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    auth.require_role(Role::Admin, "manage products")?;
    let (price, stock) = validate_price_and_stock(payload.price, payload.stock)?;

    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products SET
         name = COALESCE($1, name),
         price = COALESCE($2::FLOAT8, price),
         stock = COALESCE($3::FLOAT8, stock),
         unit = COALESCE($4, unit)
         WHERE id = $5 RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(payload.name)
    .bind(price)
    .bind(stock)
    .bind(payload.unit)
    .bind(id)
    .fetch_optional(&state.db_pool)
    .await
    .map_err(|e| map_unique_violation(e, "Product name already exists"))?
    .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

#[instrument(skip(state, auth))]
pub async fn delete_product(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    auth.require_role(Role::Admin, "manage products")?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db_pool)
        .await
        .map_err(|e| match e {
            // sales keep referencing the product
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
                AppError::conflict("Product has sales and cannot be deleted")
            }
            other => other.into(),
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_and_stock_bounds() {
        assert_eq!(validate_price_and_stock(Some(120.0), Some(0.0)).unwrap(), (Some(120.0), Some(0.0)));
        assert_eq!(validate_price_and_stock(None, None).unwrap(), (None, None));
        assert!(validate_price_and_stock(Some(0.0), None).is_err());
        assert!(validate_price_and_stock(None, Some(-1.0)).is_err());
    }

    #[test]
    fn price_and_stock_are_rounded_before_checks() {
        assert!(validate_price_and_stock(Some(0.004), None).is_err());
        assert_eq!(validate_price_and_stock(Some(45.678), Some(10.005_1)).unwrap(), (Some(45.68), Some(10.01)));
    }
}
