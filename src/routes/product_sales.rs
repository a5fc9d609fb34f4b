use axum::{Router, routing::get};
use crate::state::AppState;
use crate::handlers::product_sale::{create_sale, list_sales};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/product-sales", get(list_sales).post(create_sale))
}
