use axum::{Router, routing::get};
use crate::state::AppState;
use crate::handlers::product::{get_products, get_product, create_product, update_product, delete_product};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(get_products).post(create_product))
        .route("/products/{id}", get(get_product).put(update_product).delete(delete_product))
}
