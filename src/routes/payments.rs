use axum::{Router, routing::get};
use crate::state::AppState;
use crate::handlers::payment::{create_payment, list_payments};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
}
