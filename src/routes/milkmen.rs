use axum::{
    routing::{get, patch},
    Router,
};
use crate::state::AppState;
use crate::handlers::milkman;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/milkmen", get(milkman::list_milkmen))
        .route("/milkmen/{id}", get(milkman::get_milkman))
        .route("/milkmen/{id}/approve", patch(milkman::approve_milkman))
        .route("/milkmen/{id}/reject", patch(milkman::reject_milkman))
        .route("/milkmen/{id}/rating", patch(milkman::rate_milkman))
        .route("/milkmen/{id}/availability", patch(milkman::set_availability))
        .route("/milkmen/{id}/bank", patch(milkman::set_bank_details))
        .route(
            "/milkmen/{id}/payments",
            get(milkman::list_milkman_payments).post(milkman::pay_milkman),
        )
}
