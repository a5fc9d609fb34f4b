use axum::{Router, routing::get};
use crate::state::AppState;
use crate::handlers::dashboard::{admin_dashboard, buyer_dashboard, milkman_dashboard};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/admin", get(admin_dashboard))
        .route("/dashboard/buyer", get(buyer_dashboard))
        .route("/dashboard/milkman", get(milkman_dashboard))
}
