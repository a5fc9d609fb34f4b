use axum::{Router, routing::get};
use crate::state::AppState;
use crate::handlers::dues::{list_dues, my_due};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dues", get(list_dues))
        .route("/dues/me", get(my_due))
}
