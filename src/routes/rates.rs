use axum::{Router, routing::get};
use crate::state::AppState;
use crate::handlers::rates::{get_rates, set_rates};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/rates", get(get_rates).put(set_rates))
}
