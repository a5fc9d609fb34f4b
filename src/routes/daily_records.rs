use axum::{Router, routing::get};
use crate::state::AppState;
use crate::handlers::daily_record::{create_record, list_records};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/daily-records", get(list_records).post(create_record))
}
