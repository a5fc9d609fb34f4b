use axum::{Router, routing::post};
use crate::state::AppState;
use crate::handlers::auth::{register, login};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}
