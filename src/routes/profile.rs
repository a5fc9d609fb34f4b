use axum::{Router, routing::get};
use crate::state::AppState;
use crate::handlers::profile::{get_me, update_me};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile/me", get(get_me).patch(update_me))
}
