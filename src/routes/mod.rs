pub mod auth;
pub mod daily_records;
pub mod dashboard;
pub mod dues;
pub mod milkmen;
pub mod payments;
pub mod product_sales;
pub mod products;
pub mod profile;
pub mod rates;

use axum::{middleware, Router};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn create_router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(profile::routes())
        .merge(rates::routes())
        .merge(milkmen::routes())
        .merge(daily_records::routes())
        .merge(payments::routes())
        .merge(dues::routes())
        .merge(products::routes())
        .merge(product_sales::routes())
        .merge(dashboard::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(auth::routes())
        .merge(protected)
}
