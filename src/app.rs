use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

pub const BASE_PATH: &str = "/dairy";

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.and_then(|o| o.parse::<HeaderValue>().ok()) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

pub fn build_app(state: AppState) -> Router {
    let api = routes::create_router(&state)
        .route("/", get(|| async { "Dairy Desk API" }))
        .route("/health", get(health_check));

    Router::new()
        .nest(BASE_PATH, api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(state.config.cors_origin.as_deref()))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::sign_token;
    use crate::config::Config;
    use crate::ledger::Role;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret-0123";

    // The pool never connects; every request here is answered before a query runs.
    fn test_app() -> Router {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://localhost:1/unused".to_string()),
            "JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .unwrap();
        let pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
        build_app(AppState::new(pool, config))
    }

    fn bearer(role: Role) -> String {
        format!("Bearer {}", sign_token(1, role, "tester", SECRET).unwrap())
    }

    fn json_request(method: Method, uri: &str, auth: Option<String>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn error_of(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["error"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn health_is_open() {
        let response = test_app()
            .oneshot(Request::get("/dairy/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let response = test_app()
            .oneshot(Request::get("/dairy/rates").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_of(response).await, "Missing Authorization header");
    }

    #[tokio::test]
    async fn forged_tokens_are_rejected() {
        let forged = format!("Bearer {}", sign_token(1, Role::Admin, "x", "some-other-secret-value").unwrap());
        let response = test_app()
            .oneshot(
                Request::get("/dairy/dues")
                    .header(header::AUTHORIZATION, forged)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = test_app()
            .oneshot(
                Request::get("/dairy/dues")
                    .header(header::AUTHORIZATION, "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn only_admins_set_rates() {
        let body = serde_json::json!({ "milkman_rate": 50.0, "buyer_rate": 60.0 });
        let response = test_app()
            .oneshot(json_request(Method::PUT, "/dairy/rates", Some(bearer(Role::Buyer)), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(error_of(response).await, "Only admins can set rates");
    }

    #[tokio::test]
    async fn rates_must_keep_margin() {
        let body = serde_json::json!({ "milkman_rate": 60.0, "buyer_rate": 55.0 });
        let response = test_app()
            .oneshot(json_request(Method::PUT, "/dairy/rates", Some(bearer(Role::Admin)), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_of(response).await.contains("must be greater than milkman rate"));
    }

    #[tokio::test]
    async fn admin_cannot_self_register() {
        let body = serde_json::json!({
            "username": "root",
            "email": "root@dairy.in",
            "password": "password1",
            "role": "admin"
        });
        let response = test_app()
            .oneshot(json_request(Method::POST, "/dairy/auth/register", None, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(response).await, "Invalid role");
    }

    #[tokio::test]
    async fn milkmen_cannot_pay_buyer_dues() {
        let body = serde_json::json!({ "amount": 100.0, "method": "cash" });
        let response = test_app()
            .oneshot(json_request(Method::POST, "/dairy/payments", Some(bearer(Role::Milkman)), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn milkman_payment_rejects_bad_card_before_touching_ledger() {
        let body = serde_json::json!({
            "amount": 100.0,
            "method": "card",
            "card_number": "1234 5678 9012 3456",
            "expiry": "12/29",
            "cvv": "123"
        });
        let response = test_app()
            .oneshot(json_request(Method::POST, "/dairy/milkmen/7/payments", Some(bearer(Role::Admin)), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_of(response).await.contains("checksum"));
    }

    #[tokio::test]
    async fn buyer_payment_below_a_paisa_is_rejected() {
        let body = serde_json::json!({ "amount": 0.004, "method": "cash" });
        let response = test_app()
            .oneshot(json_request(Method::POST, "/dairy/payments", Some(bearer(Role::Buyer)), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(response).await, "Amount must be greater than 0");
    }

    #[tokio::test]
    async fn rates_equal_to_the_paisa_are_rejected() {
        let body = serde_json::json!({ "milkman_rate": 50.001, "buyer_rate": 50.004 });
        let response = test_app()
            .oneshot(json_request(Method::PUT, "/dairy/rates", Some(bearer(Role::Admin)), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(error_of(response).await.contains("must be greater than milkman rate"));
    }

    #[tokio::test]
    async fn only_admins_rate_milkmen_on_a_five_point_scale() {
        let body = serde_json::json!({ "rating": 4.5 });
        let response = test_app()
            .oneshot(json_request(Method::PATCH, "/dairy/milkmen/7/rating", Some(bearer(Role::Buyer)), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = serde_json::json!({ "rating": 6.0 });
        let response = test_app()
            .oneshot(json_request(Method::PATCH, "/dairy/milkmen/7/rating", Some(bearer(Role::Admin)), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_of(response).await, "Rating must be between 0 and 5");
    }
}
