use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

use server::auth::{ServerAuthConfig, ServerState};
use server::rate_limit::RateLimiter;
use server::routes;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect().await?;
    // Migrations may already be applied by a parallel test binary.
    if let Err(e) = migration::Migrator::up(&db, None).await {
        let msg = format!("{}", e);
        if msg.contains("duplicate key value violates unique constraint") {
            eprintln!("migrations already applied, continue: {}", msg);
        } else {
            return Err(e.into());
        }
    }
    let state = ServerState {
        db,
        auth: ServerAuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 1 },
        limiter: RateLimiter::new(1000, 1000, false),
    };
    Ok(routes::build_router(cors(), state))
}

async fn body_json(resp: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn post_json(uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;
    let resp = app.call(Request::builder().uri("/health").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn register_login_me_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "S3curePass!";

    let resp = app
        .call(post_json(
            "/api/v1/auth/register",
            &json!({"email": email, "name": "Tester", "password": password}),
        )?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await?;
    assert_eq!(body["success"], json!(true));
    assert!(body["data"]["referral_code"].as_str().is_some());

    let resp = app
        .call(post_json("/api/v1/auth/login", &json!({"email": email, "password": password}))?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await?;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let resp = app
        .call(
            Request::builder()
                .uri("/api/v1/auth/me")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await?;
    assert_eq!(body["data"]["email"], json!(email));
    assert_eq!(body["data"]["role"], json!("customer"));
    Ok(())
}

#[tokio::test]
async fn login_wrong_password_is_unauthorized_envelope() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let _ = app
        .call(post_json(
            "/api/v1/auth/register",
            &json!({"email": email, "name": "Tester", "password": "StrongPass123"}),
        )?)
        .await?;

    let resp = app
        .call(post_json("/api/v1/auth/login", &json!({"email": email, "password": "wrong"}))?)
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await?;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));
    Ok(())
}

#[tokio::test]
async fn register_short_password_rejected() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;

    let resp = app
        .call(post_json(
            "/api/v1/auth/register",
            &json!({"email": format!("a_{}@b.com", Uuid::new_v4()), "name": "A", "password": "short"}),
        )?)
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await?;
    assert_eq!(body["error"]["code"], json!("VALIDATION"));
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_bearer() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;
    let resp = app.call(Request::builder().uri("/api/v1/bookings").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn admin_endpoints_forbidden_for_customers() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "S3curePass!";
    app.call(post_json(
        "/api/v1/auth/register",
        &json!({"email": email, "name": "Plain", "password": password}),
    )?)
    .await?;
    let resp = app
        .call(post_json("/api/v1/auth/login", &json!({"email": email, "password": password}))?)
        .await?;
    let token = body_json(resp).await?["data"]["token"].as_str().unwrap().to_string();

    let resp = app
        .call(
            Request::builder()
                .uri("/api/v1/analytics/overview")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await?;
    assert_eq!(body["error"]["code"], json!("FORBIDDEN"));
    Ok(())
}

#[tokio::test]
async fn vendor_application_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let mut app = build_app().await?;

    let email = format!("vendor_{}@example.com", Uuid::new_v4());
    let password = "S3curePass!";
    app.call(post_json(
        "/api/v1/auth/register",
        &json!({"email": email, "name": "Seller", "password": password}),
    )?)
    .await?;
    let resp = app
        .call(post_json("/api/v1/auth/login", &json!({"email": email, "password": password}))?)
        .await?;
    let token = body_json(resp).await?["data"]["token"].as_str().unwrap().to_string();

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/vendors/apply")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(serde_json::to_vec(&json!({"display_name": "Acme Repairs", "bio": "fixes"}))?))?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await?;
    assert_eq!(body["data"]["status"], json!("pending"));

    // Applying twice conflicts.
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/vendors/apply")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(serde_json::to_vec(&json!({"display_name": "Acme Again"}))?))?;
    let resp = app.call(req).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    Ok(())
}
