use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::ServerState;
use crate::{observability, rate_limit};
use common::types::Health;
use serde::Deserialize;
use service::pagination::Pagination;

pub mod analytics;
pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod chat;
pub mod disputes;
pub mod notifications;
pub mod payments;
pub mod referrals;
pub mod reviews;
pub mod subscriptions;
pub mod users;
pub mod vendors;

/// `?page=&per_page=` pair shared by the list endpoints.
#[derive(Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn into_pagination(self) -> Pagination {
        let d = Pagination::default();
        Pagination { page: self.page.unwrap_or(d.page), per_page: self.per_page.unwrap_or(d.per_page) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> (axum::http::StatusCode, String) {
    observability::encode_metrics()
}

/// Everything except health, metrics, docs, and the auth entry points sits
/// behind the bearer middleware.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login));

    let api = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/users/me", get(users::get_me).patch(users::update_me).delete(users::delete_me))
        .route("/users", get(users::list))
        .route("/vendors/apply", post(vendors::apply))
        .route("/vendors", get(vendors::list))
        .route("/vendors/me", get(vendors::get_me).patch(vendors::update_me))
        .route("/vendors/:id", get(vendors::get))
        .route("/vendors/:id/verify", post(vendors::verify))
        .route("/vendors/:id/suspend", post(vendors::suspend))
        .route("/vendors/:id/reviews", get(reviews::list_for_vendor))
        .route("/categories", get(catalog::list_categories).post(catalog::create_category))
        .route("/categories/:id", patch(catalog::update_category).delete(catalog::delete_category))
        .route("/services", get(catalog::search_listings).post(catalog::create_listing))
        .route(
            "/services/:id",
            get(catalog::get_listing).patch(catalog::update_listing).delete(catalog::delete_listing),
        )
        .route("/bookings", post(bookings::create).get(bookings::list))
        .route("/bookings/:id", get(bookings::get))
        .route("/bookings/:id/offers", post(bookings::counter_offer))
        .route("/bookings/:id/offers/accept", post(bookings::accept_offer))
        .route("/bookings/:id/offers/reject", post(bookings::reject_offer))
        .route("/bookings/:id/cancel", post(bookings::cancel))
        .route("/bookings/:id/complete", post(bookings::complete))
        .route("/bookings/:id/disputes", post(disputes::open))
        .route("/bookings/:id/reviews", post(reviews::create))
        .route("/payments/:id", get(payments::get))
        .route("/payments/:id/capture", post(payments::capture))
        .route("/wallets/me", get(payments::my_wallet))
        .route("/withdrawals", post(payments::request_withdrawal).get(payments::list_withdrawals))
        .route("/withdrawals/:id/approve", post(payments::approve_withdrawal))
        .route("/withdrawals/:id/reject", post(payments::reject_withdrawal))
        .route("/disputes", get(disputes::list))
        .route("/disputes/:id/review", post(disputes::review))
        .route("/disputes/:id/resolve", post(disputes::resolve))
        .route("/disputes/:id/close", post(disputes::close))
        .route("/reviews/:id", delete(reviews::delete))
        .route("/conversations", post(chat::open).get(chat::list))
        .route("/conversations/:id/messages", get(chat::list_messages).post(chat::send_message))
        .route("/conversations/:id/read", post(chat::mark_read))
        .route("/notifications", get(notifications::list))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .route("/referrals/me", get(referrals::me))
        .route("/subscriptions", post(subscriptions::subscribe))
        .route("/subscriptions/me", get(subscriptions::me))
        .route("/subscriptions/cancel", post(subscriptions::cancel))
        .route("/analytics/overview", get(analytics::overview))
        .route_layer(middleware::from_fn_with_state(state.clone(), crate::auth::require_bearer));

    public
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, rate_limit::limit))
        .layer(middleware::from_fn(observability::track))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
