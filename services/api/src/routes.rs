use crate::infra::{AppState, HeadlessModalHost};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use listing_studio::error::AppError;
use listing_studio::workflows::listings::{
    listing_router, Listing, ListingGateway, ListingModalController, ModalContext, ModalIntent,
    ModalView, Session, TracingNotificationSink, User,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ModalSessionRequest {
    #[serde(default)]
    pub(crate) user: Option<User>,
    #[serde(default)]
    pub(crate) existing_listings: Vec<Listing>,
    pub(crate) intents: Vec<ModalIntent>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModalSessionResponse {
    pub(crate) view: ModalView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) listing: Option<Listing>,
}

pub(crate) fn with_service_routes<G>(gateway: Arc<G>) -> Router
where
    G: ListingGateway + 'static,
{
    listing_router(gateway.clone())
        .route(
            "/api/v1/listing-modal/session",
            post(modal_session_endpoint::<G>),
        )
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(gateway))
}

/// Replays a scripted modal session against the backend and returns the final view.
pub(crate) async fn modal_session_endpoint<G>(
    Extension(gateway): Extension<Arc<G>>,
    Json(request): Json<ModalSessionRequest>,
) -> Result<Json<ModalSessionResponse>, AppError>
where
    G: ListingGateway + 'static,
{
    let ModalSessionRequest {
        user,
        existing_listings,
        intents,
    } = request;

    let controller = ListingModalController::new(
        gateway,
        Arc::new(TracingNotificationSink),
        Arc::new(HeadlessModalHost),
        ModalContext::new(Session::from(user), existing_listings),
    );

    let mut listing = None;
    for intent in intents {
        if let Some(saved) = controller.dispatch(intent).await? {
            listing = Some(saved);
        }
    }

    Ok(Json(ModalSessionResponse {
        view: controller.view(),
        listing,
    }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
