use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ListingDraft, UserId};
use super::gateway::{GatewayError, ListingGateway};

#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    pub draft: ListingDraft,
    #[serde(default)]
    pub acting_user_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteTaskRequest {
    pub task: String,
}

/// Router exposing a gateway as the HTTP listing backend.
pub fn listing_router<G>(gateway: Arc<G>) -> Router
where
    G: ListingGateway + 'static,
{
    Router::new()
        .route("/api/v1/listings", post(create_handler::<G>))
        .route(
            "/api/v1/users/:user_id/tasks",
            post(complete_task_handler::<G>),
        )
        .with_state(gateway)
}

pub(crate) async fn create_handler<G>(
    State(gateway): State<Arc<G>>,
    axum::Json(request): axum::Json<CreateListingRequest>,
) -> Response
where
    G: ListingGateway + 'static,
{
    let CreateListingRequest {
        draft,
        acting_user_id,
    } = request;

    if draft.name.trim().is_empty() {
        let payload = json!({ "error": "listing name must not be empty" });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    match gateway.create_listing(draft, acting_user_id.as_ref()).await {
        Ok(listing) => (StatusCode::CREATED, axum::Json(listing)).into_response(),
        Err(err) => gateway_error_response(err),
    }
}

pub(crate) async fn complete_task_handler<G>(
    State(gateway): State<Arc<G>>,
    Path(user_id): Path<String>,
    axum::Json(request): axum::Json<CompleteTaskRequest>,
) -> Response
where
    G: ListingGateway + 'static,
{
    let user_id = UserId(user_id);
    match gateway.mark_task_completed(&user_id, &request.task).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => gateway_error_response(err),
    }
}

fn gateway_error_response(err: GatewayError) -> Response {
    let status = match err {
        GatewayError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GatewayError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
