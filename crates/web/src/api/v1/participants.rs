use axum::{
    extract::{OriginalUri, Path, State},
    http::Method,
    routing::{get, on},
    Json, Router,
};
use model::participant::ParticipantFeature;

use crate::{
    common::{
        route_not_found, schema, RouteErrorResponse, RouteResult,
        VecResponse, METHOD_FILTER_ALL,
    },
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<ParticipantFeature>))
        .route("/:device_id", get(get_participant))
        .route("/", get(get_participants))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_participants(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { tracking_client }): State<WebState>,
) -> RouteResult<Json<VecResponse<ParticipantFeature>>> {
    tracking_client
        .participants()
        .await
        .map(|participants| {
            VecResponse::new(participants.into_values().collect()).json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_participant(
    OriginalUri(original_uri): OriginalUri,
    Path(device_id): Path<String>,
    State(WebState { tracking_client }): State<WebState>,
) -> RouteResult<Json<ParticipantFeature>> {
    tracking_client
        .participant(&device_id)
        .await
        .map(Json)
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}
