use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on, post},
    Json, Router,
};
use model::leaderboard::{LeaderboardEntry, RankingOrder};
use serde::Deserialize;

use crate::{
    common::{
        route_not_found, schema, RouteErrorResponse, RouteResult,
        StatusResponse, VecResponse, METHOD_FILTER_ALL,
    },
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<LeaderboardEntry>))
        .route("/", get(get_leaderboard))
        .route("/refresh", post(refresh_leaderboard))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    order: Option<RankingOrder>,
}

async fn get_leaderboard(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { tracking_client }): State<WebState>,
    Query(params): Query<LeaderboardQuery>,
) -> RouteResult<Json<VecResponse<LeaderboardEntry>>> {
    tracking_client
        .leaderboard(params.order)
        .await
        .map(|entries| VecResponse::new(entries).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    course_path: String,
    #[serde(default)]
    force: bool,
}

async fn refresh_leaderboard(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { tracking_client }): State<WebState>,
    Json(request): Json<RefreshRequest>,
) -> RouteResult<Json<StatusResponse>> {
    tracking_client
        .refresh_leaderboard(&request.course_path, request.force)
        .await
        .map(|ranked| {
            log::info!("leaderboard refreshed with {} entries", ranked);
            StatusResponse::ok()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}
