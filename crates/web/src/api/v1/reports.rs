use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on, post},
    Json, Router,
};
use model::report::RawReport;

use crate::{
    common::{
        route_not_found, schema_no_example, RouteErrorResponse, RouteResult,
        StatusResponse, METHOD_FILTER_ALL,
    },
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema_no_example::<RawReport>))
        .route("/", post(submit_report))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn submit_report(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { tracking_client }): State<WebState>,
    Json(report): Json<RawReport>,
) -> RouteResult<Json<StatusResponse>> {
    log::info!("report from {:?}", report.device_id);

    tracking_client
        .submit_report(report)
        .await
        .map(|_| StatusResponse::ok())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}
