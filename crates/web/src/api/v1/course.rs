use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracking::RequestError;
use utility::geo;

use crate::{
    common::{
        route_not_found, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL,
    },
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_course))
        .route("/convert", post(convert_course))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CourseStatus {
    loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    points: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    length_km: Option<f64>,
}

async fn get_course(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { tracking_client }): State<WebState>,
) -> RouteResult<Json<CourseStatus>> {
    match tracking_client.course().await {
        Ok(course) => {
            let path = geo::path_from_coordinates(course.coordinates());
            Ok(Json(CourseStatus {
                loaded: true,
                points: Some(course.points.len()),
                length_km: Some(geo::path_length_km(&path)),
            }))
        }
        Err(RequestError::CourseNotLoaded) => Ok(Json(CourseStatus {
            loaded: false,
            points: None,
            length_km: None,
        })),
        Err(why) => Err(RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConvertRequest {
    path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertedResponse {
    status: String,
    geojson_path: String,
}

/// Trigger fired after a GPX course file lands in the blob store.
async fn convert_course(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { tracking_client }): State<WebState>,
    Json(request): Json<ConvertRequest>,
) -> RouteResult<Json<ConvertedResponse>> {
    tracking_client
        .convert_course(&request.path)
        .await
        .map(|geojson_path| {
            log::info!("course converted to \"{}\"", geojson_path);
            Json(ConvertedResponse {
                status: "OK".to_owned(),
                geojson_path,
            })
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}
