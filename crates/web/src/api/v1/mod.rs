use axum::{routing::on, Router};

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    WebState,
};

mod course;
mod leaderboard;
mod participants;
mod reports;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .nest_service("/reports", reports::routes(state.clone()))
        .nest_service("/leaderboard", leaderboard::routes(state.clone()))
        .nest_service("/participants", participants::routes(state.clone()))
        .nest_service("/course", course::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}
