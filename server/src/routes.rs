use axum::{
    extract::{Query, WebSocketUpgrade},
    response::Html,
    routing::get,
    Json, Router,
};
use devtrack_shared::{AttendanceParams, GpsParams};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{events, handlers, state::AppState};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Decoded query in order of appearance; duplicate keys are kept.
type QueryPairs = Vec<(String, String)>;

fn line(message: String) -> String {
    message + "\n"
}

pub fn router(state: &'static AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Html(INDEX_HTML) }))
        .route(
            "/update",
            get(move |Query(pairs): Query<QueryPairs>| async move {
                let params: AttendanceParams = pairs.into_iter().collect();
                handlers::handle_attendance(state, &params.id, &params.value).map(line)
            }),
        )
        .route(
            "/gps",
            get(move |Query(pairs): Query<QueryPairs>| async move {
                let params: GpsParams = pairs.into_iter().collect();
                handlers::handle_location(state, &params.id, &params.lat, &params.lon).map(line)
            }),
        )
        .route(
            "/events",
            get(move |req: WebSocketUpgrade| async move {
                let subscription = state.broker.subscribe();
                req.on_upgrade(|ws| events::accept_and_log(ws, subscription))
            }),
        )
        .route(
            "/devices",
            get(move || async move { Json(state.store.attendance_snapshot()) }),
        )
        .route(
            "/locations",
            get(move || async move { Json(state.store.location_snapshot()) }),
        )
        .route(
            "/status",
            get(move || async move {
                Json(json!({
                    "devices": state.store.device_count(),
                    "locations": state.store.location_count(),
                    "listeners": state.broker.subscriber_count().await,
                }))
            }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}
