use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get};
use serde::Serialize;

use crate::error::CollectError;
use crate::metric::Metric;
use crate::system::collector::Collector;
use crate::system::snapshot::Snapshot;

const DATA_ROUTES: [(&str, Metric); 9] = [
    ("/api/hostname", Metric::Hostname),
    ("/api/ip", Metric::Ip),
    ("/api/cpu", Metric::Cpu),
    ("/api/mem", Metric::Mem),
    ("/api/disk", Metric::Disk),
    ("/api/processes", Metric::Top),
    ("/api/logged_on", Metric::LoggedOn),
    ("/api/users", Metric::Passwd),
    ("/api/network", Metric::Network),
];

#[derive(Clone)]
struct AppState {
    collector: Arc<Collector>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct DebugView {
    metric: String,
    data: Option<Snapshot>,
    error: Option<String>,
}

pub fn router(collector: Arc<Collector>, debug_routes: bool) -> Router {
    let mut router = Router::new();
    for (path, metric) in DATA_ROUTES {
        router = router.route(path, data_route(metric));
    }
    if debug_routes {
        router = router.route("/api/debug/{metric}", get(debug_handler));
    }
    router
        .fallback(not_found)
        .with_state(AppState { collector })
}

fn data_route(metric: Metric) -> MethodRouter<AppState> {
    get(move |State(state): State<AppState>| async move {
        match collect(&state, metric).await {
            Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
            Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &err),
        }
    })
}

async fn debug_handler(State(state): State<AppState>, Path(key): Path<String>) -> Json<DebugView> {
    let result = match key.parse::<Metric>() {
        Ok(metric) => collect(&state, metric).await,
        Err(err) => Err(err),
    };
    let (data, error) = match result {
        Ok(snapshot) => (Some(snapshot), None),
        Err(err) => (None, Some(err.to_string())),
    };
    Json(DebugView {
        metric: key,
        data,
        error,
    })
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not found".to_string(),
        }),
    )
        .into_response()
}

fn error_response(status: StatusCode, err: &CollectError) -> Response {
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Collectors block on child processes, so they run off the async workers.
async fn collect(state: &AppState, metric: Metric) -> Result<Snapshot, CollectError> {
    let collector = Arc::clone(&state.collector);
    tracing::debug!(metric = %metric, "collecting");
    match tokio::task::spawn_blocking(move || collector.collect(metric)).await {
        Ok(result) => result,
        Err(err) => Err(CollectError::FaultRecovered {
            metric,
            message: err.to_string(),
        }),
    }
}
