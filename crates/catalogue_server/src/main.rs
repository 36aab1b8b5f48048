use std::{io, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{PhoneListQuery, PHONES_ROOT, PHONE_LIST_FILE},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, prepare_data_dir};

struct AppState {
    phones_dir: PathBuf,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let phones_dir = prepare_data_dir(&settings.data_dir)?;
    let app = build_router(Arc::new(AppState { phones_dir }));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, data_dir = %settings.data_dir.display(), "catalogue server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(&format!("{PHONES_ROOT}/:file"), get(phone_resource))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

fn api_error(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError::new(code, message)))
}

/// Serves `phones.json` and `<id>.json` straight from the data directory. The list
/// query is accepted for compatibility and not applied.
async fn phone_resource(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
    Query(query): Query<PhoneListQuery>,
) -> ApiResult<Json<Value>> {
    let Some(stem) = file.strip_suffix(".json") else {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            format!("no resource named {file}"),
        ));
    };
    if stem.is_empty() || stem.contains(['/', '\\']) || stem.contains("..") {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            ErrorCode::Validation,
            format!("invalid phone id '{stem}'"),
        ));
    }
    if file == PHONE_LIST_FILE {
        debug!(query = ?query.query, "phone list requested");
    }

    let path = state.phones_dir.join(&file);
    let raw = tokio::fs::read(&path).await.map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            api_error(
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound,
                format!("phone '{stem}' not found"),
            )
        } else {
            warn!(path = %path.display(), error = %err, "failed to read phone data");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::Internal,
                err.to_string(),
            )
        }
    })?;
    let body = serde_json::from_slice(&raw).map_err(|err| {
        warn!(path = %path.display(), error = %err, "phone data is not valid JSON");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal,
            format!("stored data for '{stem}' is corrupt"),
        )
    })?;
    Ok(Json(body))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
