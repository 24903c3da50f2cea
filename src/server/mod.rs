// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! HTTP surface: batch ingest and rolling-window statistics queries.
//!
//! Two endpoints over the registry:
//!
//! - `POST /add_batch/` appends a batch of values to one symbol's window
//! - `GET /stats/?symbol=<s>&k=<k>` aggregates the last `10^k` values
//!
//! Handlers validate request constraints themselves (batch length, `k`
//! range) and map every failure to a JSON body of the form
//! `{"detail": ...}`.

pub mod dto;

use crate::registry::Registry;
use crate::stats::Summary;
use crate::{Config, Error};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dto::{AddBatchRequest, AddBatchResponse, StatsQuery, StatsResponse};
use std::sync::Arc;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Process configuration
    pub config: Arc<Config>,

    /// Symbol table; all storages share the configured capacity
    pub registry: Arc<Registry<Summary>>,
}

impl AppState {
    /// Creates state with a fresh registry sized from the configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(Registry::new(config.max_len()));
        Self {
            config: Arc::new(config),
            registry,
        }
    }
}

/// Builds the service router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/add_batch/", post(add_batch))
        .route("/stats/", get(get_stats))
        .with_state(state)
}

/// Failures a handler can surface, each mapping to one status code.
enum ApiError {
    /// Request violates a documented constraint -> 422
    Unprocessable(String),

    /// The symbol has no observable data points -> 404
    NotFound,

    /// A value error leaked out of the core -> 400
    BadValue(String),

    /// Anything unexpected -> 500
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        match &error {
            Error::OutOfRange(..) => Self::BadValue(error.to_string()),
            Error::Config(_) => Self::Internal(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::Unprocessable(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                "No data points found for the symbol".to_owned(),
            ),
            Self::BadValue(detail) => (StatusCode::BAD_REQUEST, detail),
            Self::Internal(msg) => {
                log::error!("unhandled error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Internal server error: {msg}"),
                )
            }
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

/// Bulk-appends consecutive data points to one symbol's window.
async fn add_batch(
    State(state): State<AppState>,
    Json(request): Json<AddBatchRequest>,
) -> Result<Json<AddBatchResponse>, ApiError> {
    if request.values.len() > state.config.max_batch_size {
        return Err(ApiError::Unprocessable(format!(
            "values must contain at most {} items",
            state.config.max_batch_size,
        )));
    }

    log::debug!(
        "ingesting {} values for symbol {:?}",
        request.values.len(),
        request.symbol,
    );

    let store = state.registry.get_or_create(&request.symbol);

    {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let mut store = store.write().expect("lock poisoned");
        store.add(&request.values)?;
    }

    Ok(Json(AddBatchResponse {
        symbol: request.symbol,
        message: "OK".to_owned(),
    }))
}

/// Aggregates the most recent `10^k` data points of one symbol.
async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    if !(1..=state.config.max_k).contains(&query.k) {
        return Err(ApiError::Unprocessable(format!(
            "k must be between 1 and {}",
            state.config.max_k,
        )));
    }

    let Some(store) = state.registry.get(&query.symbol) else {
        return Err(ApiError::NotFound);
    };

    let summary = {
        #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
        let store = store.read().expect("lock poisoned");
        store.get(10_usize.pow(query.k))
    };

    summary.map_or(Err(ApiError::NotFound), |summary| {
        Ok(Json(StatsResponse::new(query.symbol, query.k, &summary)))
    })
}
