use crate::infra::{deserialize_optional_now, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use carteira_pf::error::AppError;
use carteira_pf::workflows::import::{suggest_mapping, PortfolioCsvImporter};
use carteira_pf::workflows::portfolio::report::views::{CreditSummary, PortfolioSummary};
use carteira_pf::workflows::portfolio::{
    ClientFilter, ColumnMap, EnrichedClient, PortfolioEngine, SortMode,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyRequest {
    pub(crate) csv: String,
    /// Canonical field -> CSV column. Suggested from the header when omitted.
    #[serde(default)]
    pub(crate) mapping: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub(crate) minimum_wage: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_now")]
    pub(crate) now: Option<NaiveDateTime>,
    #[serde(default)]
    pub(crate) filter: ClientFilter,
    #[serde(default)]
    pub(crate) sort: SortMode,
    /// Falls back to the service default (`APP_MASK_NAMES`).
    #[serde(default)]
    pub(crate) mask_names: Option<bool>,
    #[serde(default)]
    pub(crate) top: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassifyResponse {
    pub(crate) now: NaiveDateTime,
    pub(crate) minimum_wage: f64,
    pub(crate) mapping: ColumnMap,
    pub(crate) summary: PortfolioSummary,
    pub(crate) credit_summary: CreditSummary,
    pub(crate) clients: Vec<EnrichedClient>,
}

pub(crate) fn router() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/portfolio/classify",
            axum::routing::post(classify_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn classify_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let ClassifyRequest {
        csv,
        mapping,
        minimum_wage,
        now,
        filter,
        sort,
        mask_names,
        top,
    } = payload;

    let engine = PortfolioEngine::new(minimum_wage.unwrap_or(state.minimum_wage))?;
    let batch = PortfolioCsvImporter::from_reader(Cursor::new(csv.into_bytes()))?;
    let columns = match mapping {
        Some(pairs) => ColumnMap::from_keys(pairs)?,
        None => suggest_mapping(&batch.headers),
    };

    let now = now.unwrap_or_else(|| Local::now().naive_local());
    let table = batch.classify(&engine, &columns, now)?;
    let table = if mask_names.unwrap_or(state.mask_names) {
        table.masked()
    } else {
        table
    };

    let summary = table.summary(&filter);
    let credit_summary = table.credit_summary(&filter);
    let mut clients: Vec<EnrichedClient> = table
        .actionable_list(&filter, sort)
        .into_iter()
        .cloned()
        .collect();
    if let Some(limit) = top {
        clients.truncate(limit);
    }

    info!(
        clients = table.clients.len(),
        listed = clients.len(),
        sort = sort.label(),
        "portfolio classification served"
    );

    Ok(Json(ClassifyResponse {
        now,
        minimum_wage: engine.minimum_wage(),
        mapping: columns,
        summary,
        credit_summary,
        clients,
    }))
}
