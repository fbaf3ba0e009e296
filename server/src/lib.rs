use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use docsearch_core::document::timestamp;
use docsearch_core::export::{export_as, ExportFormat};
use docsearch_core::loader::load_documents;
use docsearch_core::suggest::DEFAULT_MAX_SUGGESTIONS;
use docsearch_core::{
    AdvancedSearchResponse, ContentSearchResult, Criteria, DateRange, Document, ExternalId, SearchEngine,
    SearchOptions, SearchResponse, SortKey, SortOrder, TermCount,
};
use serde::Deserialize;
use std::fmt::Display;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub type ApiError = (StatusCode, String);

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub category: Option<String>,
    pub access_level: Option<String>,
    /// Earliest upload date, RFC 3339 or YYYY-MM-DD; needs `to`.
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,
}

impl SearchParams {
    fn options(&self) -> Result<SearchOptions, ApiError> {
        let date_range = match (&self.from, &self.to) {
            (Some(start), Some(end)) => Some(DateRange {
                start: timestamp::parse(start).map_err(bad_request)?,
                end: timestamp::parse(end).map_err(bad_request)?,
            }),
            (None, None) => None,
            _ => return Err(bad_request("date range needs both `from` and `to`")),
        };
        Ok(SearchOptions {
            category: self.category.clone(),
            access_level: self.access_level.clone(),
            date_range,
            limit: self.limit,
            offset: self.offset,
            sort_by: self.sort_by,
            sort_order: self.sort_order.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize)]
pub struct WithinParams {
    pub q: String,
}

#[derive(Deserialize)]
pub struct SuggestParams {
    pub q: String,
    #[serde(default = "default_max")]
    pub max: usize,
}
fn default_max() -> usize { DEFAULT_MAX_SUGGESTIONS }

#[derive(Deserialize)]
pub struct ExportParams {
    #[serde(default = "default_format")]
    pub format: String,
}
fn default_format() -> String { "json".to_string() }

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub admin_token: Option<String>,
}

/// Load the collection at `documents_path` and build the router. Reads
/// `ADMIN_TOKEN` and `CORS_ALLOW_ORIGIN` from the environment.
pub fn build_app(documents_path: String) -> Result<Router> {
    let engine = Arc::new(SearchEngine::new(load_documents(&documents_path)?));
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    Ok(router(AppState { engine, admin_token }))
}

pub fn router(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/search/advanced", post(advanced_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/doc/:doc_id/search", get(within_handler))
        .route("/suggest", get(suggest_handler))
        .route("/popular", get(popular_handler))
        .route("/export", get(export_handler))
        .route("/documents", post(replace_documents))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let options = params.options()?;
    Ok(Json(state.engine.basic_search(&params.q, &options)))
}

pub async fn advanced_handler(State(state): State<AppState>, Json(criteria): Json<Criteria>) -> Json<AdvancedSearchResponse> {
    Json(state.engine.advanced_search(&criteria))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<String>) -> Result<Json<Document>, ApiError> {
    lookup(&state, &doc_id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "not found".into()))
}

pub async fn within_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    Query(params): Query<WithinParams>,
) -> Json<ContentSearchResult> {
    Json(state.engine.search_within_document(&resolve_id(&state, &doc_id), &params.q))
}

pub async fn suggest_handler(State(state): State<AppState>, Query(params): Query<SuggestParams>) -> Json<Vec<String>> {
    Json(state.engine.get_suggestions(&params.q, params.max))
}

pub async fn popular_handler(State(state): State<AppState>) -> Json<Vec<TermCount>> {
    Json(state.engine.popular_terms())
}

pub async fn export_handler(
    State(state): State<AppState>,
    Query(search): Query<SearchParams>,
    Query(export): Query<ExportParams>,
) -> Result<Response, ApiError> {
    let format: ExportFormat = export.format.parse().map_err(bad_request)?;
    let results = state.engine.basic_search(&search.q, &search.options()?);
    let body = export_as(&results, format).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

async fn replace_documents(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(docs): Json<Vec<Document>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state, &headers)?;
    let engine = Arc::clone(&state.engine);
    let num_docs = docs.len();
    tokio::task::spawn_blocking(move || engine.update_documents(docs))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(serde_json::json!({ "num_docs": num_docs })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

/// Path ids that look numeric may still name a string id.
fn resolve_id(state: &AppState, raw: &str) -> ExternalId {
    let id = ExternalId::parse_lenient(raw);
    if matches!(id, ExternalId::Int(_)) && state.engine.document(&id).is_none() {
        return ExternalId::Text(raw.to_string());
    }
    id
}

fn lookup(state: &AppState, raw: &str) -> Option<Document> {
    state.engine.document(&resolve_id(state, raw))
}

fn bad_request(e: impl Display) -> ApiError {
    (StatusCode::BAD_REQUEST, e.to_string())
}
