use crate::document::Document;
use crate::engine::SearchEngine;
use crate::error::Error;
use crate::http::RetryClient;
use crate::page::fetch_page;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;

/// Engine shared between handlers. The engine itself does no locking, so
/// writers take the write lock and searches share the read lock.
pub type SharedEngine = Arc<RwLock<SearchEngine>>;

#[derive(Clone)]
pub struct AppState {
    pub engine: SharedEngine,
    pub client: RetryClient,
}

impl AppState {
    pub fn new(engine: SearchEngine, client: RetryClient) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            client,
        }
    }
}

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct InsertDocumentRequest {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl From<InsertDocumentRequest> for Document {
    fn from(req: InsertDocumentRequest) -> Self {
        let doc = Document::new(req.id, req.text);
        match req.body {
            Some(body) => doc.with_body(body),
            None => doc,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchInsertRequest {
    pub documents: Vec<InsertDocumentRequest>,
}

#[derive(Debug, Deserialize)]
pub struct FetchPageRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub ids: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: anyhow::anyhow!("{message}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = format!("{:#}", self.error);
        tracing::error!("API error: {}", message);

        (self.status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::EmptyDocumentId => StatusCode::BAD_REQUEST,
            Error::Markup(_) | Error::Transport(_) | Error::Status(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            error: err.into(),
        }
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::internal("search engine lock poisoned")
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn insert_document(
    State(state): State<AppState>,
    Json(req): Json<InsertDocumentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let doc = Document::from(req);
    state.engine.write().map_err(poisoned)?.put([doc])?;

    Ok(Json(ApiResponse::success("Document indexed successfully")))
}

async fn batch_insert(
    State(state): State<AppState>,
    Json(req): Json<BatchInsertRequest>,
) -> Result<impl IntoResponse, AppError> {
    let docs: Vec<Document> = req.documents.into_iter().map(Document::from).collect();
    let count = docs.len();

    state.engine.write().map_err(poisoned)?.put(docs)?;

    Ok(Json(ApiResponse::success(format!("Indexed {count} documents"))))
}

async fn fetch_and_index(
    State(state): State<AppState>,
    Json(req): Json<FetchPageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let page = fetch_page(&state.client, &req.url, &CancellationToken::new()).await?;

    state
        .engine
        .write()
        .map_err(poisoned)?
        .put([&page.document])?;

    Ok(Json(ApiResponse::success(page.meta)))
}

async fn search_documents(
    State(state): State<AppState>,
    Query(req): Query<SearchRequest>,
) -> Result<impl IntoResponse, AppError> {
    let ids = state.engine.read().map_err(poisoned)?.search(&req.q);

    let response = SearchResponse {
        total: ids.len(),
        ids,
        query: req.q,
    };

    Ok(Json(ApiResponse::success(response)))
}

async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = state.engine.read().map_err(poisoned)?.stats();
    Ok(Json(ApiResponse::success(stats)))
}

// ========== Router ==========

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/documents", post(insert_document))
        .route("/documents/batch", post(batch_insert))
        .route("/pages", post(fetch_and_index))
        .route("/search", get(search_documents))
        .route("/stats", get(get_stats))
        .with_state(state)
}
