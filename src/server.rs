//! server.rs — Servidor HTTP: formulário de upload, processamento e download da planilha

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::PipelineError;
use crate::pipeline;
use crate::render::Renderer;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Estado compartilhado entre os handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub renderer: Arc<Renderer>,
}

/// Erros de requisição convertidos em resposta texto.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    UnsupportedMediaType(String),
    UnprocessableEntity(String),
    InternalServerError(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::UnsupportedFormat => ApiError::UnsupportedMediaType(err.to_string()),
            PipelineError::Ingest(_)
            | PipelineError::Schema { .. }
            | PipelineError::EmptyResult { .. } => ApiError::UnprocessableEntity(err.to_string()),
            PipelineError::Export(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<minijinja::Error> for ApiError {
    fn from(err: minijinja::Error) -> Self {
        ApiError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::UnsupportedMediaType(m) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, m),
            ApiError::UnprocessableEntity(m) => (StatusCode::UNPROCESSABLE_ENTITY, m),
            ApiError::InternalServerError(m) => {
                error!("Erro interno: {}", m);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };
        (status, message).into_response()
    }
}

/// Monta as rotas do serviço.
pub fn router(state: AppState) -> Router {
    let limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/download", get(download))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// Sobe o servidor no endereço configurado.
pub async fn run_server(config: Arc<Config>) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let state = AppState {
        config: Arc::clone(&config),
        renderer: Arc::new(Renderer::new()?),
    };

    let listener = tokio::net::TcpListener::bind(config.listen_address.as_str()).await?;
    info!("Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    Ok(Html(state.renderer.upload_page()?))
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let mut received = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        received = Some((file_name, bytes));
        break;
    }

    let Some((Some(raw_name), bytes)) = received else {
        return Err(ApiError::BadRequest("No file selected".into()));
    };
    let Some(file_name) = sanitize_file_name(&raw_name) else {
        return Err(ApiError::BadRequest("No file selected".into()));
    };

    let config = Arc::clone(&state.config);
    let report = tokio::task::spawn_blocking(move || {
        let input = store_upload(&config.upload_dir, &file_name, &bytes)
            .map_err(|e| ApiError::InternalServerError(e.to_string()))?;
        info!("Upload recebido: {} ({} bytes)", input.display(), bytes.len());

        pipeline::process_file(
            &input,
            &config.output_file,
            &config.columns,
            &config.policy(),
        )
        .inspect_err(|e| warn!("Processamento de {} falhou: {}", file_name, e))
        .map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(e.to_string()))??;

    let generated_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let html = state.renderer.result_page(
        &report.display_rows(),
        &state.config.policy(),
        &generated_at,
    )?;
    Ok(Html(html))
}

async fn download(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let path = &state.config.output_file;
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound("No file available for download".into()));
        }
        Err(e) => return Err(ApiError::InternalServerError(e.to_string())),
    };

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("availability_results.xlsx");
    let headers = [
        (header::CONTENT_TYPE, XLSX_MIME.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, bytes))
}

/// Grava o upload em `dir` com nome exclusivo (`<base>-XXXXXX.<ext>`).
///
/// A extensão original é mantida para a detecção de formato; o nome nunca
/// coincide com o da planilha de saída.
fn store_upload(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let name = Path::new(file_name);
    let stem = name.file_stem().and_then(|s| s.to_str()).unwrap_or("upload");
    let suffix = name
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let mut file = tempfile::Builder::new()
        .prefix(&format!("{stem}-"))
        .suffix(&suffix)
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    let (_, path) = file.keep().map_err(|e| e.error)?;
    Ok(path)
}

/// Mantém só o nome base do arquivo enviado (sem diretórios).
fn sanitize_file_name(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let name = Path::new(base).file_name()?.to_str()?;
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}
