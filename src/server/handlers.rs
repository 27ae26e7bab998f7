use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::context::AppContext;
use crate::errors::TaskDeskError;
use crate::server::types::{
    GmailSendRequest, GmailSendResponse, PdfSearchRequest, PdfSearchResponse, SearchRequest,
    SearchResponse, UploadResponse,
};

/// Maps the error taxonomy onto HTTP statuses; callers always get structured
/// JSON, never a raw trace.
pub struct ApiError(pub TaskDeskError);

impl From<TaskDeskError> for ApiError {
    fn from(error: TaskDeskError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TaskDeskError::Validation(_) => StatusCode::BAD_REQUEST,
            TaskDeskError::SessionUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "TaskDesk API - access all assistant services from one endpoint",
        "endpoints": {
            "agent": "/agent/search",
            "gmail": "/gmail/send",
            "pdf": ["/api/upload", "/api/search"],
            "health": "/health",
        }
    }))
}

pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "TaskDesk API",
        "gmail_service_initialized": ctx.gmail.is_available(),
        "gmail_init_error": ctx.gmail.init_error(),
    }))
}

/// Natural-language task in, confirmed send out: translate, overlay caller
/// recipients, validate, then drive the browser pipeline.
pub async fn gmail_send(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<GmailSendRequest>,
) -> Result<Json<GmailSendResponse>, ApiError> {
    let gmail = ctx.gmail.service()?;

    let draft = gmail
        .prepare_draft(
            &request.task,
            request.tone.as_deref(),
            &request.to,
            &request.cc,
            &request.bcc,
        )
        .await?;

    gmail.send(&draft).await?;

    Ok(Json(GmailSendResponse {
        success: true,
        message: "Email sent successfully".to_string(),
        email_preview: draft,
    }))
}

pub async fn agent_search(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let outcome = ctx
        .search
        .search_web(&request.query, request.context.as_ref(), request.max_results)
        .await?;

    Ok(Json(SearchResponse {
        success: true,
        query: request.query,
        result: outcome.result,
        results: outcome.results,
    }))
}

pub async fn pdf_upload(
    State(ctx): State<Arc<AppContext>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|error| {
        ApiError(TaskDeskError::Validation(format!(
            "invalid multipart payload: {error}"
        )))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        if !filename.to_ascii_lowercase().ends_with(".pdf") {
            return Err(ApiError(TaskDeskError::Validation(
                "Only PDF files are supported".to_string(),
            )));
        }
        let bytes = field.bytes().await.map_err(|error| {
            ApiError(TaskDeskError::Pdf(format!("could not read upload: {error}")))
        })?;

        let chunks_added = ctx.pdf.ingest(&filename, &bytes).await?;
        return Ok(Json(UploadResponse {
            success: true,
            message: format!("Successfully uploaded and processed {filename}"),
            filename,
            chunks_added,
        }));
    }

    Err(ApiError(TaskDeskError::Validation(
        "multipart field 'file' is required".to_string(),
    )))
}

pub async fn pdf_search(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<PdfSearchRequest>,
) -> Result<Json<PdfSearchResponse>, ApiError> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(ApiError(TaskDeskError::Validation(
            "Question is required".to_string(),
        )));
    }

    let answer = ctx.pdf.answer(question).await?;
    Ok(Json(PdfSearchResponse {
        response: answer.response,
        context: answer.context,
        chunks_found: answer.chunks_found,
    }))
}
