use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::middleware::CurrentPrincipal;
use crate::state::AppState;
use storage::{FileRecord, UploadRequest};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file: FileRecord,
}

/// POST /upload - teacher-only notebook upload (multipart)
///
/// Fields: `ipynbFile` (the file part), `title`, and `lessonId` or
/// `newLessonTitle`.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut title: Option<String> = None;
    let mut lesson_id: Option<String> = None;
    let mut new_lesson_title: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "ipynbFile" => {
                file_name = field.file_name().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read file data: {}", e))
                })?;
                data = Some(bytes.to_vec());
            }
            "title" => title = Some(read_text_field(field).await?),
            "lessonId" => lesson_id = Some(read_text_field(field).await?),
            "newLessonTitle" => new_lesson_title = Some(read_text_field(field).await?),
            _ => {}
        }
    }

    let data = data.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let file_name = file_name.ok_or_else(|| ApiError::bad_request("No file provided"))?;

    let record = state
        .catalog
        .upload(
            &principal,
            UploadRequest {
                title: title.unwrap_or_default(),
                lesson_id,
                new_lesson_title,
                file_name,
                data,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            file: record,
        }),
    ))
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart field: {}", e)))
}

/// GET /aulas - list lessons
pub async fn list_lessons(
    State(state): State<Arc<AppState>>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    let lessons = state.catalog.list_lessons(&principal).await?;
    Ok(Json(lessons))
}

/// GET /aulas/{id}/files - files attached to a lesson (possibly empty)
pub async fn list_lesson_files(
    State(state): State<Arc<AppState>>,
    Path(lesson_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let files = state.catalog.list_files(&lesson_id).await?;
    Ok(Json(files))
}

/// GET /files/{id}/download - stream a stored notebook, named by its
/// display title rather than its internal stored name
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (data, display_name) = state.catalog.download(&file_id).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        display_name.replace(['"', '\r', '\n'], "")
    );
    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    Ok((StatusCode::OK, headers, data))
}
