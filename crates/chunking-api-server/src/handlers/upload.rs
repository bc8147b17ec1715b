use axum::{extract::Multipart, Json};
use serde::Serialize;
use tracing::info;

use crate::document::PdfExtractor;
use crate::utils::error::ApiError;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub text: String,
    pub text_length: usize,
}

/// Accepts a multipart PDF upload, extracts its text in memory and returns
/// it. Nothing is persisted.
pub async fn upload_pdf_handler(
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    info!("PDF upload request received");

    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {}", e)))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let file_data = file_data.ok_or_else(|| ApiError::BadRequest("file required".to_string()))?;
    let filename = filename.ok_or_else(|| ApiError::BadRequest("filename required".to_string()))?;

    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(ApiError::BadRequest(
            "Only PDF files are allowed".to_string(),
        ));
    }

    info!("Extracting text from {} ({} bytes)", filename, file_data.len());

    let text = PdfExtractor::extract_text(&file_data)?;
    let text_length = text.chars().count();

    info!("Extracted {} characters from {}", text_length, filename);

    Ok(Json(UploadResponse {
        filename,
        text,
        text_length,
    }))
}
