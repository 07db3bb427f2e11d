use actix_multipart::Multipart;
use actix_web::{post, web};
use futures_util::TryStreamExt;

use crate::api::{error, success};
use crate::modules::extraction::{
    model::{UploadConfig, UploadedFile},
    schema::{ExtractedText, FileKind},
    service::ExtractionService,
};

/// Reads the `file` part of a multipart form. Parts past `max_size` are
/// drained and counted but not kept.
pub async fn read_upload(
    mut payload: Multipart,
    max_size: usize,
) -> Result<UploadedFile, error::Error> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| error::Error::bad_request(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();

        // Detect MIME type
        let mime_type = match field.content_type() {
            Some(m) if m.essence_str() != "application/octet-stream" => m.essence_str().to_string(),
            _ => mime_guess::from_path(&file_name)
                .first()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string()),
        };

        let mut bytes = Vec::new();
        let mut size = 0usize;
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| error::Error::bad_request(format!("Invalid multipart payload: {e}")))?
        {
            size += chunk.len();
            if size <= max_size {
                bytes.extend_from_slice(&chunk);
            }
        }

        return Ok(UploadedFile { file_name, mime_type, size, bytes });
    }

    Err(error::Error::bad_request("No file provided"))
}

#[post("/extract-image")]
pub async fn extract_image(
    service: web::Data<ExtractionService>,
    config: web::Data<UploadConfig>,
    payload: Multipart,
) -> Result<success::Success<ExtractedText>, error::Error> {
    let file = read_upload(payload, config.max_file_size).await?;
    let text = service
        .extract(&file, Some(FileKind::Image))
        .await
        .map_err(|e| error::Error::from_system(e, FileKind::Image.extraction_failed_message()))?;

    Ok(success::Success::ok(ExtractedText { text }))
}

#[post("/extract-pdf")]
pub async fn extract_pdf(
    service: web::Data<ExtractionService>,
    config: web::Data<UploadConfig>,
    payload: Multipart,
) -> Result<success::Success<ExtractedText>, error::Error> {
    let file = read_upload(payload, config.max_file_size).await?;
    let text = service
        .extract(&file, Some(FileKind::Pdf))
        .await
        .map_err(|e| error::Error::from_system(e, FileKind::Pdf.extraction_failed_message()))?;

    Ok(success::Success::ok(ExtractedText { text }))
}
