use std::sync::Arc;

use actix_web::web;

use crate::{
    api::error,
    modules::extraction::{
        ocr::{OcrDocument, OcrError, OcrSpaceClient},
        schema::FileKind,
    },
    utils::format_megabytes,
};

/// Turns file bytes into plain text. An empty string is a valid result;
/// errors are reserved for real transport or service failures.
#[async_trait::async_trait]
pub trait TextExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, error::SystemError>;
}

fn ocr_failure(kind: FileKind, err: OcrError) -> error::SystemError {
    match err {
        OcrError::TooLarge(detail) => {
            log::warn!("OCR rejected {:?} as too large: {}", kind, detail);
            error::SystemError::bad_request(kind.too_large_for_ocr_message())
        }
        other => error::SystemError::upstream(other.to_string()),
    }
}

pub struct OcrImageExtractor {
    client: Arc<OcrSpaceClient>,
}

impl OcrImageExtractor {
    pub fn new(client: Arc<OcrSpaceClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl TextExtractor for OcrImageExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, error::SystemError> {
        let mime_type = match image::guess_format(bytes) {
            Ok(image::ImageFormat::Png) => "image/png",
            _ => "image/jpeg",
        };

        let pages = self
            .client
            .parse(bytes, OcrDocument::Image { mime_type })
            .await
            .map_err(|e| ocr_failure(FileKind::Image, e))?;

        Ok(pages.into_iter().next().unwrap_or_default().trim().to_string())
    }
}

pub struct OcrPdfExtractor {
    client: Arc<OcrSpaceClient>,
    max_size: usize,
}

impl OcrPdfExtractor {
    pub fn new(client: Arc<OcrSpaceClient>, max_size: usize) -> Self {
        Self { client, max_size }
    }
}

#[async_trait::async_trait]
impl TextExtractor for OcrPdfExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, error::SystemError> {
        if bytes.len() > self.max_size {
            return Err(error::SystemError::bad_request(format!(
                "PDF is too large for text extraction ({}). Please use a PDF with fewer pages or smaller size (max 1MB).",
                format_megabytes(bytes.len())
            )));
        }

        let pages = self
            .client
            .parse(bytes, OcrDocument::Pdf)
            .await
            .map_err(|e| ocr_failure(FileKind::Pdf, e))?;

        Ok(pages.join("\n\n").trim().to_string())
    }
}

/// Reads the PDF text layer in-process.
pub struct LocalPdfExtractor;

#[async_trait::async_trait]
impl TextExtractor for LocalPdfExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, error::SystemError> {
        let bytes = bytes.to_vec();
        let text = web::block(move || pdf_extract::extract_text_from_mem(&bytes))
            .await?
            .map_err(|e| error::SystemError::upstream(format!("PDF parse error: {e}")))?;

        Ok(text.trim().to_string())
    }
}

/// Local extraction first; OCR only when the text layer is missing or
/// unreadable.
pub struct PdfExtractor {
    local: Arc<dyn TextExtractor + Send + Sync>,
    ocr: Arc<dyn TextExtractor + Send + Sync>,
}

impl PdfExtractor {
    pub fn new(
        local: Arc<dyn TextExtractor + Send + Sync>,
        ocr: Arc<dyn TextExtractor + Send + Sync>,
    ) -> Self {
        Self { local, ocr }
    }
}

#[async_trait::async_trait]
impl TextExtractor for PdfExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, error::SystemError> {
        match self.local.extract_text(bytes).await {
            Ok(text) if !text.trim().is_empty() => return Ok(text),
            Ok(_) => log::info!("PDF has no text layer, falling back to OCR"),
            Err(e) => log::warn!("Local PDF extraction failed, falling back to OCR: {}", e),
        }

        self.ocr.extract_text(bytes).await
    }
}
