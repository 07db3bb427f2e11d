use std::sync::Arc;

use actix_web::web;

use crate::api::error;
use crate::modules::extraction::{
    compress::ImageCompressor,
    extractor::TextExtractor,
    model::{UploadConfig, UploadedFile},
    schema::FileKind,
    validation::FileValidator,
};

#[derive(Clone)]
pub struct ExtractionService {
    validator: FileValidator,
    compressor: ImageCompressor,
    image: Arc<dyn TextExtractor + Send + Sync>,
    pdf: Arc<dyn TextExtractor + Send + Sync>,
}

impl ExtractionService {
    pub fn with_dependencies(
        config: &UploadConfig,
        image: Arc<dyn TextExtractor + Send + Sync>,
        pdf: Arc<dyn TextExtractor + Send + Sync>,
    ) -> Self {
        log::info!("ExtractionService initialized with dependencies");
        ExtractionService {
            validator: FileValidator::new(config.max_file_size),
            compressor: ImageCompressor::new(config.compression),
            image,
            pdf,
        }
    }

    pub fn validate(
        &self,
        file: &UploadedFile,
        expected: Option<FileKind>,
    ) -> Result<FileKind, error::SystemError> {
        self.validator.validate(file, expected)
    }

    /// Extracts text from an already validated file. Empty output is reported
    /// as `NoTextFound`, never as a generic failure.
    pub async fn extract_text(
        &self,
        file: &UploadedFile,
        kind: FileKind,
    ) -> Result<String, error::SystemError> {
        let text = match kind {
            FileKind::Image => {
                let bytes = self.prepare_image(&file.bytes).await?;
                self.image.extract_text(&bytes).await?
            }
            FileKind::Pdf => {
                log::info!(
                    "Processing PDF: {}, Size: {:.2}KB",
                    file.file_name,
                    file.size as f64 / 1024.0
                );
                self.pdf.extract_text(&file.bytes).await?
            }
        };

        let text = text.trim();
        if text.is_empty() {
            log::warn!("No text extracted from {} ({:?})", file.file_name, kind);
            return Err(error::SystemError::no_text_found(kind.no_text_message()));
        }

        log::info!("Successfully extracted {} characters from {}", text.len(), file.file_name);
        Ok(text.to_string())
    }

    pub async fn extract(
        &self,
        file: &UploadedFile,
        expected: Option<FileKind>,
    ) -> Result<String, error::SystemError> {
        let kind = self.validate(file, expected)?;
        self.extract_text(file, kind).await
    }

    async fn prepare_image(&self, bytes: &[u8]) -> Result<Vec<u8>, error::SystemError> {
        if !self.compressor.needs_compression(bytes.len()) {
            return Ok(bytes.to_vec());
        }

        log::info!("Image too large ({}KB), compressing...", bytes.len() / 1024);

        let compressor = self.compressor;
        let input = bytes.to_vec();
        let compressed = web::block(move || compressor.compress(&input)).await?.map_err(|e| {
            match e {
                error::SystemError::ImageError(image::ImageError::Decoding(_))
                | error::SystemError::ImageError(image::ImageError::Unsupported(_)) => {
                    error::SystemError::bad_request("The uploaded image could not be read")
                }
                other => other,
            }
        })?;

        log::info!("Compressed to {}KB", compressed.len() / 1024);
        Ok(compressed)
    }
}
