use crate::constants::{
    COMPRESSION_THRESHOLD, FALLBACK_JPEG_QUALITY, MAX_IMAGE_DIMENSION, MAX_OCR_PDF_SIZE,
    MAX_UPLOAD_SIZE, PRIMARY_JPEG_QUALITY,
};

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    /// Measured size of the uploaded part. May exceed `bytes.len()` when the
    /// upload went over the ceiling and the remainder was discarded.
    pub size: usize,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), mime_type: mime_type.into(), size: bytes.len(), bytes }
    }
}

/// Upload and extraction limits
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: usize,
    pub max_ocr_pdf_size: usize,
    pub compression: CompressionConfig,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_UPLOAD_SIZE,
            max_ocr_pdf_size: MAX_OCR_PDF_SIZE,
            compression: CompressionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompressionConfig {
    pub threshold: usize,
    pub max_dimension: u32,
    pub primary_quality: u8,
    pub fallback_quality: u8,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            threshold: COMPRESSION_THRESHOLD,
            max_dimension: MAX_IMAGE_DIMENSION,
            primary_quality: PRIMARY_JPEG_QUALITY,
            fallback_quality: FALLBACK_JPEG_QUALITY,
        }
    }
}
