use serde::{Deserialize, Serialize};
use sqlx::prelude::Type;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "file_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Image,
}

impl FileKind {
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(FileKind::Pdf),
            "image/png" | "image/jpeg" | "image/jpg" => Some(FileKind::Image),
            _ => None,
        }
    }

    pub fn wrong_type_message(self) -> &'static str {
        match self {
            FileKind::Pdf => "File must be a PDF",
            FileKind::Image => "File must be an image (PNG, JPG, JPEG)",
        }
    }

    pub fn no_text_message(self) -> &'static str {
        match self {
            FileKind::Pdf => {
                "No text could be extracted from the PDF. Please ensure the PDF contains readable text or try a smaller file."
            }
            FileKind::Image => {
                "No text could be extracted from the image. Please ensure the image contains clear, readable text."
            }
        }
    }

    pub fn too_large_for_ocr_message(self) -> &'static str {
        match self {
            FileKind::Pdf => "PDF is too large. Please use a smaller PDF (max 1MB or 3-4 pages).",
            FileKind::Image => "Image is too large for text extraction. Please use a smaller image.",
        }
    }

    pub fn extraction_failed_message(self) -> &'static str {
        match self {
            FileKind::Pdf => "Failed to extract text from PDF",
            FileKind::Image => "Failed to extract text from image",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
}
