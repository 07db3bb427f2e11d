use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::{analysis::AnalysisResult, extraction::FileKind};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveUploadModel {
    #[validate(length(min = 1, message = "File name cannot be empty"))]
    pub file_name: String,
    pub file_type: FileKind,
    #[validate(range(min = 0, message = "File size cannot be negative"))]
    pub file_size: i64,
    pub image_data: Option<String>,
    #[validate(length(min = 1, message = "Extracted text cannot be empty"))]
    pub extracted_text: String,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListUploadsQuery {
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    pub limit: Option<i64>,
}

pub struct NewUpload {
    pub user_id: Uuid,
    pub file_name: String,
    pub file_type: FileKind,
    pub file_size: i64,
    pub image_data: Option<String>,
    pub extracted_text: String,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveUploadResponse {
    pub success: bool,
    pub upload_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadListResponse<T> {
    pub uploads: Vec<T>,
}
