use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use uuid::Uuid;

use crate::modules::{analysis::AnalysisResult, extraction::FileKind};

/// Upload history row
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_type: FileKind,
    pub file_size: i64,
    pub image_data: Option<String>,
    pub extracted_text: String,
    pub analysis: Json<AnalysisResult>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Upload history row without the inline image, for list views.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_type: FileKind,
    pub file_size: i64,
    pub extracted_text: String,
    pub analysis: Json<AnalysisResult>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UploadEntity> for UploadSummary {
    fn from(entity: UploadEntity) -> Self {
        UploadSummary {
            id: entity.id,
            user_id: entity.user_id,
            file_name: entity.file_name,
            file_type: entity.file_type,
            file_size: entity.file_size,
            extracted_text: entity.extracted_text,
            analysis: entity.analysis,
            created_at: entity.created_at,
        }
    }
}
