use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::{analysis::AnalysisResult, extraction::FileKind};

/// Result of a full upload: the extracted text, its analysis and whether the
/// pair made it into the user's history.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadAnalysisResponse {
    pub file_name: String,
    pub file_type: FileKind,
    pub file_size: usize,
    pub extracted_text: String,
    pub analysis: AnalysisResult,
    pub saved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved(Uuid),
    /// Anonymous caller or no history store.
    Skipped,
    Failed,
}

impl PersistOutcome {
    pub fn upload_id(self) -> Option<Uuid> {
        match self {
            PersistOutcome::Saved(id) => Some(id),
            PersistOutcome::Skipped | PersistOutcome::Failed => None,
        }
    }
}
