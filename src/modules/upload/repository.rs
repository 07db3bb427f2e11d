use uuid::Uuid;

use crate::{
    api::error,
    modules::upload::{
        model::NewUpload,
        schema::{UploadEntity, UploadSummary},
    },
};

/// Append-only store of a user's uploads and their analyses.
#[async_trait::async_trait]
pub trait UploadRepository {
    async fn create(&self, upload: &NewUpload) -> Result<UploadEntity, error::SystemError>;

    /// Newest first, without inline image data.
    async fn find_by_user(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<UploadSummary>, error::SystemError>;
}
