use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    api::error,
    modules::upload::{
        model::NewUpload,
        repository::UploadRepository,
        schema::{UploadEntity, UploadSummary},
    },
};

#[derive(Clone)]
pub struct UploadPgRepository {
    pool: sqlx::PgPool,
}

impl UploadPgRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UploadRepository for UploadPgRepository {
    async fn create(&self, upload: &NewUpload) -> Result<UploadEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let entity = sqlx::query_as::<_, UploadEntity>(
            r#"
            INSERT INTO uploads (id, user_id, file_name, file_type, file_size, image_data, extracted_text, analysis)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(upload.user_id)
        .bind(&upload.file_name)
        .bind(upload.file_type)
        .bind(upload.file_size)
        .bind(&upload.image_data)
        .bind(&upload.extracted_text)
        .bind(Json(&upload.analysis))
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    async fn find_by_user(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<UploadSummary>, error::SystemError> {
        let uploads = sqlx::query_as::<_, UploadSummary>(
            r#"
            SELECT id, user_id, file_name, file_type, file_size, extracted_text, analysis, created_at
            FROM uploads
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(uploads)
    }
}
