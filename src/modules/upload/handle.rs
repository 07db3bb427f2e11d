use actix_web::{get, post, web};

use crate::api::{error, success};
use crate::middlewares::AuthContext;
use crate::modules::upload::{
    model::{ListUploadsQuery, SaveUploadModel, SaveUploadResponse, UploadListResponse},
    schema::UploadSummary,
    service::UploadService,
};
use crate::utils::{ValidatedJson, ValidatedQuery};

#[post("/save")]
pub async fn save_upload(
    upload_service: web::Data<UploadService>,
    auth: AuthContext,
    upload: ValidatedJson<SaveUploadModel>,
) -> Result<success::Success<SaveUploadResponse>, error::Error> {
    let upload_id = upload_service
        .append(&auth, upload.0)
        .await
        .map_err(|e| error::Error::from_system(e, "Failed to save upload"))?;

    Ok(success::Success::ok(SaveUploadResponse { success: true, upload_id }))
}

#[get("")]
pub async fn list_uploads(
    upload_service: web::Data<UploadService>,
    auth: AuthContext,
    query: ValidatedQuery<ListUploadsQuery>,
) -> Result<success::Success<UploadListResponse<UploadSummary>>, error::Error> {
    let uploads = upload_service
        .list_by_user(&auth, query.0.limit)
        .await
        .map_err(|e| error::Error::from_system(e, "Failed to fetch uploads"))?;

    Ok(success::Success::ok(UploadListResponse { uploads }))
}
