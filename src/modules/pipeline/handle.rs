use actix_multipart::Multipart;
use actix_web::{post, web};

use crate::api::{error, success};
use crate::middlewares::AuthContext;
use crate::modules::{
    extraction::{handle::read_upload, UploadConfig},
    pipeline::{model::UploadAnalysisResponse, service::PipelineService},
};

#[post("/upload")]
pub async fn upload(
    pipeline: web::Data<PipelineService>,
    config: web::Data<UploadConfig>,
    auth: AuthContext,
    payload: Multipart,
) -> Result<success::Success<UploadAnalysisResponse>, error::Error> {
    let file = read_upload(payload, config.max_file_size).await?;
    log::info!("Upload received: {} ({}, {} bytes)", file.file_name, file.mime_type, file.size);

    let result = pipeline.run(file, &auth).await?;
    Ok(success::Success::ok(result))
}
