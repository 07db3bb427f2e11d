use actix_web::{post, web};

use crate::api::{error, success};
use crate::modules::analysis::{
    model::{AnalysisResult, AnalyzeModel, ANALYSIS_FAILED_MESSAGE, NO_TEXT_MESSAGE},
    service::AnalysisService,
};

#[post("/analyze")]
pub async fn analyze(
    service: web::Data<AnalysisService>,
    body: web::Json<AnalyzeModel>,
) -> Result<success::Success<AnalysisResult>, error::Error> {
    let text = body.text().ok_or_else(|| error::Error::bad_request(NO_TEXT_MESSAGE))?;
    let analysis = service
        .analyze(text)
        .await
        .map_err(|e| error::Error::from_system(e, ANALYSIS_FAILED_MESSAGE))?;

    Ok(success::Success::ok(analysis))
}
