use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::api::error;
use crate::constants::MAX_INLINE_IMAGE_SIZE;
use crate::middlewares::AuthContext;
use crate::modules::{
    analysis::{model::ANALYSIS_FAILED_MESSAGE, AnalysisResult, AnalysisService},
    extraction::{ExtractionService, FileKind, UploadedFile},
    pipeline::model::{PersistOutcome, UploadAnalysisResponse},
    upload::{model::SaveUploadModel, UploadService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validation,
    Extraction(FileKind),
    Analysis,
}

/// An error tagged with the pipeline stage that produced it.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: error::SystemError,
}

impl StageFailure {
    fn at(stage: Stage) -> impl FnOnce(error::SystemError) -> Self {
        move |error| StageFailure { stage, error }
    }
}

impl From<StageFailure> for error::Error {
    fn from(failure: StageFailure) -> Self {
        let fallback = match failure.stage {
            Stage::Validation => "Internal Server Error",
            Stage::Extraction(kind) => kind.extraction_failed_message(),
            Stage::Analysis => ANALYSIS_FAILED_MESSAGE,
        };
        error::Error::from_system(failure.error, fallback)
    }
}

/// Runs an uploaded file through validation, extraction and analysis, then
/// records the result for signed-in users.
#[derive(Clone)]
pub struct PipelineService {
    extraction: ExtractionService,
    analysis: AnalysisService,
    uploads: UploadService,
}

impl PipelineService {
    pub fn with_dependencies(
        extraction: ExtractionService,
        analysis: AnalysisService,
        uploads: UploadService,
    ) -> Self {
        log::info!("PipelineService initialized with dependencies");
        PipelineService { extraction, analysis, uploads }
    }

    pub async fn run(
        &self,
        file: UploadedFile,
        auth: &AuthContext,
    ) -> Result<UploadAnalysisResponse, StageFailure> {
        let kind = self.extraction.validate(&file, None).map_err(StageFailure::at(Stage::Validation))?;

        let text = self
            .extraction
            .extract_text(&file, kind)
            .await
            .map_err(StageFailure::at(Stage::Extraction(kind)))?;

        let analysis = self.analysis.analyze(&text).await.map_err(StageFailure::at(Stage::Analysis))?;

        let outcome = self.persist(auth, &file, kind, &text, &analysis).await;

        Ok(UploadAnalysisResponse {
            file_name: file.file_name,
            file_type: kind,
            file_size: file.size,
            extracted_text: text,
            analysis,
            saved: matches!(outcome, PersistOutcome::Saved(_)),
            upload_id: outcome.upload_id(),
        })
    }

    async fn persist(
        &self,
        auth: &AuthContext,
        file: &UploadedFile,
        kind: FileKind,
        text: &str,
        analysis: &AnalysisResult,
    ) -> PersistOutcome {
        if auth.user_id().is_none() || !self.uploads.enabled() {
            return PersistOutcome::Skipped;
        }

        let upload = SaveUploadModel {
            file_name: file.file_name.clone(),
            file_type: kind,
            file_size: i64::try_from(file.size).unwrap_or(i64::MAX),
            image_data: inline_image(file, kind),
            extracted_text: text.to_string(),
            analysis: analysis.clone(),
        };

        match self.uploads.append(auth, upload).await {
            Ok(id) => PersistOutcome::Saved(id),
            Err(e) => {
                log::error!("Failed to save upload {}: {}", file.file_name, e);
                PersistOutcome::Failed
            }
        }
    }
}

/// Base64 of the uploaded image, kept only for small images.
fn inline_image(file: &UploadedFile, kind: FileKind) -> Option<String> {
    if kind != FileKind::Image || file.size > MAX_INLINE_IMAGE_SIZE {
        return None;
    }
    Some(STANDARD.encode(&file.bytes))
}
