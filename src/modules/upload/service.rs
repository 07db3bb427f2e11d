use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::constants::{HISTORY_LIMIT, MAX_INLINE_IMAGE_SIZE};
use crate::middlewares::AuthContext;
use crate::modules::extraction::FileKind;
use crate::modules::upload::{
    model::{NewUpload, SaveUploadModel},
    repository::UploadRepository,
    schema::UploadSummary,
};
use crate::utils::format_megabytes;

#[derive(Clone)]
pub struct UploadService {
    repo: Option<Arc<dyn UploadRepository + Send + Sync>>,
}

impl UploadService {
    /// `repo` is `None` when no database is configured; every call then fails.
    pub fn with_dependencies(repo: Option<Arc<dyn UploadRepository + Send + Sync>>) -> Self {
        log::info!("UploadService initialized (history enabled: {})", repo.is_some());
        UploadService { repo }
    }

    pub fn enabled(&self) -> bool {
        self.repo.is_some()
    }

    fn repo(&self) -> Result<&Arc<dyn UploadRepository + Send + Sync>, error::SystemError> {
        self.repo.as_ref().ok_or_else(|| {
            error::SystemError::DatabaseError("History store is not configured".into())
        })
    }

    /// Stores a finished analysis for the authenticated user.
    pub async fn append(
        &self,
        auth: &AuthContext,
        upload: SaveUploadModel,
    ) -> Result<Uuid, error::SystemError> {
        let user_id = auth.require_user()?;

        if upload.extracted_text.trim().is_empty() {
            return Err(error::SystemError::bad_request("Extracted text cannot be empty"));
        }

        if let Some(image_data) = &upload.image_data {
            check_inline_image(upload.file_type, image_data)?;
        }

        let new_upload = NewUpload {
            user_id,
            file_name: upload.file_name,
            file_type: upload.file_type,
            file_size: upload.file_size,
            image_data: upload.image_data,
            extracted_text: upload.extracted_text,
            analysis: upload.analysis,
        };

        let entity = self.repo()?.create(&new_upload).await?;
        log::info!("Saved upload {} for user {}", entity.id, user_id);
        Ok(entity.id)
    }

    /// The user's uploads, newest first, capped at the history limit.
    pub async fn list_by_user(
        &self,
        auth: &AuthContext,
        limit: Option<i64>,
    ) -> Result<Vec<UploadSummary>, error::SystemError> {
        let user_id = auth.require_user()?;
        let limit = limit.unwrap_or(HISTORY_LIMIT).clamp(1, HISTORY_LIMIT);
        self.repo()?.find_by_user(&user_id, limit).await
    }
}

/// Inline payloads are only kept for small images.
fn check_inline_image(kind: FileKind, image_data: &str) -> Result<(), error::SystemError> {
    if kind != FileKind::Image {
        return Err(error::SystemError::bad_request("Image data is only allowed for image uploads"));
    }

    let decoded = STANDARD
        .decode(image_data)
        .map_err(|_| error::SystemError::bad_request("Image data must be base64 encoded"))?;

    if decoded.len() > MAX_INLINE_IMAGE_SIZE {
        return Err(error::SystemError::bad_request(format!(
            "Image data is too large ({}). Maximum allowed size is {}.",
            format_megabytes(decoded.len()),
            format_megabytes(MAX_INLINE_IMAGE_SIZE)
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{modules::analysis::AnalysisResult, test::InMemoryUploadRepository};

    fn upload(name: &str) -> SaveUploadModel {
        SaveUploadModel {
            file_name: name.to_string(),
            file_type: FileKind::Image,
            file_size: 2048,
            image_data: Some("aGVsbG8=".to_string()),
            extracted_text: "Hello World".to_string(),
            analysis: AnalysisResult::fallback(),
        }
    }

    fn service() -> (UploadService, Arc<InMemoryUploadRepository>) {
        let repo = Arc::new(InMemoryUploadRepository::default());
        (UploadService::with_dependencies(Some(repo.clone())), repo)
    }

    #[actix_web::test]
    async fn lists_newest_first_per_user() {
        let (svc, _) = service();
        let alice = AuthContext::User(Uuid::now_v7());
        let bob = AuthContext::User(Uuid::now_v7());

        let first = svc.append(&alice, upload("first.png")).await.unwrap();
        svc.append(&bob, upload("bob.png")).await.unwrap();
        let second = svc.append(&alice, upload("second.png")).await.unwrap();

        let listed = svc.list_by_user(&alice, None).await.unwrap();
        assert_eq!(listed.iter().map(|u| u.id).collect::<Vec<_>>(), vec![second, first]);
    }

    #[actix_web::test]
    async fn listing_is_repeatable() {
        let (svc, _) = service();
        let user = AuthContext::User(Uuid::now_v7());
        for i in 0..3 {
            svc.append(&user, upload(&format!("{i}.png"))).await.unwrap();
        }

        let once = svc.list_by_user(&user, None).await.unwrap();
        let twice = svc.list_by_user(&user, None).await.unwrap();
        assert_eq!(once, twice);
    }

    #[actix_web::test]
    async fn limit_is_capped() {
        let (svc, repo) = service();
        let user = AuthContext::User(Uuid::now_v7());
        svc.append(&user, upload("a.png")).await.unwrap();

        svc.list_by_user(&user, Some(500)).await.unwrap();
        assert_eq!(repo.last_limit(), Some(HISTORY_LIMIT));
    }

    #[actix_web::test]
    async fn anonymous_callers_are_rejected() {
        let (svc, repo) = service();
        let err = svc.append(&AuthContext::Anonymous, upload("a.png")).await.unwrap_err();
        assert!(matches!(err, error::SystemError::Unauthorized(_)));
        assert_eq!(repo.len(), 0);
    }

    #[actix_web::test]
    async fn blank_text_is_never_stored() {
        let (svc, repo) = service();
        let mut blank = upload("a.png");
        blank.extracted_text = "   ".to_string();

        let err = svc.append(&AuthContext::User(Uuid::now_v7()), blank).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
        assert_eq!(repo.len(), 0);
    }

    #[actix_web::test]
    async fn image_data_is_limited_to_small_images() {
        let (svc, repo) = service();
        let user = AuthContext::User(Uuid::now_v7());

        let mut on_pdf = upload("deck.pdf");
        on_pdf.file_type = FileKind::Pdf;
        let err = svc.append(&user, on_pdf).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let mut oversized = upload("huge.png");
        oversized.image_data = Some(STANDARD.encode(vec![0u8; MAX_INLINE_IMAGE_SIZE + 1]));
        let err = svc.append(&user, oversized).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(ref m) if m.contains("too large")));

        let mut garbled = upload("a.png");
        garbled.image_data = Some("not base64!".to_string());
        assert!(svc.append(&user, garbled).await.is_err());

        assert_eq!(repo.len(), 0);

        let mut at_limit = upload("edge.png");
        at_limit.image_data = Some(STANDARD.encode(vec![0u8; MAX_INLINE_IMAGE_SIZE]));
        svc.append(&user, at_limit).await.unwrap();

        let mut pdf_without_image = upload("deck.pdf");
        pdf_without_image.file_type = FileKind::Pdf;
        pdf_without_image.image_data = None;
        svc.append(&user, pdf_without_image).await.unwrap();
        assert_eq!(repo.len(), 2);
    }

    #[actix_web::test]
    async fn unconfigured_store_fails() {
        let svc = UploadService::with_dependencies(None);
        let err = svc.append(&AuthContext::User(Uuid::now_v7()), upload("a.png")).await.unwrap_err();
        assert!(matches!(err, error::SystemError::DatabaseError(_)));
    }
}
