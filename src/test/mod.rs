//! Test doubles shared by the module tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use reqwest::StatusCode;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        analysis::gemini::{CompletionClient, CompletionError},
        extraction::TextExtractor,
        upload::{
            model::NewUpload,
            repository::UploadRepository,
            schema::{UploadEntity, UploadSummary},
        },
    },
    utils::Claims,
};

pub const TEST_SECRET: &str = "test-secret";

/// `Authorization` header value for `user_id`, signed with [`TEST_SECRET`].
pub fn bearer(user_id: &Uuid) -> String {
    let token = Claims::new(user_id, 3600).encode(TEST_SECRET.as_bytes()).unwrap();
    format!("Bearer {token}")
}

/// Builds a single-part `multipart/form-data` body holding `bytes` as `file`.
pub fn multipart_body(file_name: &str, mime_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "postlens-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}

pub struct ScriptedExtractor {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl ScriptedExtractor {
    pub fn text(text: &str) -> Self {
        Self { reply: Ok(text.to_string()), calls: AtomicUsize::new(0) }
    }

    pub fn failing(reason: &str) -> Self {
        Self { reply: Err(reason.to_string()), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TextExtractor for ScriptedExtractor {
    async fn extract_text(&self, _bytes: &[u8]) -> Result<String, error::SystemError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(reason) => Err(error::SystemError::upstream(reason.clone())),
        }
    }
}

enum Scripted {
    Reply(String),
    Empty,
    Failing,
}

pub struct ScriptedCompletion {
    script: Scripted,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedCompletion {
    fn new(script: Scripted) -> Self {
        Self { script, last_prompt: Mutex::new(None) }
    }

    pub fn reply(reply: &str) -> Self {
        Self::new(Scripted::Reply(reply.to_string()))
    }

    pub fn empty() -> Self {
        Self::new(Scripted::Empty)
    }

    pub fn failing() -> Self {
        Self::new(Scripted::Failing)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match &self.script {
            Scripted::Reply(reply) => Ok(reply.clone()),
            Scripted::Empty => Err(CompletionError::Empty),
            Scripted::Failing => Err(CompletionError::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "model overloaded".to_string(),
            }),
        }
    }
}

#[derive(Default)]
pub struct InMemoryUploadRepository {
    uploads: Mutex<Vec<UploadEntity>>,
    last_limit: Mutex<Option<i64>>,
    failing: bool,
}

impl InMemoryUploadRepository {
    pub fn failing() -> Self {
        Self { failing: true, ..Default::default() }
    }

    pub fn len(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<UploadEntity> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn last_limit(&self) -> Option<i64> {
        *self.last_limit.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl UploadRepository for InMemoryUploadRepository {
    async fn create(&self, upload: &NewUpload) -> Result<UploadEntity, error::SystemError> {
        if self.failing {
            return Err(error::SystemError::DatabaseError("connection refused".into()));
        }

        let entity = UploadEntity {
            id: Uuid::now_v7(),
            user_id: upload.user_id,
            file_name: upload.file_name.clone(),
            file_type: upload.file_type,
            file_size: upload.file_size,
            image_data: upload.image_data.clone(),
            extracted_text: upload.extracted_text.clone(),
            analysis: Json(upload.analysis.clone()),
            created_at: chrono::Utc::now(),
        };
        self.uploads.lock().unwrap().push(entity.clone());
        Ok(entity)
    }

    async fn find_by_user(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<UploadSummary>, error::SystemError> {
        *self.last_limit.lock().unwrap() = Some(limit);
        let uploads = self.uploads.lock().unwrap();
        Ok(uploads
            .iter()
            .rev()
            .filter(|u| &u.user_id == user_id)
            .take(limit.max(0) as usize)
            .cloned()
            .map(UploadSummary::from)
            .collect())
    }
}
