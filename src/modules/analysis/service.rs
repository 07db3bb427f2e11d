use log::{info, warn};
use std::sync::Arc;

use crate::api::error;
use crate::modules::analysis::{
    gemini::{CompletionClient, CompletionError},
    model::AnalysisResult,
    parse::parse_analysis,
    prompt::engagement_prompt,
};

#[derive(Clone)]
pub struct AnalysisService {
    client: Option<Arc<dyn CompletionClient + Send + Sync>>,
}

impl AnalysisService {
    /// `client` is `None` when no AI credential is configured.
    pub fn with_dependencies(client: Option<Arc<dyn CompletionClient + Send + Sync>>) -> Self {
        if client.is_none() {
            warn!("AnalysisService initialized without a completion client");
        } else {
            info!("AnalysisService initialized with dependencies");
        }
        AnalysisService { client }
    }

    /// Asks the model for engagement suggestions. An unusable reply degrades
    /// to [`AnalysisResult::fallback`]; only a failed call is an error.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, error::SystemError> {
        let client = self.client.as_ref().ok_or_else(|| {
            error::SystemError::not_configured(
                "API key not configured. Please add GEMINI_API_KEY to environment variables.",
            )
        })?;

        let reply = match client.complete(&engagement_prompt(text)).await {
            Ok(reply) => reply,
            Err(CompletionError::Empty) => {
                warn!("Model returned an empty reply, using fallback analysis");
                return Ok(AnalysisResult::fallback());
            }
            Err(e) => return Err(error::SystemError::upstream(e.to_string())),
        };

        match parse_analysis(&reply) {
            Ok(analysis) => Ok(analysis),
            Err(e) => {
                warn!("JSON parse error: {}", e);
                warn!("Raw response: {}", reply);
                Ok(AnalysisResult::fallback())
            }
        }
    }
}
