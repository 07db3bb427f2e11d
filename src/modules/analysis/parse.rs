use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::modules::analysis::model::AnalysisResult;

lazy_static::lazy_static! {
    // greedy: first `{` through last `}`
    static ref JSON_OBJECT: Regex = Regex::new(r"(?s)\{.*\}").expect("valid regex");
}

#[derive(Error, Debug)]
pub enum AnalysisParseError {
    #[error("No JSON found in response")]
    NoJson,

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response structure: `{0}` is missing")]
    Missing(&'static str),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    summary: Option<String>,
    suggestions: Option<Vec<String>>,
    hashtags: Option<Vec<String>>,
    best_time_to_post: Option<String>,
    tone_recommendations: Option<String>,
}

fn normalize_hashtag(tag: &str) -> Option<String> {
    let tag = tag.trim().trim_start_matches('#').trim();
    if tag.is_empty() {
        return None;
    }
    Some(format!("#{tag}"))
}

/// Pulls the first JSON object out of a model reply and checks it has a
/// summary plus list-valued suggestions and hashtags.
pub fn parse_analysis(reply: &str) -> Result<AnalysisResult, AnalysisParseError> {
    let json = JSON_OBJECT.find(reply).ok_or(AnalysisParseError::NoJson)?;
    let raw: RawAnalysis = serde_json::from_str(json.as_str())?;

    let summary = raw
        .summary
        .filter(|s| !s.trim().is_empty())
        .ok_or(AnalysisParseError::Missing("summary"))?;
    let suggestions = raw.suggestions.ok_or(AnalysisParseError::Missing("suggestions"))?;
    let hashtags = raw.hashtags.ok_or(AnalysisParseError::Missing("hashtags"))?;

    Ok(AnalysisResult {
        summary,
        suggestions,
        hashtags: hashtags.iter().filter_map(|t| normalize_hashtag(t)).collect(),
        best_time_to_post: raw.best_time_to_post.unwrap_or_default(),
        tone_recommendations: raw.tone_recommendations.unwrap_or_default(),
    })
}
