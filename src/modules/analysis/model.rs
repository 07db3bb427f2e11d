use serde::{Deserialize, Serialize};

pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze text. Please try again.";
pub const NO_TEXT_MESSAGE: &str = "No text provided for analysis";

/// Body of `POST /analyze`. `text` is kept loose so a non-string value can be
/// answered with the same message as a missing one.
#[derive(Debug, Deserialize)]
pub struct AnalyzeModel {
    #[serde(default)]
    pub text: Option<serde_json::Value>,
}

impl AnalyzeModel {
    pub fn text(&self) -> Option<&str> {
        self.text.as_ref().and_then(serde_json::Value::as_str).filter(|t| !t.trim().is_empty())
    }
}

/// Engagement suggestions for a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub suggestions: Vec<String>,
    pub hashtags: Vec<String>,
    pub best_time_to_post: String,
    pub tone_recommendations: String,
}

impl AnalysisResult {
    /// Generic advice returned when the model's answer can't be used.
    pub fn fallback() -> Self {
        Self {
            summary: "Unable to parse AI response properly.".to_string(),
            suggestions: vec![
                "Add compelling hooks in the first line".to_string(),
                "Include a clear call-to-action".to_string(),
                "Use emojis to increase visual appeal".to_string(),
                "Ask questions to encourage engagement".to_string(),
                "Keep paragraphs short and scannable".to_string(),
            ],
            hashtags: vec![
                "#socialmedia".to_string(),
                "#content".to_string(),
                "#engagement".to_string(),
                "#marketing".to_string(),
                "#digital".to_string(),
            ],
            best_time_to_post:
                "Weekdays between 9-11 AM or 1-3 PM when engagement is typically highest"
                    .to_string(),
            tone_recommendations:
                "Use a conversational and authentic tone that resonates with your audience"
                    .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_non_empty_strings_count_as_text() {
        let parse = |body: &str| serde_json::from_str::<AnalyzeModel>(body).unwrap();

        assert_eq!(parse(r#"{"text":"hello"}"#).text(), Some("hello"));
        assert_eq!(parse(r#"{"text":123}"#).text(), None);
        assert_eq!(parse(r#"{"text":""}"#).text(), None);
        assert_eq!(parse(r#"{"text":null}"#).text(), None);
        assert_eq!(parse(r#"{}"#).text(), None);
    }

    #[test]
    fn fallback_has_five_of_each() {
        let fallback = AnalysisResult::fallback();
        assert_eq!(fallback.suggestions.len(), 5);
        assert_eq!(fallback.hashtags.len(), 5);
        assert!(fallback.hashtags.iter().all(|h| h.starts_with('#')));
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(AnalysisResult::fallback()).unwrap();
        assert!(value.get("bestTimeToPost").is_some());
        assert!(value.get("toneRecommendations").is_some());
    }
}
