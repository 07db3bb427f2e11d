/// Builds the engagement-analysis prompt around `text`.
pub fn engagement_prompt(text: &str) -> String {
    format!(
        r##"You are a social media expert. Analyze the following text as if it were a social media post and provide detailed suggestions to improve engagement.

Text to analyze:
"""
{text}
"""

Provide your analysis in the following JSON format (respond ONLY with valid JSON, no additional text):
{{
  "summary": "A brief 2-3 sentence summary of the content",
  "suggestions": ["suggestion 1", "suggestion 2", "suggestion 3", "suggestion 4", "suggestion 5"],
  "hashtags": ["#hashtag1", "#hashtag2", "#hashtag3", "#hashtag4", "#hashtag5"],
  "bestTimeToPost": "Specific recommendation about when to post this content",
  "toneRecommendations": "Recommendations about the tone and style of the content"
}}

Focus on:
- Making the content more engaging
- Improving clarity and impact
- Suggesting relevant hashtags
- Optimal posting times
- Tone adjustments for better audience connection"##
    )
}
