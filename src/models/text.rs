use super::image::ImageData;
use serde::Deserialize;
use serde_json::Value;

/// One call to the text side of a generation backend.
#[derive(Debug, Clone, Default)]
pub struct TextRequest {
    pub prompt: String,
    pub use_search_grounding: bool,
    /// Images sent ahead of the prompt for multimodal calls.
    pub images: Vec<ImageData>,
    /// When set the backend asks for JSON matching this schema.
    pub response_schema: Option<Value>,
}

impl TextRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_grounding(mut self, enabled: bool) -> Self {
        self.use_search_grounding = enabled;
        self
    }

    pub fn with_images(mut self, images: Vec<ImageData>) -> Self {
        self.images = images;
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct GeminiGenerateResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(rename = "promptFeedback")]
    pub prompt_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiPart {
    pub text: Option<String>,
    #[serde(rename = "inlineData", alias = "inline_data")]
    pub inline_data: Option<GeminiInlineData>,
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Deserialize)]
pub struct GeminiInlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    pub mime_type: String,
    pub data: String,
}

impl GeminiGenerateResponse {
    /// Concatenated answer text of the first candidate, thoughts excluded.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text = parts
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    pub fn first_inline_data(&self) -> Option<&GeminiInlineData> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .find_map(|part| part.inline_data.as_ref())
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct ClaudeResponse {
    #[serde(default)]
    pub content: Vec<ClaudeContentBlock>,
    pub stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClaudeContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

impl ClaudeResponse {
    pub fn text(&self) -> Option<String> {
        let text = self
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_text_skips_thoughts() {
        let raw = r#"{"candidates":[{"content":{"parts":[
            {"text":"weighing options","thought":true},
            {"text":"  Make the sofa blue. "}
        ]},"finishReason":"STOP"}]}"#;
        let response: GeminiGenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some("Make the sofa blue."));
        assert_eq!(response.finish_reason(), Some("STOP"));
    }

    #[test]
    fn test_gemini_inline_data_accepts_snake_case() {
        let raw = r#"{"candidates":[{"content":{"parts":[
            {"text":"here you go"},
            {"inline_data":{"mime_type":"image/png","data":"AQID"}}
        ]}}]}"#;
        let response: GeminiGenerateResponse = serde_json::from_str(raw).unwrap();
        let inline = response.first_inline_data().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "AQID");
    }

    #[test]
    fn test_empty_candidates_have_no_text() {
        let response: GeminiGenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(response.text().is_none());
        assert!(response.first_inline_data().is_none());
    }

    #[test]
    fn test_claude_text_joins_text_blocks() {
        let raw = r#"{"content":[{"type":"text","text":"PERFECT"}],"stop_reason":"end_turn"}"#;
        let response: ClaudeResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text().as_deref(), Some("PERFECT"));
    }
}
