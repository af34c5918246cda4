use crate::core::error::ChatError;
use crate::providers::{ShapeRequest, WireShape, non_blank_reply};
use serde::{Deserialize, Serialize};

const MAX_NEW_TOKENS: u32 = 512;
const TEMPERATURE: f64 = 0.7;

#[derive(Serialize)]
struct TextGenerationRequest {
    inputs: String,
    parameters: GenerationParameters,
}

#[derive(Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f64,
}

#[derive(Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: Option<String>,
}

/// Text-generation schema for inference endpoints without a chat format:
/// the whole context is flattened into one `role: content` prompt.
pub struct PromptConcatenationShape;

pub fn flatten_prompt(request: &ShapeRequest<'_>) -> String {
    request
        .context()
        .map(|(role, content)| format!("{}: {}", role, content))
        .collect::<Vec<_>>()
        .join("\n")
}

impl WireShape for PromptConcatenationShape {
    fn build_request(&self, request: &ShapeRequest<'_>) -> Result<serde_json::Value, ChatError> {
        let payload = TextGenerationRequest {
            inputs: flatten_prompt(request),
            parameters: GenerationParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                temperature: TEMPERATURE,
            },
        };
        Ok(serde_json::to_value(payload)?)
    }

    fn parse_response(&self, body: &str) -> Result<String, ChatError> {
        let parsed: Vec<GeneratedText> = serde_json::from_str(body).map_err(|e| {
            ChatError::Protocol(format!("Malformed text generation response: {}", e))
        })?;

        let text = parsed
            .into_iter()
            .next()
            .and_then(|first| first.generated_text);

        non_blank_reply(text, "generated text")
    }
}
