use crate::core::error::ChatError;
use crate::providers::{ShapeRequest, WireShape, non_blank_reply};
use serde::{Deserialize, Serialize};

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 1024;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<MessageContent>,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-style `chat/completions` schema, spoken by Groq, OpenRouter and
/// OpenAI itself.
pub struct ChatCompletionsShape;

impl WireShape for ChatCompletionsShape {
    fn build_request(&self, request: &ShapeRequest<'_>) -> Result<serde_json::Value, ChatError> {
        let payload = ChatCompletionRequest {
            model: request.model,
            messages: request
                .context()
                .map(|(role, content)| ChatCompletionMessage {
                    role: role.as_str(),
                    content,
                })
                .collect(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        Ok(serde_json::to_value(payload)?)
    }

    fn parse_response(&self, body: &str) -> Result<String, ChatError> {
        let parsed: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
            ChatError::Protocol(format!("Malformed chat completion response: {}", e))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);

        non_blank_reply(content, "message content")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Message;
    use serde_json::json;

    #[test]
    fn payload_prepends_system_message() {
        let transcript = vec![Message::user("hi")];
        let payload = ChatCompletionsShape
            .build_request(&ShapeRequest {
                model: "llama-3.1-8b-instant",
                system_prompt: "be terse",
                transcript: &transcript,
            })
            .unwrap();

        assert_eq!(
            payload,
            json!({
                "model": "llama-3.1-8b-instant",
                "messages": [
                    {"role": "system", "content": "be terse"},
                    {"role": "user", "content": "hi"}
                ],
                "temperature": 0.7,
                "max_tokens": 1024
            })
        );
    }

    #[test]
    fn payload_keeps_transcript_order() {
        let transcript = vec![
            Message::user("one"),
            Message::assistant("two"),
            Message::user("three"),
        ];
        let payload = ChatCompletionsShape
            .build_request(&ShapeRequest {
                model: "m",
                system_prompt: "sys",
                transcript: &transcript,
            })
            .unwrap();

        let contents: Vec<&str> = payload["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["sys", "one", "two", "three"]);
    }

    #[test]
    fn extracts_first_choice_content() {
        let body = r#"{"choices":[{"message":{"content":"ok"}},{"message":{"content":"no"}}]}"#;
        assert_eq!(ChatCompletionsShape.parse_response(body).unwrap(), "ok");
    }

    #[test]
    fn reply_whitespace_is_preserved() {
        let body = r#"{"choices":[{"message":{"content":"    let x = 1;\n"}}]}"#;
        assert_eq!(
            ChatCompletionsShape.parse_response(body).unwrap(),
            "    let x = 1;\n"
        );
    }

    #[test]
    fn empty_system_prompt_is_still_sent_first() {
        let transcript = vec![Message::user("hi")];
        let payload = ChatCompletionsShape
            .build_request(&ShapeRequest {
                model: "m",
                system_prompt: "",
                transcript: &transcript,
            })
            .unwrap();
        assert_eq!(
            payload["messages"],
            json!([
                {"role": "system", "content": ""},
                {"role": "user", "content": "hi"}
            ])
        );
    }

    #[test]
    fn missing_content_is_a_protocol_error() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{}}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":""}}]}"#,
            r#"{"id":"x"}"#,
        ] {
            let err = ChatCompletionsShape.parse_response(body).unwrap_err();
            assert!(matches!(err, ChatError::Protocol(_)), "body {body} gave {err:?}");
        }
    }

    #[test]
    fn non_json_success_body_is_a_protocol_error() {
        let err = ChatCompletionsShape.parse_response("<html>").unwrap_err();
        assert!(matches!(err, ChatError::Protocol(_)));
    }
}
