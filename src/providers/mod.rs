use crate::config::Provider;
use crate::core::error::ChatError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod base_client;
pub mod chat_completions;
pub mod dispatcher;
pub mod profile;
pub mod prompt_concat;

pub use base_client::{HttpClient, HttpReply, Transport};
pub use dispatcher::{DispatchPhase, Dispatcher};
pub use profile::{ModelInfo, ProviderProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Everything needed to reach one provider, resolved once from settings and
/// treated as read-only while a dispatch runs.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub endpoint: String,
    pub model: String,
    pub credential: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ProviderConfig {
    pub fn ensure_credential(&self) -> Result<(), ChatError> {
        if self.credential.trim().is_empty() {
            return Err(ChatError::Configuration(format!(
                "No API key configured for {}; set providers.{}.api_key in the config file \
                 or export {}",
                self.provider,
                self.provider,
                self.provider.profile().api_key_env
            )));
        }
        Ok(())
    }
}

/// Wire schema a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    ChatCompletions,
    PromptConcatenation,
}

impl Shape {
    pub fn strategy(self) -> &'static dyn WireShape {
        match self {
            Shape::ChatCompletions => &chat_completions::ChatCompletionsShape,
            Shape::PromptConcatenation => &prompt_concat::PromptConcatenationShape,
        }
    }
}

/// Uniform request handed to a shape strategy.
#[derive(Debug, Clone, Copy)]
pub struct ShapeRequest<'a> {
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub transcript: &'a [Message],
}

impl<'a> ShapeRequest<'a> {
    /// The system instruction followed by the transcript, in order. The
    /// instruction is sent even when empty.
    pub fn context(&self) -> impl Iterator<Item = (Role, &'a str)> + 'a {
        std::iter::once((Role::System, self.system_prompt)).chain(
            self.transcript
                .iter()
                .map(|m| (m.role, m.content.as_str())),
        )
    }
}

pub trait WireShape: Send + Sync {
    fn build_request(&self, request: &ShapeRequest<'_>) -> Result<serde_json::Value, ChatError>;

    fn parse_response(&self, body: &str) -> Result<String, ChatError>;
}

/// Shared reply check: absent or blank text is a protocol failure. The text
/// itself is returned as sent.
pub(crate) fn non_blank_reply(text: Option<String>, what: &str) -> Result<String, ChatError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(ChatError::Protocol(format!("No {} in API response", what))),
    }
}
