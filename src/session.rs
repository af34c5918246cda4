use crate::conversation::ConversationStore;
use crate::core::error::ChatError;
use crate::providers::{Dispatcher, Message, ProviderConfig};
use tracing::info;

/// One conversation with one provider.
///
/// `send` takes `&mut self`, so a conversation never has two requests in
/// flight and replies land in the transcript in the order they were asked.
pub struct ChatSession {
    store: ConversationStore,
    dispatcher: Dispatcher,
    provider: ProviderConfig,
    system_prompt: String,
}

impl ChatSession {
    pub fn new(
        dispatcher: Dispatcher,
        provider: ProviderConfig,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            store: ConversationStore::new(),
            dispatcher,
            provider,
            system_prompt: system_prompt.into(),
        }
    }

    /// Record `text` as a user turn, ask the provider, and record the reply.
    /// On failure the user turn stays and no assistant entry is added.
    pub async fn send(&mut self, text: &str) -> Result<String, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::Input("Message is empty".to_string()));
        }
        self.provider.ensure_credential()?;

        self.store.append(Message::user(text));
        let reply = self
            .dispatcher
            .dispatch(&self.provider, &self.system_prompt, self.store.snapshot())
            .await?;
        self.store.append(Message::assistant(reply.clone()));

        Ok(reply)
    }

    pub fn transcript(&self) -> &[Message] {
        self.store.snapshot()
    }

    pub fn reset(&mut self) {
        self.store.reset();
    }

    pub fn restore(&mut self, messages: Vec<Message>) {
        self.store.replace(messages);
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    pub fn switch_provider(&mut self, provider: ProviderConfig) {
        info!(provider = %provider.provider, model = %provider.model, "switching provider");
        self.provider = provider;
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.system_prompt = prompt.into();
    }
}
