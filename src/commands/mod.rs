pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::config::Config;
use crate::conversation::history::HistoryDir;
use crate::core::error::ChatError;
use crate::session::ChatSession;
pub use dispatcher::{CommandDispatcher, create_command_registry};
use std::path::PathBuf;
use tracing::debug;

/// Everything a slash command may read or change during a chat.
pub struct ChatState {
    pub session: ChatSession,
    pub config: Config,
    /// Where `config` is written back when a setting changes.
    pub config_path: PathBuf,
    pub history: HistoryDir,
    pub should_continue: bool,
}

impl ChatState {
    pub fn new(
        session: ChatSession,
        config: Config,
        config_path: PathBuf,
        history: HistoryDir,
    ) -> Self {
        Self {
            session,
            config,
            config_path,
            history,
            should_continue: true,
        }
    }

    /// Store the session's provider, model and system instruction in the
    /// settings file so the next run starts from them.
    pub fn persist_settings(&mut self) -> Result<(), ChatError> {
        let current = self.session.provider();
        self.config.active_provider = Some(current.provider);
        self.config
            .providers
            .entry(current.provider)
            .or_default()
            .model = Some(current.model.clone());
        self.config.system_prompt = self.session.system_prompt().to_string();

        self.config.save_to(&self.config_path)?;
        debug!(path = %self.config_path.display(), "settings saved");
        Ok(())
    }
}
