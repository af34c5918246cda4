use super::{
    ChatState,
    handler::{
        ClearCommand, DeleteHistoryCommand, HelpCommand, ListHistoryCommand, LoadHistoryCommand,
        ModelCommand, ModelsCommand, ProviderCommand, QuitCommand, SaveHistoryCommand,
        SystemCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::ChatError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    /// Run a `/name arg...` line. Returns `None` when `line` is not a command.
    pub fn execute_line(
        &self,
        line: &str,
        state: &mut ChatState,
    ) -> Option<Result<Option<String>, ChatError>> {
        let rest = line.trim().strip_prefix('/')?;
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let (command, args) = parts.split_first()?;
        Some(self.execute(command, args, state))
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        state: &mut ChatState,
    ) -> Result<Option<String>, ChatError> {
        self.registry.execute(command, args, state)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("clear", ClearCommand);
    registry.register("model", ModelCommand);
    registry.register("models", ModelsCommand);
    registry.register("provider", ProviderCommand);
    registry.register("system", SystemCommand);
    registry.register("save", SaveHistoryCommand);
    registry.register("load", LoadHistoryCommand);
    registry.register("list", ListHistoryCommand);
    registry.register("delete", DeleteHistoryCommand);

    CommandDispatcher::new(Arc::new(registry))
}
