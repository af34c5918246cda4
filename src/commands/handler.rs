use super::ChatState;
use crate::config::Provider;
use crate::conversation::history::HistoryDir;
use crate::core::error::ChatError;
use crate::providers::Role;

use console::style;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ClearCommand;
pub struct ModelCommand;
pub struct ModelsCommand;
pub struct ProviderCommand;
pub struct SystemCommand;
pub struct SaveHistoryCommand;
pub struct LoadHistoryCommand;
pub struct ListHistoryCommand;
pub struct DeleteHistoryCommand;

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(&self, _state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = [
            title.to_string(),
            QuitCommand.help().to_string(),
            HelpCommand.help().to_string(),
            ClearCommand.help().to_string(),
            ModelCommand.help().to_string(),
            ModelsCommand.help().to_string(),
            ProviderCommand.help().to_string(),
            SystemCommand.help().to_string(),
            SaveHistoryCommand.help().to_string(),
            LoadHistoryCommand.help().to_string(),
            ListHistoryCommand.help().to_string(),
            DeleteHistoryCommand.help().to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let count = state.session.transcript().len();
        let confirmed = matches!(args.first(), Some(&"confirm") | Some(&"-y"));
        if count > 0 && !confirmed {
            return Ok(Some(format!(
                "This drops {} message(s). Run {} to clear them.",
                count,
                style("/clear confirm").bold()
            )));
        }

        state.session.reset();
        Ok(Some("Chat history cleared.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/clear [confirm] - Clear conversation history"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let Some(&model) = args.first() else {
            return Ok(Some(format!("Current model: {}", state.session.provider().model)));
        };

        // Re-resolve so endpoints that embed the model follow the change
        let provider = state.session.provider().provider;
        let resolved = state.config.resolve(Some(provider), Some(model))?;
        let message = format!("Model changed to: {}", resolved.model);
        state.session.switch_provider(resolved);
        state.persist_settings()?;
        Ok(Some(message))
    }

    fn help(&self) -> &'static str {
        "/model <name> - Show or change the current model"
    }
}

impl CommandHandler for ModelsCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        let current = state.session.provider();
        let mut lines = vec![format!("Known models for {}:", current.provider)];
        for model in current.provider.profile().models {
            let marker = if model.id == current.model { "*" } else { " " };
            lines.push(format!("{} {:<42} {}", marker, model.id, style(model.label).dim()));
        }
        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/models - List known models for the current provider"
    }
}

impl CommandHandler for ProviderCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let Some(name) = args.first() else {
            let current = state.session.provider();
            return Ok(Some(format!(
                "Current provider: {} ({})",
                current.provider, current.endpoint
            )));
        };

        let provider: Provider = name.parse()?;
        let resolved = state.config.resolve(Some(provider), None)?;
        let message = format!(
            "Provider changed to: {} (model {})",
            resolved.provider, resolved.model
        );
        state.session.switch_provider(resolved);
        state.persist_settings()?;
        Ok(Some(message))
    }

    fn help(&self) -> &'static str {
        "/provider <name> - Show or change the provider (groq, openrouter, huggingface, openai)"
    }
}

impl CommandHandler for SystemCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        if args.is_empty() {
            return Ok(Some(format!(
                "Current system instruction: {}",
                state.session.system_prompt()
            )));
        }
        state.session.set_system_prompt(args.join(" "));
        state.persist_settings()?;
        Ok(Some("System instruction updated.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/system <text> - Show or change the system instruction"
    }
}

impl CommandHandler for SaveHistoryCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let filename = match args.first() {
            Some(name) => name.to_string(),
            None => HistoryDir::default_name(),
        };

        let path = state.history.save(&filename, state.session.transcript())?;
        Ok(Some(format!("History saved to: {}", path.display())))
    }

    fn help(&self) -> &'static str {
        "/save <filename> - Save conversation history to file"
    }
}

impl CommandHandler for LoadHistoryCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let Some(filename) = args.first() else {
            return Ok(Some("Please specify a filename".to_string()));
        };

        let messages = state.history.load(filename)?;
        state.session.restore(messages);

        let mut lines = Vec::new();
        for msg in state.session.transcript() {
            let role = match msg.role {
                Role::User => "User",
                _ => "Assistant",
            };
            lines.push(format!("{}: {}", style(role).bold().cyan(), msg.content));
        }
        lines.push(format!(
            "History loaded from: {}",
            state.history.root().join(filename).display()
        ));
        Ok(Some(lines.join("\n")))
    }

    fn help(&self) -> &'static str {
        "/load <filename> - Load conversation history from file"
    }
}

impl CommandHandler for ListHistoryCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, ChatError> {
        let files = state.history.list()?;
        if files.is_empty() {
            Ok(Some("No history files found.".to_string()))
        } else {
            Ok(Some(files.join("\n")))
        }
    }

    fn help(&self) -> &'static str {
        "/list - List available conversation history files"
    }
}

impl CommandHandler for DeleteHistoryCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, ChatError> {
        let Some(filename) = args.first() else {
            return Ok(Some("Please specify a filename to delete".to_string()));
        };

        let path = state.history.delete(filename)?;
        Ok(Some(format!("Deleted history file: {}", path.display())))
    }

    fn help(&self) -> &'static str {
        "/delete <filename> - Delete a conversation history file"
    }
}
