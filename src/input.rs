use crate::commands::CommandDispatcher;
use crate::core::error::ChatError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};
use std::path::Path;

/// Line-editor helper: completes slash commands and hints from history.
pub struct ChatHelper {
    commands: CommandDispatcher,
    history_hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(commands: CommandDispatcher) -> Self {
        Self {
            commands,
            history_hinter: HistoryHinter {},
        }
    }

    /// Command names starting with what follows the leading `/`.
    pub fn command_candidates(&self, line: &str, pos: usize) -> Option<Vec<Pair>> {
        let typed = line.get(..pos)?.strip_prefix('/')?;
        if typed.contains(char::is_whitespace) {
            return None;
        }
        let matches: Vec<Pair> = self
            .commands
            .get_command_names()
            .into_iter()
            .filter(|cmd| cmd.starts_with(typed))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd,
            })
            .collect();
        (!matches.is_empty()).then_some(matches)
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        match self.command_candidates(line, pos) {
            // 1 is the position after '/'
            Some(matches) => Ok((1, matches)),
            None => Ok((pos, Vec::new())),
        }
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {}

impl Validator for ChatHelper {}

/// Creates a configured rustyline editor with persisted input history
pub fn create_editor(
    commands: CommandDispatcher,
    history_path: &Path,
) -> Result<Editor<ChatHelper, FileHistory>, ChatError> {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| ChatError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(ChatHelper::new(commands)));

    // A missing history file just means a first run
    let _ = editor.load_history(history_path);

    Ok(editor)
}

/// Reads a line of input; `None` means the user asked to leave
pub fn read_input(
    editor: &mut Editor<ChatHelper, FileHistory>,
) -> Result<Option<String>, ChatError> {
    let prompt = if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        "> ".to_string()
    } else {
        style("> ").bold().cyan().to_string()
    };
    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor
                    .add_history_entry(line.as_str())
                    .map_err(|e| ChatError::Input(format!("Failed to add history entry: {}", e)))?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(ChatError::Input(format!("Input error: {}", err))),
    }
}

pub fn save_history(
    editor: &mut Editor<ChatHelper, FileHistory>,
    history_path: &Path,
) -> Result<(), ChatError> {
    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    editor
        .save_history(history_path)
        .map_err(|e| ChatError::Input(format!("Failed to save history: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_command_registry;

    fn names(pairs: Option<Vec<Pair>>) -> Vec<String> {
        pairs
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.replacement)
            .collect()
    }

    #[test]
    fn completes_command_prefix() {
        let helper = ChatHelper::new(create_command_registry());
        assert_eq!(
            names(helper.command_candidates("/mo", 3)),
            vec!["model", "models"]
        );
        assert_eq!(names(helper.command_candidates("/q", 2)), vec!["quit"]);
    }

    #[test]
    fn plain_text_and_arguments_are_not_completed() {
        let helper = ChatHelper::new(create_command_registry());
        assert!(helper.command_candidates("hello", 5).is_none());
        assert!(helper.command_candidates("/model gp", 9).is_none());
        assert!(helper.command_candidates("/zzz", 4).is_none());
    }
}
