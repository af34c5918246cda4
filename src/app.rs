use crate::cli::parser::Args;
use crate::commands::{ChatState, CommandDispatcher};
use crate::config::{Config, Provider};
use crate::conversation::history::HistoryDir;
use crate::core::error::ChatError;
use crate::display::{self, LoadingIndicator};
use crate::input;
use crate::providers::{Dispatcher, Role};
use crate::session::ChatSession;
use is_terminal::IsTerminal;
use std::io::{self, Read};
use std::time::Duration;
use tracing::info;

pub struct Application {
    pub args: Args,
    pub state: ChatState,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    /// Resolve the provider and build the session. Configuration problems
    /// surface here, before anything is sent.
    pub fn new(
        args: Args,
        config: Config,
        command_dispatcher: CommandDispatcher,
    ) -> Result<Self, ChatError> {
        let provider = args
            .provider
            .as_deref()
            .map(str::parse::<Provider>)
            .transpose()?;
        let resolved = config.resolve(provider, args.model.as_deref())?;
        let dispatcher = Dispatcher::with_http(config.timeout_secs.map(Duration::from_secs))?;
        let system_prompt = args
            .system
            .clone()
            .unwrap_or_else(|| config.system_prompt.clone());

        info!(provider = %resolved.provider, model = %resolved.model, "session ready");
        let session = ChatSession::new(dispatcher, resolved, system_prompt);
        let state = ChatState::new(
            session,
            config,
            Config::config_path(),
            HistoryDir::new(Config::history_dir()),
        );

        Ok(Self {
            args,
            state,
            command_dispatcher,
        })
    }

    pub async fn run(&mut self) -> Result<(), ChatError> {
        let context = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ChatError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        if self.args.chat {
            self.handle_continuous_chat_mode().await
        } else {
            self.handle_chat_mode(context).await
        }
    }

    /// One dispatch with the loading placeholder around it. The reply is
    /// rendered; failures go back to the caller.
    async fn exchange(&mut self, text: &str) -> Result<(), ChatError> {
        let loading = LoadingIndicator::show("thinking...");
        let result = self.state.session.send(text).await;
        loading.remove();

        let reply = result?;
        display::render_message(Role::Assistant, &reply, &chrono::Local::now());
        Ok(())
    }

    async fn handle_continuous_chat_mode(&mut self) -> Result<(), ChatError> {
        display::display_banner(self.state.session.provider());

        let history_path = Config::input_history_path();
        let mut editor = input::create_editor(self.command_dispatcher.clone(), &history_path)?;

        while self.state.should_continue {
            let Some(line) = input::read_input(&mut editor)? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('/') {
                match self.command_dispatcher.execute_line(line, &mut self.state) {
                    Some(Ok(Some(output))) => println!("{}", output),
                    Some(Ok(None)) | None => {}
                    Some(Err(e)) => eprintln!("Error executing command: {}", e),
                }
                continue;
            }

            match self.exchange(line).await {
                Ok(()) => {}
                Err(ChatError::Input(msg)) => display::display_hint(&msg),
                Err(e) => {
                    let text = format!("Error: {}", e);
                    display::render_message(Role::Assistant, &text, &chrono::Local::now());
                    if e.is_configuration() {
                        display::display_hint(
                            "Fix the settings, or switch with /provider <name>, then retry.",
                        );
                    }
                }
            }
        }

        input::save_history(&mut editor, &history_path)?;
        Ok(())
    }

    async fn handle_chat_mode(&mut self, context: Option<String>) -> Result<(), ChatError> {
        let final_query = match (self.args.query.as_deref(), context) {
            (Some(arg_q), Some(stdin_ctx)) => format!("<pipe>{}</pipe>\n\n{}", stdin_ctx, arg_q),
            (None, Some(stdin_ctx)) => format!("<pipe>{}</pipe>", stdin_ctx),
            (Some(arg_q), None) => arg_q.to_string(),
            (None, None) => {
                return Err(ChatError::Input(
                    "No query provided (pass a message, pipe input, or use --chat)".to_string(),
                ));
            }
        };

        self.exchange(&final_query).await
    }
}
