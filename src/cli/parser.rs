use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat with hosted LLMs from the terminal", long_about = None)]
pub struct Args {
    /// Message to send; piped stdin is added as context
    pub query: Option<String>,

    /// Start an interactive chat session
    #[arg(short, long)]
    pub chat: bool,

    /// AI provider to use [possible values: groq, openrouter, huggingface, openai]
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model to use (provider-specific)
    #[arg(short, long)]
    pub model: Option<String>,

    /// System instruction sent ahead of the conversation
    #[arg(short, long)]
    pub system: Option<String>,

    /// Log dispatch details to stderr
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_query() {
        let args = Args::try_parse_from(["chatrelay", "what is rust?"]).unwrap();
        assert_eq!(args.query.as_deref(), Some("what is rust?"));
        assert!(!args.chat);
        assert!(args.provider.is_none());
    }

    #[test]
    fn chat_mode_with_overrides() {
        let args = Args::try_parse_from([
            "chatrelay",
            "--chat",
            "-p",
            "huggingface",
            "-m",
            "google/flan-t5-large",
            "--system",
            "be terse",
        ])
        .unwrap();
        assert!(args.chat);
        assert!(args.query.is_none());
        assert_eq!(args.provider.as_deref(), Some("huggingface"));
        assert_eq!(args.model.as_deref(), Some("google/flan-t5-large"));
        assert_eq!(args.system.as_deref(), Some("be terse"));
    }
}
