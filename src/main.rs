use chatrelay::app::Application;
use chatrelay::cli::parser::Args;
use chatrelay::commands::create_command_registry;
use chatrelay::config::Config;
use chatrelay::core::error::ChatError;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

async fn run(args: Args) -> Result<(), ChatError> {
    let config = Config::load()?;
    let mut app = Application::new(args, config, create_command_registry())?;
    app.run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("chatrelay=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        eprintln!("{} {}", style("error:").bold().red(), e);
        if e.is_configuration() {
            eprintln!(
                "{} {}",
                style("hint:").bold().yellow(),
                style(format!("settings live in {}", Config::config_path().display())).dim()
            );
        }
        std::process::exit(1);
    }
}
