use crate::providers::{ProviderConfig, Role};
use chrono::{DateTime, Local};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

fn role_label(role: Role) -> &'static str {
    match role {
        Role::System => "⚙ System",
        Role::User => "👤 You",
        Role::Assistant => "🤖 Assistant",
    }
}

/// Plain header text for one message: label and `HH:MM` time.
pub fn message_header(role: Role, timestamp: &DateTime<Local>) -> String {
    format!("{}  {}", role_label(role), timestamp.format("%H:%M"))
}

/// Print one message. Assistant text is rendered as markdown so code
/// blocks and inline code keep their shape.
pub fn render_message(role: Role, text: &str, timestamp: &DateTime<Local>) {
    let header = message_header(role, timestamp);
    let header = match role {
        Role::Assistant => style(header).bold().blue(),
        Role::User => style(header).bold().green(),
        Role::System => style(header).bold().dim(),
    };
    println!("\n{}", header);

    match role {
        Role::Assistant => display_markdown(text),
        _ => println!("{}", text),
    }
}

pub fn display_markdown(text: &str) {
    let skin = termimad::MadSkin::default();
    skin.print_text(text);
}

pub fn display_hint(text: &str) {
    println!("{} {}", style("hint:").bold().yellow(), style(text).dim());
}

pub fn display_banner(provider: &ProviderConfig) {
    println!(
        "{} {} {}",
        style("chatrelay").bold().magenta(),
        style(format!("· {}", provider.provider)).cyan(),
        style(format!("· {}", provider.model)).dim()
    );
    println!(
        "{}",
        style("Type '/help' for commands. Press Ctrl+D or type /quit to exit.").dim()
    );
}

/// Spinner shown while a request is in flight. Dropping it clears the line,
/// so no early return can leave it on screen.
pub struct LoadingIndicator {
    spinner: ProgressBar,
}

impl LoadingIndicator {
    pub fn show(message: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(spinner_style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    pub fn remove(self) {
        drop(self);
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn header_shows_role_and_minutes() {
        let at = Local.with_ymd_and_hms(2026, 3, 1, 9, 5, 42).unwrap();
        assert_eq!(message_header(Role::Assistant, &at), "🤖 Assistant  09:05");
        assert_eq!(message_header(Role::User, &at), "👤 You  09:05");
    }

    #[test]
    fn loading_indicator_clears_on_remove() {
        let indicator = LoadingIndicator::show("thinking...");
        let spinner = indicator.spinner.clone();
        indicator.remove();
        assert!(spinner.is_finished());
    }
}
