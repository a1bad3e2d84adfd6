//! Slash commands for interactive mode

mod model;
mod preset;
mod provider;
mod session;

pub use model::ModelCommand;
pub use preset::PresetCommand;
pub use provider::ProviderCommand;
pub use session::SessionCommand;

use crate::presets::{self, Preset};
use crate::providers::ApiProvider;
use flick_ai::ClientConfig;

/// Read-only view of the interactive state commands inspect
pub struct CommandContext<'a> {
    pub preset: &'static Preset,
    pub config: &'a ClientConfig,
    pub provider_id: &'a str,
    pub context_len: usize,
}

/// Result of executing a slash command
#[derive(Debug)]
pub enum CommandResult {
    /// Forget the conversation
    NewConversation,
    /// Switch the active preset
    SelectPreset(&'static Preset),
    /// Point the client at another provider
    SwitchProvider(&'static ApiProvider),
    /// Change the model name
    SwitchModel(String),
    /// Fetch and print the endpoint's model list
    ListRemoteModels,
    /// Print recent questions
    ShowHistory,
    /// Show a message to the user (not sent to the model)
    Message(String),
    /// Exit the application
    Exit,
    /// Unknown command
    Unknown(String),
}

/// Parse and execute a slash command; `None` if `input` is not one
pub fn execute_command(input: &str, ctx: &CommandContext<'_>) -> Option<CommandResult> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let parts: Vec<&str> = rest.splitn(2, ' ').collect();
    let command = parts[0].to_lowercase();
    let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

    Some(match command.as_str() {
        "help" | "h" | "?" => CommandResult::Message(help_message()),

        "new" | "clear" | "c" => CommandResult::NewConversation,

        "quit" | "exit" | "q" => CommandResult::Exit,

        "preset" | "p" => PresetCommand::execute(args, ctx.preset),

        "default" => CommandResult::SelectPreset(presets::default_preset()),

        "provider" => ProviderCommand::execute(args, ctx.provider_id),

        "model" | "m" => ModelCommand::execute(args, ctx.provider_id),

        "history" => CommandResult::ShowHistory,

        "session" | "s" => SessionCommand::execute(ctx),

        other => match presets::for_shortcut(other) {
            Some(preset) => CommandResult::SelectPreset(preset),
            None => CommandResult::Unknown(command),
        },
    })
}

fn help_message() -> String {
    let mut help = String::from(
        r#"Available commands:
  /help, /h, /?         Show this help message
  /new, /clear, /c      Start a new conversation
  /preset, /p [id]      List presets or switch to one
  /default              Back to plain chat (no preset)
  /provider [id]        List providers or switch endpoint
  /model, /m [name]     List the endpoint's models or switch model
  /history              Show recent questions
  /session, /s          Show current settings and context size
  /quit, /exit, /q      Exit flick

Preset shortcuts:
"#,
    );
    for (command, id) in presets::SHORTCUTS {
        if let Some(preset) = presets::find(id) {
            help.push_str(&format!("  /{:<20} {}\n", command, preset.label()));
        }
    }
    help.push_str("\nPress Ctrl-C while an answer streams to stop it.");
    help
}
