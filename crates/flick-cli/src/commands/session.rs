//! /session command - show current settings and context size

use super::{CommandContext, CommandResult};
use flick_agent::MAX_CONTEXT_MESSAGES;

pub struct SessionCommand;

impl SessionCommand {
    pub fn execute(ctx: &CommandContext<'_>) -> CommandResult {
        let mut output = String::from("Session Info\n");
        output.push_str(&"-".repeat(40));
        output.push('\n');

        output.push_str(&format!("Provider:   {}\n", ctx.provider_id));
        output.push_str(&format!("Endpoint:   {}\n", ctx.config.chat_completions_url()));
        output.push_str(&format!("Model:      {}\n", ctx.config.model_name));
        output.push_str(&format!(
            "API key:    {}\n",
            if ctx.config.has_api_key() {
                mask_key(&ctx.config.api_key)
            } else {
                "(not set)".to_string()
            }
        ));
        output.push_str(&format!("Preset:     {}\n", ctx.preset.label()));
        output.push('\n');
        output.push_str(&format!(
            "Context:    {} / {} messages\n",
            ctx.context_len, MAX_CONTEXT_MESSAGES
        ));

        CommandResult::Message(output)
    }
}

/// Show only the last four characters of a key
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
