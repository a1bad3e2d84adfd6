//! /provider command - list and switch API endpoints

use super::CommandResult;
use crate::providers::{self, PROVIDERS};

pub struct ProviderCommand;

impl ProviderCommand {
    pub fn execute(args: &str, current_id: &str) -> CommandResult {
        if args.is_empty() {
            return CommandResult::Message(list_providers(current_id));
        }

        match providers::find(args) {
            Some(provider) => CommandResult::SwitchProvider(provider),
            None => CommandResult::Message(format!(
                "Unknown provider: '{}'\nUse /provider to list providers",
                args
            )),
        }
    }
}

fn list_providers(current_id: &str) -> String {
    let mut output = String::from("Providers:\n\n");

    for provider in PROVIDERS {
        let marker = if provider.id == current_id { " *" } else { "" };
        let url = if provider.base_url.is_empty() {
            "(set baseUrl yourself)"
        } else {
            provider.base_url
        };
        output.push_str(&format!(
            "  {:<12} {:<12} {}{}\n",
            provider.id, provider.name, url, marker
        ));
    }

    output.push_str("\nSwitch with: /provider <id>");
    output
}
