//! /preset command - show and set the active preset

use super::CommandResult;
use crate::presets::{self, PRESETS, Preset};

pub struct PresetCommand;

impl PresetCommand {
    pub fn execute(args: &str, current: &Preset) -> CommandResult {
        if args.is_empty() {
            return CommandResult::Message(list_presets(current));
        }

        match presets::find(&args.to_lowercase()) {
            Some(preset) => CommandResult::SelectPreset(preset),
            None => CommandResult::Message(format!(
                "Unknown preset: '{}'\nUse /preset to list presets",
                args
            )),
        }
    }
}

fn list_presets(current: &Preset) -> String {
    let mut output = String::from("Presets:\n\n");

    for preset in PRESETS {
        let marker = if preset.id == current.id { " *" } else { "" };
        output.push_str(&format!(
            "  {:<16} {}{}\n",
            preset.id,
            preset.label(),
            marker
        ));
    }

    output.push_str("\nSet with: /preset <id>");
    output
}
