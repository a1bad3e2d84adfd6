//! /model command - list and switch models

use super::CommandResult;
use crate::providers;

pub struct ModelCommand;

impl ModelCommand {
    /// With no args the endpoint is asked for its models; otherwise switch
    /// to the best catalog match for the provider, or take the name verbatim.
    pub fn execute(args: &str, provider_id: &str) -> CommandResult {
        if args.is_empty() {
            return CommandResult::ListRemoteModels;
        }

        let catalog = providers::find(provider_id)
            .map(|p| p.models)
            .unwrap_or_default();
        match providers::find_model(args, catalog) {
            Some(model) => CommandResult::SwitchModel(model.id.to_string()),
            None => CommandResult::SwitchModel(args.to_string()),
        }
    }
}
