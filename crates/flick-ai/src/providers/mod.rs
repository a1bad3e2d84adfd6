//! Chat-completion providers

pub mod openai;

pub use openai::{ChatCompletionsClient, ModelInfo};

/// Resolve an API key from a provided value, falling back to an environment
/// variable. Blank values count as missing.
pub fn resolve_api_key(provided: Option<&str>, env_var: &str) -> Option<String> {
    if let Some(key) = provided.filter(|k| !k.trim().is_empty()) {
        return Some(key.to_string());
    }

    std::env::var(env_var)
        .ok()
        .filter(|k| !k.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provided_key_wins() {
        assert_eq!(
            resolve_api_key(Some("sk-1"), "FLICK_TEST_UNSET_VAR"),
            Some("sk-1".to_string())
        );
    }

    #[test]
    fn test_blank_key_falls_through() {
        assert_eq!(resolve_api_key(Some("  "), "FLICK_TEST_UNSET_VAR"), None);
        assert_eq!(resolve_api_key(None, "FLICK_TEST_UNSET_VAR"), None);
    }
}
