// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google API key acquisition from configuration, environment or TTY prompt.

use parley_config::model::GeminiConfig;
use parley_core::ParleyError;
use secrecy::SecretString;
use tracing::debug;

/// Environment variable consulted when the configuration has no key.
pub const GOOGLE_API_KEY_ENV_VAR: &str = "GOOGLE_API_KEY";

/// Resolves the API key.
///
/// Priority:
/// 1. `gemini.api_key` from configuration (also set by `PARLEY_GEMINI_API_KEY`)
/// 2. `GOOGLE_API_KEY` environment variable
/// 3. Masked interactive prompt via `rpassword`, when stdin is a terminal
///
/// Empty values count as absent. With no key, returns
/// [`ParleyError::MissingCredential`].
pub fn resolve_credential(config: &GeminiConfig) -> Result<SecretString, ParleyError> {
    if let Some(key) = non_empty(config.api_key.clone()) {
        debug!(source = "config", "API key resolved");
        return Ok(SecretString::from(key));
    }

    if let Some(key) = non_empty(std::env::var(GOOGLE_API_KEY_ENV_VAR).ok()) {
        debug!(source = "env", "API key resolved");
        return Ok(SecretString::from(key));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Google API key: ");
        let key = rpassword::read_password()
            .map_err(|e| ParleyError::Internal(format!("failed to read API key: {e}")))?;
        if let Some(key) = non_empty(Some(key)) {
            debug!(source = "prompt", "API key resolved");
            return Ok(SecretString::from(key));
        }
    }

    Err(ParleyError::MissingCredential)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    fn config_with_key(key: Option<&str>) -> GeminiConfig {
        GeminiConfig {
            api_key: key.map(str::to_string),
            ..GeminiConfig::default()
        }
    }

    #[test]
    #[serial]
    fn config_key_wins_over_env() {
        // SAFETY: test-only env mutation, serialized with #[serial].
        unsafe { std::env::set_var(GOOGLE_API_KEY_ENV_VAR, "from-env") };
        let result = resolve_credential(&config_with_key(Some("from-config")));
        unsafe { std::env::remove_var(GOOGLE_API_KEY_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "from-config");
    }

    #[test]
    #[serial]
    fn env_key_used_when_config_has_none() {
        unsafe { std::env::set_var(GOOGLE_API_KEY_ENV_VAR, "from-env") };
        let result = resolve_credential(&config_with_key(None));
        unsafe { std::env::remove_var(GOOGLE_API_KEY_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "from-env");
    }

    #[test]
    #[serial]
    fn empty_config_key_falls_through_to_env() {
        unsafe { std::env::set_var(GOOGLE_API_KEY_ENV_VAR, "from-env") };
        let result = resolve_credential(&config_with_key(Some("  ")));
        unsafe { std::env::remove_var(GOOGLE_API_KEY_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "from-env");
    }

    #[test]
    #[serial]
    fn missing_key_is_reported() {
        unsafe { std::env::set_var(GOOGLE_API_KEY_ENV_VAR, "") };
        // In CI/test, stdin is not a terminal, so no prompt is shown.
        let result = resolve_credential(&config_with_key(None));
        unsafe { std::env::remove_var(GOOGLE_API_KEY_ENV_VAR) };

        if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
            assert!(matches!(result, Err(ParleyError::MissingCredential)));
        }
    }
}
