// ABOUTME: Environment variable handling for configuration values.
// ABOUTME: Expands {env.NAME} placeholders and resolves container env passthrough.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{env\.([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Replace `{env.NAME}` with the value of `NAME`.
///
/// Placeholders naming unset variables are left untouched.
pub fn expand_env_placeholders(input: &str) -> String {
    ENV_PLACEHOLDER
        .replace_all(input, |caps: &Captures| match std::env::var(&caps[1]) {
            Ok(value) => value,
            Err(_) => caps[0].to_string(),
        })
        .into_owned()
}

/// Build the container environment from passthrough entries.
///
/// `NAME` copies the variable from this process when it is set and is skipped
/// otherwise; `NAME=VALUE` is passed as written.
pub fn resolve_passthrough(entries: &[String]) -> BTreeMap<String, String> {
    entries
        .iter()
        .filter_map(|entry| match entry.split_once('=') {
            Some((name, value)) => Some((name.to_string(), value.to_string())),
            None => std::env::var(entry).ok().map(|value| (entry.clone(), value)),
        })
        .collect()
}
