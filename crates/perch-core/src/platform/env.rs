//! `%VAR%` environment variable expansion.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static ENV_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([A-Za-z0-9_()]+)%").expect("env token regex must compile"));

/// Expand `%NAME%` tokens from the process environment.
///
/// Tokens naming an unset variable are left as written.
pub fn expand_env_vars(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Expand `%NAME%` tokens using `lookup`.
pub fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains('%') {
        return input.to_string();
    }
    ENV_TOKEN
        .replace_all(input, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
