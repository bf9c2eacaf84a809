// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `{{placeholder}}` interpolation for runbook step parameters.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Matches `{{name}}` placeholders in a step's action or parameter values.
#[allow(clippy::expect_used)]
pub static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}").expect("constant regex pattern is valid")
});

/// Escape a string for safe use inside shell double-quoted contexts.
///
/// Characters with special meaning in double-quoted shell strings are
/// backslash-escaped so they're treated literally:
/// - Backslash `\` → `\\`
/// - Dollar sign `$` → `\$`
/// - Backtick `` ` `` → `` \` ``
/// - Double quote `"` → `\"`
pub fn escape_for_shell(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '$' => result.push_str("\\$"),
            '`' => result.push_str("\\`"),
            '"' => result.push_str("\\\""),
            _ => result.push(c),
        }
    }
    result
}

/// Replace `{{name}}` placeholders with values from `params`.
///
/// Unknown placeholders are left as-is.
pub fn interpolate(template: &str, params: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            params.get(name).cloned().unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

/// Like [`interpolate`], but escapes substituted values for safe use in a
/// shell-invoke step's command string.
pub fn interpolate_shell(template: &str, params: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            match params.get(name) {
                Some(val) => escape_for_shell(val),
                None => caps[0].to_string(),
            }
        })
        .to_string()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
