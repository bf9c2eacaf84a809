// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn interpolate_substitutes_known_placeholder() {
    let out = interpolate("restart {{service_name}}", &params(&[("service_name", "Spooler")]));
    assert_eq!(out, "restart Spooler");
}

#[test]
fn interpolate_leaves_unknown_placeholder_untouched() {
    let out = interpolate("restart {{service_name}}", &params(&[]));
    assert_eq!(out, "restart {{service_name}}");
}

#[test]
fn interpolate_substitutes_multiple_placeholders() {
    let out = interpolate(
        "copy {{src}} to {{dst}}",
        &params(&[("src", "/a"), ("dst", "/b")]),
    );
    assert_eq!(out, "copy /a to /b");
}

#[test]
fn interpolate_shell_escapes_special_characters() {
    let out = interpolate_shell(
        "echo \"{{msg}}\"",
        &params(&[("msg", "a \"quoted\" $value")]),
    );
    assert_eq!(out, "echo \"a \\\"quoted\\\" \\$value\"");
}

#[test]
fn escape_for_shell_escapes_backtick_and_backslash() {
    assert_eq!(escape_for_shell("a`b\\c"), "a\\`b\\\\c");
}
