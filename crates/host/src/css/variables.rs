//! `var()` substitution against a set of custom properties.

use std::collections::HashMap;

/// Custom properties keyed by name, including the leading `--`.
pub type CustomProperties = HashMap<String, String>;

/// Substitute every `var(--name)` / `var(--name, fallback)` in `value_text`.
///
/// Expansion is recursive. A reference that is undefined, malformed or part of a cycle
/// resolves to its fallback, or to the empty string without one. A `var(` with no closing
/// parenthesis is kept verbatim.
pub fn resolve_vars_in_value(value_text: &str, properties: &CustomProperties) -> String {
    resolve_vars_internal(value_text, properties, &mut Vec::new())
}

fn resolve_vars_internal(
    value_text: &str,
    properties: &CustomProperties,
    stack: &mut Vec<String>,
) -> String {
    let Some((head, after_open)) = value_text.split_once("var(") else {
        return value_text.to_owned();
    };
    let Some(close) = matching_paren(after_open) else {
        return [head, "var(", after_open].concat();
    };
    let args_text = &after_open[..close];
    let tail = &after_open[close + 1..];
    let replacement = resolve_single_var(args_text, properties, stack);
    let resolved_tail = resolve_vars_internal(tail, properties, stack);
    [head, &replacement, &resolved_tail].concat()
}

/// Byte index of the `)` closing an already-opened parenthesis.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, character) in text.char_indices() {
        match character {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(index),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn resolve_single_var(
    args_text: &str,
    properties: &CustomProperties,
    stack: &mut Vec<String>,
) -> String {
    let (name_text, fallback_text) = match args_text.split_once(',') {
        Some((first, second)) => (first.trim(), Some(second.trim())),
        None => (args_text.trim(), None),
    };
    let fallback = |stack: &mut Vec<String>| {
        fallback_text.map_or_else(String::new, |fallback_src| {
            resolve_vars_internal(fallback_src, properties, stack)
        })
    };
    if !name_text.starts_with("--") || stack.iter().any(|seen| seen == name_text) {
        return fallback(stack);
    }
    let Some(raw_value) = properties.get(name_text) else {
        return fallback(stack);
    };
    stack.push(name_text.to_owned());
    let expanded = resolve_vars_internal(raw_value, properties, stack);
    stack.pop();
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> CustomProperties {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn indirection_and_fallback() {
        let env = props(&[("--brand", "\"Inter\", sans-serif"), ("--body-font", "var(--brand)")]);
        assert_eq!(resolve_vars_in_value("var(--body-font)", &env), "\"Inter\", sans-serif");
        assert_eq!(resolve_vars_in_value("var(--missing, Georgia)", &env), "Georgia");
    }

    #[test]
    fn cycles_fall_back() {
        let env = props(&[("--a", "var(--b)"), ("--b", "var(--a, Lato)")]);
        assert_eq!(resolve_vars_in_value("var(--a)", &env), "Lato");
    }

    #[test]
    fn nested_parentheses_in_fallback() {
        let env = CustomProperties::new();
        assert_eq!(
            resolve_vars_in_value("var(--c, rgb(1, 2, 3))", &env),
            "rgb(1, 2, 3)"
        );
    }
}
