//! `style="..."` attribute parsing.

use std::collections::HashMap;

/// A single declaration parsed from a style attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, ASCII lowercase. Custom property names keep their case.
    pub property: String,
    /// Value trimmed of surrounding whitespace, with any `!important` removed.
    pub value: String,
}

/// Parse the value of a `style` attribute into declarations, in source order.
///
/// Splits on `;` outside parentheses and quotes, then on the first `:`. Items without a
/// colon, an empty property or an empty value are skipped.
pub fn parse_style_attribute(input: &str) -> Vec<Declaration> {
    let mut out = Vec::new();
    for raw_item in split_top_level(input, ';') {
        let item = raw_item.trim_matches(is_css_whitespace);
        let Some((raw_prop, raw_value)) = item.split_once(':') else {
            continue;
        };
        let property_text = raw_prop.trim_matches(is_css_whitespace);
        let value_text = strip_important(raw_value.trim_matches(is_css_whitespace));
        if property_text.is_empty() || value_text.is_empty() {
            continue;
        }
        let property = if property_text.starts_with("--") {
            property_text.to_owned()
        } else {
            property_text.to_ascii_lowercase()
        };
        out.push(Declaration {
            property,
            value: value_text.to_owned(),
        });
    }
    out
}

/// Parse into a map keyed by property name; the last duplicate wins.
pub fn parse_style_attribute_into_map(input: &str) -> HashMap<String, String> {
    parse_style_attribute(input)
        .into_iter()
        .map(|decl| (decl.property, decl.value))
        .collect()
}

fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    lower.rfind("!important").map_or(value, |index| {
        value
            .get(..index)
            .unwrap_or(value)
            .trim_end_matches(is_css_whitespace)
    })
}

/// Split on `separator` where it is not nested in parentheses or quotes.
pub(super) fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    for (index, character) in input.char_indices() {
        match (quote, character) {
            (Some(open), current) if current == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(character),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, current) if current == separator && depth == 0 => {
                parts.push(&input[start..index]);
                start = index + character.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// ASCII whitespace per CSS Syntax (TAB, LF, FF, CR, SPACE).
const fn is_css_whitespace(character: char) -> bool {
    matches!(
        character,
        '\u{0009}' | '\u{000A}' | '\u{000C}' | '\u{000D}' | '\u{0020}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_invalid_items_and_lowercases_properties() {
        let decls = parse_style_attribute("Font-Family: Inter; ;color:; bogus; --Brand-Font: Lato");
        assert_eq!(
            decls,
            vec![
                Declaration {
                    property: "font-family".into(),
                    value: "Inter".into(),
                },
                Declaration {
                    property: "--Brand-Font".into(),
                    value: "Lato".into(),
                },
            ]
        );
    }

    #[test]
    fn semicolons_inside_quotes_do_not_split() {
        let map = parse_style_attribute_into_map(r#"font-family: "A;B", serif !important; color: red"#);
        assert_eq!(map.get("font-family").map(String::as_str), Some(r#""A;B", serif"#));
        assert_eq!(map.get("color").map(String::as_str), Some("red"));
    }
}
