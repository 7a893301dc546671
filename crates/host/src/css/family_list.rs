//! Splitting and serializing `font-family` lists.

use super::style_attr::split_top_level;

/// One entry of a `font-family` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyName {
    /// Name with quotes removed and surrounding whitespace trimmed.
    pub name: String,
    /// Whether the entry was a quoted string. Quoted keywords are ordinary names.
    pub quoted: bool,
}

/// Split a `font-family` value into its entries, dropping empty ones.
///
/// Unquoted multi-word names have their internal whitespace collapsed to single spaces.
pub fn split_family_list(value: &str) -> Vec<FamilyName> {
    split_top_level(value, ',')
        .into_iter()
        .filter_map(|raw| {
            let trimmed = raw.trim();
            let unquoted = trimmed
                .strip_prefix('"')
                .and_then(|inner| inner.strip_suffix('"'))
                .or_else(|| {
                    trimmed
                        .strip_prefix('\'')
                        .and_then(|inner| inner.strip_suffix('\''))
                });
            let family = match unquoted {
                Some(inner) => FamilyName {
                    name: inner.trim().to_owned(),
                    quoted: true,
                },
                None => FamilyName {
                    name: trimmed.split_whitespace().collect::<Vec<_>>().join(" "),
                    quoted: false,
                },
            };
            (!family.name.is_empty()).then_some(family)
        })
        .collect()
}

/// Serialize a single family for use in a `font-family` declaration.
///
/// Keywords are written bare so the engine treats them as keywords; anything else is quoted.
pub fn serialize_family(name: &str, keyword: bool) -> String {
    if keyword {
        name.to_owned()
    } else {
        format!("\"{}\"", name.replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_quotes_and_keeps_order() {
        let names = split_family_list(r#" "Helvetica Neue" , 'Arial',  Open   Sans, sans-serif,, "#);
        let plain: Vec<(&str, bool)> = names
            .iter()
            .map(|family| (family.name.as_str(), family.quoted))
            .collect();
        assert_eq!(
            plain,
            vec![
                ("Helvetica Neue", true),
                ("Arial", true),
                ("Open Sans", false),
                ("sans-serif", false),
            ]
        );
    }

    #[test]
    fn serializes_keywords_bare() {
        assert_eq!(serialize_family("monospace", true), "monospace");
        assert_eq!(serialize_family("Fira Code", false), "\"Fira Code\"");
    }
}
