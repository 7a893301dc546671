//! Font weight bucketing and style normalization.

use serde::Serialize;

/// A weight bucketed to the nearest hundred in `100..=900`, with its conventional name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontWeight {
    pub numeric: u16,
    pub label: &'static str,
}

impl FontWeight {
    pub fn from_numeric(value: f32) -> Self {
        let bucket = if value.is_finite() {
            ((value / 100.0).round() * 100.0).clamp(100.0, 900.0) as u16
        } else {
            400
        };
        Self {
            numeric: bucket,
            label: weight_label(bucket),
        }
    }
}

fn weight_label(bucket: u16) -> &'static str {
    match bucket {
        100 => "Thin",
        200 => "Extra Light",
        300 => "Light",
        500 => "Medium",
        600 => "Semi Bold",
        700 => "Bold",
        800 => "Extra Bold",
        900 => "Black",
        _ => "Regular",
    }
}

/// Interpret a computed or declared `font-weight`.
///
/// Numbers are bucketed; `normal`/`bold` map to 400/700, `lighter`/`bolder` to 300/700.
/// Anything unparseable is reported as Regular.
pub fn format_weight(raw: &str) -> FontWeight {
    let trimmed = raw.trim();
    let numeric = match trimmed.to_ascii_lowercase().as_str() {
        "normal" => 400.0,
        "bold" | "bolder" => 700.0,
        "lighter" => 300.0,
        other => other.parse::<f32>().unwrap_or(400.0),
    };
    FontWeight::from_numeric(numeric)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    /// `oblique <angle>` reports as oblique; unknown values as normal.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        if lower == "italic" {
            Self::Italic
        } else if lower.starts_with("oblique") {
            Self::Oblique
        } else {
            Self::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_and_labels() {
        assert_eq!(format_weight("550"), FontWeight { numeric: 600, label: "Semi Bold" });
        assert_eq!(format_weight("bold"), FontWeight { numeric: 700, label: "Bold" });
        assert_eq!(format_weight("50"), FontWeight { numeric: 100, label: "Thin" });
        assert_eq!(format_weight("1000").label, "Black");
        assert_eq!(format_weight("normal").label, "Regular");
        assert_eq!(format_weight("349").numeric, 300);
        assert_eq!(format_weight("garbage").numeric, 400);
    }

    #[test]
    fn style_normalization() {
        assert_eq!(FontStyle::parse("italic"), FontStyle::Italic);
        assert_eq!(FontStyle::parse("oblique 14deg"), FontStyle::Oblique);
        assert_eq!(FontStyle::parse("bogus"), FontStyle::Normal);
    }
}
