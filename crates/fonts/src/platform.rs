//! Per-OS font tables, selected by sniffing the host's platform string.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    pub fn detect(platform_string: &str) -> Self {
        let lower = platform_string.to_ascii_lowercase();
        // "darwin" contains "win", so macOS markers go first.
        if ["mac", "iphone", "ipad", "darwin"]
            .iter()
            .any(|marker| lower.contains(marker))
        {
            Self::MacOs
        } else if lower.contains("win") {
            Self::Windows
        } else if ["linux", "x11", "cros", "android", "ubuntu"]
            .iter()
            .any(|marker| lower.contains(marker))
        {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// Fonts assumed present on this platform when nothing else can tell.
    pub fn known_fonts(self) -> &'static [&'static str] {
        match self {
            Self::Windows => &[
                "Segoe UI",
                "Arial",
                "Calibri",
                "Cambria",
                "Consolas",
                "Courier New",
                "Georgia",
                "Tahoma",
                "Times New Roman",
                "Trebuchet MS",
                "Verdana",
            ],
            Self::MacOs => &[
                "SF Pro",
                "SF Pro Text",
                "SF Pro Display",
                "Helvetica Neue",
                "Helvetica",
                "Arial",
                "Times",
                "Times New Roman",
                "Menlo",
                "Monaco",
                "Courier",
                "Georgia",
                "Avenir",
                "Lucida Grande",
            ],
            Self::Linux => &[
                "Ubuntu",
                "Noto Sans",
                "DejaVu Sans",
                "DejaVu Serif",
                "DejaVu Sans Mono",
                "Liberation Sans",
                "Liberation Serif",
                "Liberation Mono",
                "Cantarell",
                "Roboto",
            ],
            Self::Other => &[],
        }
    }

    /// System fonts a missing family may silently fall back to.
    pub fn fallback_candidates(self) -> &'static [&'static str] {
        match self {
            Self::Windows => &[
                "Segoe UI",
                "Arial",
                "Calibri",
                "Tahoma",
                "Verdana",
                "Times New Roman",
            ],
            Self::MacOs => &[
                "SF Pro Text",
                "SF Pro",
                "Helvetica Neue",
                "Helvetica",
                "Arial",
                "Times",
            ],
            Self::Linux => &[
                "Ubuntu",
                "Cantarell",
                "Noto Sans",
                "DejaVu Sans",
                "Liberation Sans",
                "Roboto",
            ],
            Self::Other => &["Arial", "Helvetica"],
        }
    }

    /// Likely default UI fonts, most likely first.
    pub fn ui_font_candidates(self) -> &'static [&'static str] {
        match self {
            Self::Windows => &["Segoe UI", "Tahoma"],
            Self::MacOs => &["SF Pro Text", "SF Pro", "Helvetica Neue", "Lucida Grande"],
            Self::Linux => &["Ubuntu", "Cantarell", "Noto Sans", "DejaVu Sans"],
            Self::Other => &[],
        }
    }

    /// Reported when the system UI font cannot be identified.
    pub fn ui_label(self) -> &'static str {
        match self {
            Self::Windows => "System UI (Windows)",
            Self::MacOs => "System UI (macOS)",
            Self::Linux => "System UI (Linux)",
            Self::Other => "System UI",
        }
    }

    pub fn is_known_font(self, name: &str) -> bool {
        self.known_fonts()
            .iter()
            .any(|known| known.eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_common_platform_strings() {
        assert_eq!(
            Platform::detect("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
            Platform::Windows
        );
        assert_eq!(Platform::detect("MacIntel"), Platform::MacOs);
        assert_eq!(Platform::detect("Darwin arm64"), Platform::MacOs);
        assert_eq!(Platform::detect("Linux x86_64"), Platform::Linux);
        assert_eq!(Platform::detect("FreeBSD amd64"), Platform::Other);
    }

    #[test]
    fn allowlist_is_case_insensitive() {
        assert!(Platform::Windows.is_known_font("segoe ui"));
        assert!(!Platform::Linux.is_known_font("Segoe UI"));
        assert!(!Platform::Other.is_known_font("Arial"));
    }
}
