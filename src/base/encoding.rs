//! Default text encoding for formats without a self-describing marker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Code pages a format plugin may fall back to when decoding strings.
///
/// This is a descriptor only: decoding bytes is the plugin's job, the core
/// just carries the configured choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    /// Windows-1254 (Turkish), the historical default.
    #[default]
    #[serde(rename = "windows-1254")]
    Windows1254,
    #[serde(rename = "windows-1250")]
    Windows1250,
    #[serde(rename = "windows-1251")]
    Windows1251,
    #[serde(rename = "windows-1252")]
    Windows1252,
    #[serde(rename = "iso-8859-1")]
    Latin1,
    #[serde(rename = "iso-8859-9")]
    Latin5,
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-16le")]
    Utf16Le,
}

impl TextEncoding {
    pub const ALL: [TextEncoding; 8] = [
        Self::Windows1254,
        Self::Windows1250,
        Self::Windows1251,
        Self::Windows1252,
        Self::Latin1,
        Self::Latin5,
        Self::Utf8,
        Self::Utf16Le,
    ];

    /// WHATWG label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Windows1254 => "windows-1254",
            Self::Windows1250 => "windows-1250",
            Self::Windows1251 => "windows-1251",
            Self::Windows1252 => "windows-1252",
            Self::Latin1 => "iso-8859-1",
            Self::Latin5 => "iso-8859-9",
            Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
        }
    }

    /// Windows code page number.
    pub fn code_page(self) -> u16 {
        match self {
            Self::Windows1254 => 1254,
            Self::Windows1250 => 1250,
            Self::Windows1251 => 1251,
            Self::Windows1252 => 1252,
            Self::Latin1 => 28591,
            Self::Latin5 => 28599,
            Self::Utf8 => 65001,
            Self::Utf16Le => 1200,
        }
    }

    pub fn is_single_byte(self) -> bool {
        !matches!(self, Self::Utf8 | Self::Utf16Le)
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    /// Accepts a label (`windows-1254`, `utf-8`, ...) or a bare code page
    /// number (`1254`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|enc| enc.label() == wanted || enc.code_page().to_string() == wanted)
            .ok_or_else(|| format!("Unknown text encoding: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_turkish_code_page() {
        assert_eq!(TextEncoding::default(), TextEncoding::Windows1254);
        assert_eq!(TextEncoding::default().code_page(), 1254);
    }

    #[test]
    fn test_from_str_accepts_labels_and_code_pages() {
        assert_eq!("UTF-8".parse::<TextEncoding>(), Ok(TextEncoding::Utf8));
        assert_eq!("1252".parse::<TextEncoding>(), Ok(TextEncoding::Windows1252));
        assert!("klingon".parse::<TextEncoding>().is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&TextEncoding::Latin5).unwrap();
        assert_eq!(json, "\"iso-8859-9\"");
    }
}
