//! Options for reading and writing workbooks
//!
//! Options can be loaded from a YAML file:
//!
//! ```yaml
//! locale: de-DE
//! separator: ";"
//! delimiter: '"'
//! date_format: iso
//! charset: windows-1252
//! ```

use crate::error::{MejaError, MejaResult};
use crate::format::{DatePattern, FormatStyle, Locale};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Pattern used by [`DateFormat::Iso`].
pub const ISO_DATE_PATTERN: &str = "yyyy-MM-dd[ HH:mm[:ss]]";

/// How dates are recognized in text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateFormat {
    /// The locale's short date, e.g. `1/31/23` (en-US)
    #[default]
    LocaleShort,
    /// The locale's medium date, e.g. `Jan 31, 2023` (en-US)
    LocaleLong,
    /// `yyyy-MM-dd` with optional time
    Iso,
}

impl DateFormat {
    pub fn pattern(&self, locale: Locale) -> String {
        match self {
            DateFormat::LocaleShort => locale.date_input_pattern(FormatStyle::Short),
            DateFormat::LocaleLong => locale.date_input_pattern(FormatStyle::Medium),
            DateFormat::Iso => ISO_DATE_PATTERN.to_string(),
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateFormat::LocaleShort => "locale-short",
            DateFormat::LocaleLong => "locale-long",
            DateFormat::Iso => "iso",
        })
    }
}

impl FromStr for DateFormat {
    type Err = MejaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "locale-short" | "short" => Ok(DateFormat::LocaleShort),
            "locale-long" | "long" => Ok(DateFormat::LocaleLong),
            "iso" | "iso-date" => Ok(DateFormat::Iso),
            _ => Err(MejaError::Argument(format!("unknown date format: '{}'", s))),
        }
    }
}

/// Settings shared by all readers and writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoOptions {
    pub locale: Locale,
    /// Field separator; derived from the locale when not set
    pub separator: Option<char>,
    /// Quote character for CSV fields
    pub delimiter: char,
    pub date_format: DateFormat,
    /// Character set label as understood by `encoding_rs`
    pub charset: String,
}

impl Default for IoOptions {
    fn default() -> Self {
        IoOptions {
            locale: Locale::Root,
            separator: None,
            delimiter: '"',
            date_format: DateFormat::LocaleShort,
            charset: "UTF-8".to_string(),
        }
    }
}

impl IoOptions {
    pub fn new(locale: Locale) -> Self {
        IoOptions {
            locale,
            ..Default::default()
        }
    }

    pub fn from_yaml_file(path: &Path) -> MejaResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let options: IoOptions = serde_yaml::from_str(&content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn separator(&self) -> char {
        self.separator
            .unwrap_or_else(|| self.locale.default_csv_separator())
    }

    pub fn encoding(&self) -> MejaResult<&'static Encoding> {
        Encoding::for_label(self.charset.trim().as_bytes())
            .ok_or_else(|| MejaError::Argument(format!("unsupported charset: '{}'", self.charset)))
    }

    pub fn date_pattern(&self) -> MejaResult<DatePattern> {
        DatePattern::compile(&self.date_format.pattern(self.locale))
    }

    /// Check that separator and delimiter can be used for CSV.
    pub fn validate(&self) -> MejaResult<()> {
        let separator = self.separator();
        if !separator.is_ascii() || separator == '\n' || separator == '\r' {
            return Err(MejaError::Argument(format!(
                "invalid separator: '{}'",
                separator.escape_default()
            )));
        }
        if self.delimiter != '"' && self.delimiter != '\'' {
            return Err(MejaError::Argument(format!(
                "invalid delimiter: '{}'",
                self.delimiter
            )));
        }
        if separator == self.delimiter {
            return Err(MejaError::Argument(
                "separator and delimiter must differ".to_string(),
            ));
        }
        self.encoding()?;
        Ok(())
    }
}
