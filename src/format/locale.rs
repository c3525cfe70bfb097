//! Locale data used for formatting and parsing cell values

use crate::error::MejaError;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a localized date or time pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatStyle {
    Short,
    Medium,
    Long,
}

/// Supported locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Locale {
    #[default]
    Root,
    EnUs,
    EnGb,
    De,
    Fr,
}

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const MONTHS_EN_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS_DE: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];
const MONTHS_DE_SHORT: [&str; 12] = [
    "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.",
    "Dez.",
];
const MONTHS_FR: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];
const MONTHS_FR_SHORT: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

// Monday first
const DAYS_EN: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];
const DAYS_EN_SHORT: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const DAYS_DE: [&str; 7] = [
    "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag", "Sonntag",
];
const DAYS_DE_SHORT: [&str; 7] = ["Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa.", "So."];
const DAYS_FR: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];
const DAYS_FR_SHORT: [&str; 7] = ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."];

impl Locale {
    pub const ALL: [Locale; 5] = [
        Locale::Root,
        Locale::EnUs,
        Locale::EnGb,
        Locale::De,
        Locale::Fr,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::Root => "root",
            Locale::EnUs => "en-US",
            Locale::EnGb => "en-GB",
            Locale::De => "de-DE",
            Locale::Fr => "fr-FR",
        }
    }

    /// Locale from the `LC_ALL`/`LANG` environment, `Root` if unknown.
    pub fn from_env() -> Locale {
        ["LC_ALL", "LC_NUMERIC", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .filter(|v| !v.is_empty())
            .find_map(|v| {
                let tag = v.split('.').next().unwrap_or_default().to_string();
                tag.parse::<Locale>().ok()
            })
            .unwrap_or_default()
    }

    pub fn decimal_separator(&self) -> char {
        match self {
            Locale::De | Locale::Fr => ',',
            _ => '.',
        }
    }

    pub fn grouping_separator(&self) -> char {
        match self {
            Locale::De => '.',
            Locale::Fr => '\u{202f}',
            _ => ',',
        }
    }

    pub fn first_day_of_week(&self) -> Weekday {
        match self {
            Locale::EnUs => Weekday::Sun,
            _ => Weekday::Mon,
        }
    }

    pub fn date_pattern(&self, style: FormatStyle) -> &'static str {
        use FormatStyle::*;
        match (self, style) {
            (Locale::Root, Short) => "y-MM-dd",
            (Locale::Root, Medium) => "y MMM d",
            (Locale::Root, Long) => "y MMMM d",
            (Locale::EnUs, Short) => "M/d/yy",
            (Locale::EnUs, Medium) => "MMM d, y",
            (Locale::EnUs, Long) => "MMMM d, y",
            (Locale::EnGb, Short) => "dd/MM/y",
            (Locale::EnGb, Medium) => "d MMM y",
            (Locale::EnGb, Long) => "d MMMM y",
            (Locale::De, Short) => "dd.MM.yy",
            (Locale::De, Medium) => "dd.MM.y",
            (Locale::De, Long) => "d. MMMM y",
            (Locale::Fr, Short) => "dd/MM/y",
            (Locale::Fr, Medium) => "d MMM y",
            (Locale::Fr, Long) => "d MMMM y",
        }
    }

    pub fn time_pattern(&self, style: FormatStyle) -> &'static str {
        match (self, style) {
            (Locale::EnUs, FormatStyle::Short) => "h:mm a",
            (Locale::EnUs, _) => "h:mm:ss a",
            (_, FormatStyle::Short) => "HH:mm",
            _ => "HH:mm:ss",
        }
    }

    fn date_time_separator(&self) -> &'static str {
        match self {
            Locale::Root => " ",
            _ => ", ",
        }
    }

    pub fn date_time_pattern(&self, style: FormatStyle) -> String {
        format!(
            "{}{}{}",
            self.date_pattern(style),
            self.date_time_separator(),
            self.time_pattern(style)
        )
    }

    /// Date pattern accepting an optional time part, used when parsing input.
    pub fn date_input_pattern(&self, style: FormatStyle) -> String {
        format!(
            "{}[{}{}]",
            self.date_pattern(style),
            self.date_time_separator(),
            self.time_pattern(FormatStyle::Short)
        )
    }

    /// Month name for month 1..=12.
    pub fn month_name(&self, month: u32, abbreviated: bool) -> &'static str {
        let idx = (month.clamp(1, 12) - 1) as usize;
        match (self, abbreviated) {
            (Locale::De, false) => MONTHS_DE[idx],
            (Locale::De, true) => MONTHS_DE_SHORT[idx],
            (Locale::Fr, false) => MONTHS_FR[idx],
            (Locale::Fr, true) => MONTHS_FR_SHORT[idx],
            (_, false) => MONTHS_EN[idx],
            (_, true) => MONTHS_EN_SHORT[idx],
        }
    }

    pub fn weekday_name(&self, day: Weekday, abbreviated: bool) -> &'static str {
        let idx = day.num_days_from_monday() as usize;
        match (self, abbreviated) {
            (Locale::De, false) => DAYS_DE[idx],
            (Locale::De, true) => DAYS_DE_SHORT[idx],
            (Locale::Fr, false) => DAYS_FR[idx],
            (Locale::Fr, true) => DAYS_FR_SHORT[idx],
            (_, false) => DAYS_EN[idx],
            (_, true) => DAYS_EN_SHORT[idx],
        }
    }

    /// Separator used for CSV files when none is configured.
    pub fn default_csv_separator(&self) -> char {
        if self.decimal_separator() == ',' {
            ';'
        } else {
            ','
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = MejaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', "-").to_ascii_lowercase();
        match normalized.as_str() {
            "" | "root" | "c" | "posix" | "und" => Ok(Locale::Root),
            "en" | "en-us" => Ok(Locale::EnUs),
            "en-gb" => Ok(Locale::EnGb),
            tag if tag == "de" || tag.starts_with("de-") => Ok(Locale::De),
            tag if tag == "fr" || tag.starts_with("fr-") => Ok(Locale::Fr),
            tag if tag.starts_with("en-") => Ok(Locale::EnUs),
            _ => Err(MejaError::Argument(format!("unsupported locale: '{}'", s))),
        }
    }
}

impl TryFrom<String> for Locale {
    type Error = MejaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag().to_string()
    }
}
