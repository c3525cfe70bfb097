//! Locale aware formatting and parsing of numbers and dates

mod date;
mod locale;
mod number;

pub use date::{DatePattern, ParsedDate};
pub use locale::{FormatStyle, Locale};
pub use number::{parse_number, NumberPattern, DEFAULT_NUMBER_PATTERN};
