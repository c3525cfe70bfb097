use crate::error::MejaResult;
use crate::format::{parse_number, DatePattern, Locale};
use crate::io::IoOptions;
use crate::model::CellValue;

/// Turns text input (CSV fields, CLI arguments) into typed cell values.
///
/// Checks, in order: empty text, `=formula`, `true`/`false`, a number in the
/// locale's notation, a date in the configured format. Anything else is text.
#[derive(Debug, Clone)]
pub struct CellValueParser {
    locale: Locale,
    date_pattern: DatePattern,
}

impl CellValueParser {
    pub fn new(locale: Locale, date_pattern: DatePattern) -> Self {
        CellValueParser {
            locale,
            date_pattern,
        }
    }

    pub fn from_options(options: &IoOptions) -> MejaResult<Self> {
        Ok(CellValueParser::new(options.locale, options.date_pattern()?))
    }

    pub fn parse(&self, text: &str) -> CellValue {
        if text.is_empty() {
            return CellValue::Blank;
        }

        if let Some(formula) = text.strip_prefix('=') {
            return CellValue::Formula(formula.to_string());
        }

        if text.eq_ignore_ascii_case("true") {
            return CellValue::Boolean(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return CellValue::Boolean(false);
        }

        if let Some(n) = parse_number(text, self.locale) {
            return CellValue::Number(n);
        }

        if let Some(parsed) = self.date_pattern.parse(text, self.locale) {
            return match parsed.time {
                Some(_) => CellValue::DateTime(parsed.to_date_time()),
                None => CellValue::Date(parsed.date),
            };
        }

        CellValue::Text(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::DateFormat;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn parser(locale: Locale, date_format: DateFormat) -> CellValueParser {
        let options = IoOptions {
            locale,
            date_format,
            ..Default::default()
        };
        CellValueParser::from_options(&options).unwrap()
    }

    #[test]
    fn test_parse_order() {
        let p = parser(Locale::EnUs, DateFormat::Iso);
        assert_eq!(p.parse(""), CellValue::Blank);
        assert_eq!(p.parse("=A1+B1"), CellValue::Formula("A1+B1".to_string()));
        assert_eq!(p.parse("TRUE"), CellValue::Boolean(true));
        assert_eq!(p.parse("false"), CellValue::Boolean(false));
        assert_eq!(p.parse("1,234.5"), CellValue::Number(1234.5));
        assert_eq!(p.parse("-7"), CellValue::Number(-7.0));
        assert_eq!(
            p.parse("2023-05-17"),
            CellValue::Date(NaiveDate::from_ymd_opt(2023, 5, 17).unwrap())
        );
        assert_eq!(
            p.parse("2023-05-17 08:30"),
            CellValue::DateTime(
                NaiveDate::from_ymd_opt(2023, 5, 17)
                    .unwrap()
                    .and_hms_opt(8, 30, 0)
                    .unwrap()
            )
        );
        assert_eq!(p.parse("12 apples"), CellValue::Text("12 apples".to_string()));
        assert_eq!(p.parse("yes"), CellValue::Text("yes".to_string()));
    }

    #[test]
    fn test_locale_numbers() {
        let de = parser(Locale::De, DateFormat::LocaleShort);
        assert_eq!(de.parse("3,5"), CellValue::Number(3.5));
        assert_eq!(de.parse("1.234,5"), CellValue::Number(1234.5));
        assert_eq!(de.parse("3,5 kg"), CellValue::Text("3,5 kg".to_string()));

        let us = parser(Locale::EnUs, DateFormat::LocaleShort);
        assert_eq!(
            us.parse("12/24/23"),
            CellValue::Date(NaiveDate::from_ymd_opt(2023, 12, 24).unwrap())
        );
    }
}
