//! Decimal number patterns such as `0.00`, `#,##0.###` or `0%`

use crate::error::{MejaError, MejaResult};
use crate::format::Locale;

/// Pattern used when a style has no data format.
pub const DEFAULT_NUMBER_PATTERN: &str = "0.##########";

/// A compiled decimal pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberPattern {
    prefix: String,
    suffix: String,
    min_int: usize,
    min_frac: usize,
    max_frac: usize,
    grouping: Option<usize>,
    percent: bool,
}

fn is_pattern_char(c: char) -> bool {
    matches!(c, '0' | '#' | ',' | '.')
}

/// Read literal text until the next pattern char; supports `'quoted'` text.
fn read_affix(chars: &[char], pos: &mut usize, stop_at_pattern: bool) -> MejaResult<(String, bool)> {
    let mut out = String::new();
    let mut percent = false;
    while *pos < chars.len() {
        let c = chars[*pos];
        if stop_at_pattern && is_pattern_char(c) {
            break;
        }
        match c {
            '\'' => {
                *pos += 1;
                if *pos < chars.len() && chars[*pos] == '\'' {
                    out.push('\'');
                    *pos += 1;
                    continue;
                }
                loop {
                    if *pos >= chars.len() {
                        return Err(MejaError::Format("unterminated quote in number pattern".into()));
                    }
                    let q = chars[*pos];
                    *pos += 1;
                    if q == '\'' {
                        if *pos < chars.len() && chars[*pos] == '\'' {
                            out.push('\'');
                            *pos += 1;
                            continue;
                        }
                        break;
                    }
                    out.push(q);
                }
            }
            '%' => {
                percent = true;
                out.push('%');
                *pos += 1;
            }
            _ if !stop_at_pattern && is_pattern_char(c) => {
                return Err(MejaError::Format(format!(
                    "unexpected '{}' in number pattern suffix",
                    c
                )));
            }
            _ => {
                out.push(c);
                *pos += 1;
            }
        }
    }
    Ok((out, percent))
}

impl NumberPattern {
    pub fn compile(pattern: &str) -> MejaResult<Self> {
        // only the positive sub-pattern is used
        let positive = pattern.split(';').next().unwrap_or_default();
        let chars: Vec<char> = positive.chars().collect();
        let mut pos = 0;

        let (prefix, p1) = read_affix(&chars, &mut pos, true)?;

        let mut min_int = 0;
        let mut min_frac = 0;
        let mut max_frac = 0;
        let mut in_fraction = false;
        let mut last_group: Option<usize> = None;
        let mut int_digits = 0;
        let mut seen_digit = false;

        while pos < chars.len() && is_pattern_char(chars[pos]) {
            match chars[pos] {
                '0' if in_fraction => {
                    if max_frac > min_frac {
                        return Err(MejaError::Format(format!(
                            "'0' after '#' in fraction of '{}'",
                            pattern
                        )));
                    }
                    min_frac += 1;
                    max_frac += 1;
                }
                '#' if in_fraction => max_frac += 1,
                '0' => {
                    min_int += 1;
                    int_digits += 1;
                    seen_digit = true;
                }
                '#' => {
                    if min_int > 0 {
                        return Err(MejaError::Format(format!(
                            "'#' after '0' in integer part of '{}'",
                            pattern
                        )));
                    }
                    int_digits += 1;
                    seen_digit = true;
                }
                ',' if !in_fraction => last_group = Some(int_digits),
                '.' if !in_fraction => in_fraction = true,
                c => {
                    return Err(MejaError::Format(format!(
                        "unexpected '{}' in number pattern '{}'",
                        c, pattern
                    )))
                }
            }
            pos += 1;
        }

        if !seen_digit && max_frac == 0 {
            return Err(MejaError::Format(format!("not a number pattern: '{}'", pattern)));
        }

        let grouping = last_group
            .map(|g| int_digits - g)
            .filter(|size| *size > 0);

        let (suffix, p2) = read_affix(&chars, &mut pos, false)?;

        Ok(NumberPattern {
            prefix,
            suffix,
            min_int,
            min_frac,
            max_frac,
            grouping,
            percent: p1 || p2,
        })
    }

    pub fn format(&self, value: f64, locale: Locale) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        let value = if self.percent { value * 100.0 } else { value };
        if value.is_infinite() {
            let sign = if value < 0.0 { "-" } else { "" };
            return format!("{}{}∞{}", sign, self.prefix, self.suffix);
        }

        let rounded = format!("{:.*}", self.max_frac, value.abs());
        let (int_part, frac_part) = match rounded.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (rounded.clone(), String::new()),
        };

        let mut frac = frac_part;
        while frac.len() > self.min_frac && frac.ends_with('0') {
            frac.pop();
        }

        let mut int = int_part.trim_start_matches('0').to_string();
        while int.len() < self.min_int {
            int.insert(0, '0');
        }
        if int.is_empty() && frac.is_empty() {
            int.push('0');
        }

        if let Some(size) = self.grouping {
            int = group_digits(&int, size, locale.grouping_separator());
        }

        let is_zero = int.chars().all(|c| !c.is_ascii_digit() || c == '0')
            && frac.chars().all(|c| c == '0');
        let sign = if value < 0.0 && !is_zero { "-" } else { "" };

        let mut out = String::with_capacity(int.len() + frac.len() + 8);
        out.push_str(sign);
        out.push_str(&self.prefix);
        out.push_str(&int);
        if !frac.is_empty() {
            out.push(locale.decimal_separator());
            out.push_str(&frac);
        }
        out.push_str(&self.suffix);
        out
    }
}

fn group_digits(digits: &str, size: usize, separator: char) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / size);
    for (idx, c) in chars.iter().enumerate() {
        if idx > 0 && (chars.len() - idx) % size == 0 {
            out.push(separator);
        }
        out.push(*c);
    }
    out
}

/// Parse a number written in the locale's notation.
///
/// The whole text must be consumed; grouping separators are accepted in the
/// integer part between groups of three digits. Returns `None` if the text is
/// not a number.
pub fn parse_number(text: &str, locale: Locale) -> Option<f64> {
    let decimal = locale.decimal_separator();
    let grouping = locale.grouping_separator();
    let is_group = |c: char| c == grouping || (grouping == '\u{202f}' && (c == ' ' || c == '\u{a0}'));

    let mut normalized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut digits = 0;
    // digits since the last grouping separator, None before the first one
    let mut group: Option<usize> = None;

    if let Some('-') = chars.peek() {
        normalized.push('-');
        chars.next();
    }

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            normalized.push(c);
            digits += 1;
            group = group.map(|n| n + 1);
            chars.next();
        } else if is_group(c) && digits > 0 {
            if group.is_some_and(|n| n != 3) {
                return None;
            }
            group = Some(0);
            chars.next();
        } else {
            break;
        }
    }
    if group.is_some_and(|n| n != 3) {
        return None;
    }

    if let Some(&c) = chars.peek() {
        if c == decimal {
            normalized.push('.');
            chars.next();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() {
                    normalized.push(c);
                    digits += 1;
                    chars.next();
                } else {
                    break;
                }
            }
        }
    }

    if digits == 0 {
        return None;
    }

    if let Some(&c) = chars.peek() {
        if c == 'E' {
            normalized.push('e');
            chars.next();
            if let Some(&sign) = chars.peek() {
                if sign == '-' {
                    normalized.push('-');
                    chars.next();
                }
            }
            let mut exp_digits = 0;
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() {
                    normalized.push(c);
                    exp_digits += 1;
                    chars.next();
                } else {
                    break;
                }
            }
            if exp_digits == 0 {
                return None;
            }
        }
    }

    if chars.next().is_some() {
        return None;
    }

    normalized.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(pattern: &str, v: f64, locale: Locale) -> String {
        NumberPattern::compile(pattern).unwrap().format(v, locale)
    }

    #[test]
    fn test_default_pattern() {
        assert_eq!(fmt(DEFAULT_NUMBER_PATTERN, 123.5, Locale::EnUs), "123.5");
        assert_eq!(fmt(DEFAULT_NUMBER_PATTERN, 123.5, Locale::De), "123,5");
        assert_eq!(fmt(DEFAULT_NUMBER_PATTERN, 123.5, Locale::Fr), "123,5");
        assert_eq!(fmt(DEFAULT_NUMBER_PATTERN, 1.0, Locale::Root), "1");
        assert_eq!(fmt(DEFAULT_NUMBER_PATTERN, 0.1 + 0.2, Locale::Root), "0.3");
        assert_eq!(fmt(DEFAULT_NUMBER_PATTERN, -2.25, Locale::Root), "-2.25");
        assert_eq!(fmt(DEFAULT_NUMBER_PATTERN, 0.0, Locale::Root), "0");
    }

    #[test]
    fn test_fixed_fraction_and_grouping() {
        assert_eq!(fmt("0.00", 3.14159, Locale::Root), "3.14");
        assert_eq!(fmt("0.00", 2.0, Locale::De), "2,00");
        assert_eq!(fmt("#,##0.00", 1234567.891, Locale::EnUs), "1,234,567.89");
        assert_eq!(fmt("#,##0", 1234567.0, Locale::De), "1.234.567");
        assert_eq!(fmt("#,##0", 999.0, Locale::EnUs), "999");
        assert_eq!(fmt("000", 7.0, Locale::Root), "007");
        assert_eq!(fmt("#.##", 0.5, Locale::Root), ".5");
    }

    #[test]
    fn test_percent_and_affixes() {
        assert_eq!(fmt("0%", 0.256, Locale::Root), "26%");
        assert_eq!(fmt("0.0 %", 0.256, Locale::De), "25,6 %");
        assert_eq!(fmt("'EUR' 0.00", 5.0, Locale::Root), "EUR 5.00");
        assert_eq!(fmt("$#,##0.00", -1234.5, Locale::EnUs), "-$1,234.50");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(fmt("0.0", -0.01, Locale::Root), "0.0");
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(NumberPattern::compile("yyyy-MM-dd").is_err());
        assert!(NumberPattern::compile("0#").is_err());
        assert!(NumberPattern::compile("'open").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("123.5", Locale::EnUs), Some(123.5));
        assert_eq!(parse_number("1,234.5", Locale::EnUs), Some(1234.5));
        assert_eq!(parse_number("123,5", Locale::De), Some(123.5));
        assert_eq!(parse_number("1.234,5", Locale::De), Some(1234.5));
        assert_eq!(parse_number("-7", Locale::Root), Some(-7.0));
        assert_eq!(parse_number("1E3", Locale::Root), Some(1000.0));
        assert_eq!(parse_number("12 apples", Locale::Root), None);
        assert_eq!(parse_number("", Locale::Root), None);
        assert_eq!(parse_number("-", Locale::Root), None);
        assert_eq!(parse_number("2023-01-01", Locale::Root), None);
        assert_eq!(parse_number("12.345.678", Locale::De), Some(12345678.0));
        assert_eq!(parse_number("29.02.24", Locale::De), None);
        assert_eq!(parse_number("3.5", Locale::De), None);
        assert_eq!(parse_number("1,23", Locale::EnUs), None);
    }
}
