//! Date and time patterns (`yyyy-MM-dd`, `d MMM y`, `h:mm a`, ...)
//!
//! Pattern letters: `y` year, `M` month, `d` day, `E` weekday, `H` hour
//! (0-23), `h` hour (1-12), `m` minute, `s` second, `a` am/pm marker.
//! Text in single quotes is literal, `[...]` marks an optional section.

use crate::error::{MejaError, MejaResult};
use crate::format::Locale;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Field(char, usize),
    Literal(String),
    Optional(Vec<Token>),
}

/// A compiled date/time pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct DatePattern {
    tokens: Vec<Token>,
}

/// Result of parsing: a date with an optional time of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedDate {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl ParsedDate {
    pub fn to_date_time(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }
}

const FIELD_LETTERS: &str = "yMdEHhmsa";

fn compile_tokens(chars: &[char], pos: &mut usize, nested: bool, pattern: &str) -> MejaResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();

    let flush = |literal: &mut String, tokens: &mut Vec<Token>| {
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(literal)));
        }
    };

    while *pos < chars.len() {
        let c = chars[*pos];
        match c {
            '[' => {
                flush(&mut literal, &mut tokens);
                *pos += 1;
                let inner = compile_tokens(chars, pos, true, pattern)?;
                tokens.push(Token::Optional(inner));
            }
            ']' => {
                if !nested {
                    return Err(MejaError::Format(format!("unbalanced ']' in '{}'", pattern)));
                }
                flush(&mut literal, &mut tokens);
                *pos += 1;
                return Ok(tokens);
            }
            '\'' => {
                *pos += 1;
                if *pos < chars.len() && chars[*pos] == '\'' {
                    literal.push('\'');
                    *pos += 1;
                    continue;
                }
                loop {
                    if *pos >= chars.len() {
                        return Err(MejaError::Format(format!("unterminated quote in '{}'", pattern)));
                    }
                    let q = chars[*pos];
                    *pos += 1;
                    if q == '\'' {
                        if *pos < chars.len() && chars[*pos] == '\'' {
                            literal.push('\'');
                            *pos += 1;
                            continue;
                        }
                        break;
                    }
                    literal.push(q);
                }
            }
            c if FIELD_LETTERS.contains(c) => {
                flush(&mut literal, &mut tokens);
                let mut count = 0;
                while *pos < chars.len() && chars[*pos] == c {
                    count += 1;
                    *pos += 1;
                }
                tokens.push(Token::Field(c, count));
            }
            c if c.is_ascii_alphabetic() => {
                return Err(MejaError::Format(format!(
                    "unsupported pattern letter '{}' in '{}'",
                    c, pattern
                )));
            }
            c => {
                literal.push(c);
                *pos += 1;
            }
        }
    }

    if nested {
        return Err(MejaError::Format(format!("unbalanced '[' in '{}'", pattern)));
    }
    flush(&mut literal, &mut tokens);
    Ok(tokens)
}

fn pad(value: i64, width: usize) -> String {
    if value < 0 {
        format!("-{:0width$}", -value, width = width)
    } else {
        format!("{:0width$}", value, width = width)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Fields {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    hour12: Option<u32>,
    pm: Option<bool>,
    minute: Option<u32>,
    second: Option<u32>,
}

impl DatePattern {
    pub fn compile(pattern: &str) -> MejaResult<Self> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut pos = 0;
        let tokens = compile_tokens(&chars, &mut pos, false, pattern)?;
        if !tokens.iter().any(|t| matches!(t, Token::Field(..) | Token::Optional(_))) {
            return Err(MejaError::Format(format!("not a date pattern: '{}'", pattern)));
        }
        Ok(DatePattern { tokens })
    }

    pub fn format_date(&self, date: NaiveDate, locale: Locale) -> String {
        self.format_date_time(date.and_time(NaiveTime::MIN), locale, false)
    }

    /// Format a date-time. When `with_time` is false, optional sections
    /// that only contain time fields are left out.
    pub fn format_date_time(&self, dt: NaiveDateTime, locale: Locale, with_time: bool) -> String {
        let mut out = String::new();
        format_tokens(&self.tokens, dt, locale, with_time, &mut out);
        out
    }

    pub fn parse(&self, text: &str, locale: Locale) -> Option<ParsedDate> {
        let chars: Vec<char> = text.chars().collect();
        let mut fields = Fields::default();
        let pos = parse_tokens(&self.tokens, &chars, 0, locale, &mut fields)?;
        if pos != chars.len() {
            return None;
        }

        let date = NaiveDate::from_ymd_opt(fields.year?, fields.month?, fields.day?)?;

        let hour = match (fields.hour, fields.hour12) {
            (Some(h), _) => Some(h),
            (None, Some(h)) => {
                let h = h % 12;
                Some(if fields.pm.unwrap_or(false) { h + 12 } else { h })
            }
            (None, None) => None,
        };

        let time = match hour {
            Some(h) => Some(NaiveTime::from_hms_opt(
                h,
                fields.minute.unwrap_or(0),
                fields.second.unwrap_or(0),
            )?),
            None => None,
        };

        Some(ParsedDate { date, time })
    }
}

fn has_time_field(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| match t {
        Token::Field(c, _) => "Hhmsa".contains(*c),
        Token::Optional(inner) => has_time_field(inner),
        Token::Literal(_) => false,
    })
}

fn format_tokens(tokens: &[Token], dt: NaiveDateTime, locale: Locale, with_time: bool, out: &mut String) {
    for token in tokens {
        match token {
            Token::Literal(s) => out.push_str(s),
            Token::Optional(inner) => {
                if with_time || !has_time_field(inner) {
                    format_tokens(inner, dt, locale, with_time, out);
                }
            }
            Token::Field(c, n) => {
                let n = *n;
                let text = match c {
                    'y' => match n {
                        2 => pad((dt.year() % 100) as i64, 2),
                        _ => pad(dt.year() as i64, n),
                    },
                    'M' => match n {
                        1 | 2 => pad(dt.month() as i64, n),
                        3 => locale.month_name(dt.month(), true).to_string(),
                        _ => locale.month_name(dt.month(), false).to_string(),
                    },
                    'd' => pad(dt.day() as i64, n),
                    'E' => locale.weekday_name(dt.weekday(), n <= 3).to_string(),
                    'H' => pad(dt.hour() as i64, n),
                    'h' => {
                        let h = dt.hour() % 12;
                        pad(if h == 0 { 12 } else { h } as i64, n)
                    }
                    'm' => pad(dt.minute() as i64, n),
                    's' => pad(dt.second() as i64, n),
                    'a' => (if dt.hour() < 12 { "AM" } else { "PM" }).to_string(),
                    _ => String::new(),
                };
                out.push_str(&text);
            }
        }
    }
}

fn read_number(chars: &[char], pos: usize, max_len: usize) -> Option<(u32, usize)> {
    let mut end = pos;
    while end < chars.len() && end - pos < max_len && chars[end].is_ascii_digit() {
        end += 1;
    }
    if end == pos {
        return None;
    }
    let s: String = chars[pos..end].iter().collect();
    s.parse().ok().map(|v| (v, end))
}

fn match_text(chars: &[char], pos: usize, candidate: &str) -> Option<usize> {
    let cand: Vec<char> = candidate.chars().collect();
    if pos + cand.len() > chars.len() {
        return None;
    }
    let matches = chars[pos..pos + cand.len()]
        .iter()
        .zip(cand.iter())
        .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()));
    matches.then_some(pos + cand.len())
}

fn parse_tokens(tokens: &[Token], chars: &[char], mut pos: usize, locale: Locale, fields: &mut Fields) -> Option<usize> {
    for token in tokens {
        match token {
            Token::Literal(s) => {
                pos = match_text(chars, pos, s)?;
            }
            Token::Optional(inner) => {
                let mut trial = *fields;
                if let Some(p) = parse_tokens(inner, chars, pos, locale, &mut trial) {
                    *fields = trial;
                    pos = p;
                }
            }
            Token::Field(c, n) => {
                let n = *n;
                match c {
                    'y' => {
                        let (v, end) = read_number(chars, pos, if n == 2 { 2 } else { 9 })?;
                        fields.year = Some(if n == 2 && end - pos == 2 { 2000 + v as i32 } else { v as i32 });
                        pos = end;
                    }
                    'M' if n >= 3 => {
                        let abbreviated = n == 3;
                        let (month, end) = (1..=12).find_map(|m| {
                            match_text(chars, pos, locale.month_name(m, abbreviated)).map(|e| (m, e))
                        })?;
                        fields.month = Some(month);
                        pos = end;
                    }
                    'E' => {
                        let abbreviated = n <= 3;
                        let end = [
                            chrono::Weekday::Mon,
                            chrono::Weekday::Tue,
                            chrono::Weekday::Wed,
                            chrono::Weekday::Thu,
                            chrono::Weekday::Fri,
                            chrono::Weekday::Sat,
                            chrono::Weekday::Sun,
                        ]
                        .iter()
                        .find_map(|d| match_text(chars, pos, locale.weekday_name(*d, abbreviated)))?;
                        pos = end;
                    }
                    'a' => {
                        if let Some(end) = match_text(chars, pos, "AM") {
                            fields.pm = Some(false);
                            pos = end;
                        } else {
                            pos = match_text(chars, pos, "PM")?;
                            fields.pm = Some(true);
                        }
                    }
                    _ => {
                        let (v, end) = read_number(chars, pos, 2)?;
                        match c {
                            'M' => fields.month = Some(v),
                            'd' => fields.day = Some(v),
                            'H' => fields.hour = Some(v),
                            'h' => fields.hour12 = Some(v),
                            'm' => fields.minute = Some(v),
                            's' => fields.second = Some(v),
                            _ => return None,
                        }
                        pos = end;
                    }
                }
            }
        }
    }
    Some(pos)
}
