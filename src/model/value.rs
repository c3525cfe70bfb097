use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Text shown for cells holding an error.
pub const ERROR_TEXT: &str = "#ERROR";

/// Type of a cell's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellType {
    Blank = 0,
    Boolean = 1,
    Error = 2,
    Formula = 3,
    Numeric = 4,
    Text = 5,
    Date = 6,
    DateTime = 7,
}

impl CellType {
    pub const ALL: [CellType; 8] = [
        CellType::Blank,
        CellType::Boolean,
        CellType::Error,
        CellType::Formula,
        CellType::Numeric,
        CellType::Text,
        CellType::Date,
        CellType::DateTime,
    ];

    pub fn ordinal(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            CellType::Blank => "BLANK",
            CellType::Boolean => "BOOLEAN",
            CellType::Error => "ERROR",
            CellType::Formula => "FORMULA",
            CellType::Numeric => "NUMERIC",
            CellType::Text => "TEXT",
            CellType::Date => "DATE",
            CellType::DateTime => "DATE_TIME",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Content of a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Blank,
    Boolean(bool),
    Error,
    /// Formula text without the leading `=`
    Formula(String),
    Number(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn cell_type(&self) -> CellType {
        match self {
            CellValue::Blank => CellType::Blank,
            CellValue::Boolean(_) => CellType::Boolean,
            CellValue::Error => CellType::Error,
            CellValue::Formula(_) => CellType::Formula,
            CellValue::Number(_) => CellType::Numeric,
            CellValue::Text(_) => CellType::Text,
            CellValue::Date(_) => CellType::Date,
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Boolean(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        if v.is_empty() {
            CellValue::Blank
        } else {
            CellValue::Text(v.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        if v.is_empty() {
            CellValue::Blank
        } else {
            CellValue::Text(v)
        }
    }
}

impl From<NaiveDate> for CellValue {
    fn from(v: NaiveDate) -> Self {
        CellValue::Date(v)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(v: NaiveDateTime) -> Self {
        CellValue::DateTime(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}
