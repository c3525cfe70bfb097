//! Column names and A1-style cell references

use crate::error::{MejaError, MejaResult};
use regex::Regex;

/// Options controlling how a cell reference is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefOption {
    /// Prefix the row with `$`.
    FixRow,
    /// Prefix the column with `$`.
    FixColumn,
    /// Prefix the reference with the quoted sheet name.
    WithSheet,
}

/// Convert a zero-based column number to its name: 0 → "A", 26 → "AA".
pub fn column_name(j: usize) -> String {
    let mut name = Vec::new();
    let mut n = j + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// Convert a column name back to its zero-based number. Case is ignored.
pub fn column_number(name: &str) -> MejaResult<usize> {
    if name.is_empty() {
        return Err(MejaError::Argument(format!(
            "'{}' is no valid column name.",
            name
        )));
    }

    let mut col: usize = 0;
    for c in name.chars() {
        let c = c.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            return Err(MejaError::Argument(format!(
                "'{}' is no valid column name.",
                name
            )));
        }
        let d = (c as usize) - ('A' as usize) + 1;
        col = col
            .checked_mul(26)
            .and_then(|v| v.checked_add(d))
            .ok_or_else(|| MejaError::Argument(format!("column name too long: '{}'", name)))?;
    }
    Ok(col - 1)
}

/// Row label as shown in a spreadsheet application (one-based).
pub fn row_name(i: usize) -> String {
    (i + 1).to_string()
}

/// Render a cell reference such as `A1`, `$B$3` or `'Sheet 1'!C4`.
pub fn cell_ref(sheet_name: &str, i: usize, j: usize, options: &[RefOption]) -> String {
    let mut prefix_row = "";
    let mut prefix_column = "";
    let mut sheet = String::new();
    for o in options {
        match o {
            RefOption::FixColumn => prefix_column = "$",
            RefOption::FixRow => prefix_row = "$",
            RefOption::WithSheet => sheet = format!("'{}'!", sheet_name),
        }
    }
    format!(
        "{}{}{}{}{}",
        sheet,
        prefix_column,
        column_name(j),
        prefix_row,
        row_name(i)
    )
}

/// A parsed cell address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAddress {
    pub sheet: Option<String>,
    pub row: usize,
    pub column: usize,
}

impl CellAddress {
    /// Parse `B3`, `$B$3`, `Sheet1!B3` or `'My Sheet'!B3`.
    pub fn parse(s: &str) -> MejaResult<Self> {
        // Pattern: A1, $A$1, Sheet!A1 or 'Sheet Name'!A1
        let pattern = Regex::new(r"^(?:'((?:[^']|'')+)'!|([A-Za-z0-9_]+)!)?\$?([A-Za-z]{1,3})\$?([0-9]+)$")
            .map_err(|e| MejaError::Format(format!("Regex error: {}", e)))?;

        let caps = pattern
            .captures(s.trim())
            .ok_or_else(|| MejaError::Argument(format!("invalid cell reference: '{}'", s)))?;

        let sheet = caps
            .get(1)
            .map(|m| m.as_str().replace("''", "'"))
            .or_else(|| caps.get(2).map(|m| m.as_str().to_string()));
        let column = column_number(&caps[3])?;
        let row: usize = caps[4]
            .parse()
            .map_err(|_| MejaError::Argument(format!("invalid row in '{}'", s)))?;
        if row == 0 {
            return Err(MejaError::Argument(format!("invalid row in '{}'", s)));
        }

        Ok(CellAddress {
            sheet,
            row: row - 1,
            column,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(51), "AZ");
        assert_eq!(column_name(52), "BA");
        assert_eq!(column_name(676), "ZA");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn test_column_numbers() {
        assert_eq!(column_number("A").unwrap(), 0);
        assert_eq!(column_number("aa").unwrap(), 26);
        assert_eq!(column_number("ZZ").unwrap(), 701);
        assert_eq!(column_number("AAA").unwrap(), 702);
        for j in [0, 1, 25, 26, 27, 300, 701, 702, 16383] {
            assert_eq!(column_number(&column_name(j)).unwrap(), j);
        }
    }

    #[test]
    fn test_invalid_column_name() {
        let err = column_number("A1").unwrap_err();
        assert!(err.to_string().contains("'A1' is no valid column name."));
        assert!(column_number("").is_err());
    }

    #[test]
    fn test_cell_ref_options() {
        assert_eq!(cell_ref("Sheet", 0, 0, &[]), "A1");
        assert_eq!(
            cell_ref("Sheet", 0, 0, &[RefOption::FixRow, RefOption::FixColumn]),
            "$A$1"
        );
        assert_eq!(
            cell_ref("Sheet 1", 2, 1, &[RefOption::WithSheet]),
            "'Sheet 1'!B3"
        );
        assert_eq!(
            cell_ref("S", 9, 27, &[RefOption::WithSheet, RefOption::FixRow]),
            "'S'!AB$10"
        );
    }

    #[test]
    fn test_parse_address() {
        let a = CellAddress::parse("B3").unwrap();
        assert_eq!((a.row, a.column, a.sheet), (2, 1, None));

        let a = CellAddress::parse("'My Sheet'!$C$10").unwrap();
        assert_eq!(a.sheet.as_deref(), Some("My Sheet"));
        assert_eq!((a.row, a.column), (9, 2));

        let a = CellAddress::parse("Data!aa1").unwrap();
        assert_eq!(a.sheet.as_deref(), Some("Data"));
        assert_eq!(a.column, 26);

        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("1A").is_err());
    }
}
