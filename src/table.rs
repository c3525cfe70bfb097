//! Filling sheets from tabular record sources

use crate::error::{MejaError, MejaResult};
use crate::model::{CellValue, Sheet};
use serde_json::{Map, Value};
use tracing::debug;

/// A source of records with a fixed set of column labels.
pub trait RecordSet {
    fn labels(&self) -> Vec<String>;

    /// The next record, or `None` when exhausted.
    fn next_record(&mut self) -> MejaResult<Option<Vec<CellValue>>>;
}

/// Append the records of `records` to `sheet`, optionally preceded by a header
/// row with the labels. Returns the number of data rows written.
pub fn fill(sheet: &mut Sheet, records: &mut impl RecordSet, with_header: bool) -> MejaResult<usize> {
    if with_header {
        sheet.create_row(records.labels());
    }

    let mut count = 0;
    while let Some(record) = records.next_record()? {
        sheet.create_row(record);
        count += 1;
    }
    debug!("filled sheet '{}' with {} records", sheet.name(), count);
    Ok(count)
}

/// Records from a JSON array of objects.
///
/// Labels are the keys of the first object; later objects are read by those
/// keys and extra keys are ignored.
pub struct JsonRecords {
    labels: Vec<String>,
    objects: std::vec::IntoIter<Map<String, Value>>,
}

impl JsonRecords {
    pub fn parse(json: &str) -> MejaResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> MejaResult<Self> {
        let Value::Array(items) = value else {
            return Err(MejaError::Argument(
                "expected a JSON array of objects".to_string(),
            ));
        };

        let objects = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(MejaError::Argument(format!(
                    "record {} is not an object: {}",
                    i, other
                ))),
            })
            .collect::<MejaResult<Vec<_>>>()?;

        let labels = objects
            .first()
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        Ok(JsonRecords {
            labels,
            objects: objects.into_iter(),
        })
    }
}

fn json_cell(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Blank,
        Some(Value::Bool(b)) => CellValue::Boolean(*b),
        Some(Value::Number(n)) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Error),
        Some(Value::String(s)) => CellValue::from(s.as_str()),
        Some(other) => CellValue::Text(other.to_string()),
    }
}

impl RecordSet for JsonRecords {
    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn next_record(&mut self) -> MejaResult<Option<Vec<CellValue>>> {
        Ok(self.objects.next().map(|object| {
            self.labels
                .iter()
                .map(|label| json_cell(object.get(label)))
                .collect()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Workbook;
    use pretty_assertions::assert_eq;

    const PEOPLE: &str = r#"[
        {"name": "Ada", "born": 1815, "mathematician": true},
        {"name": "Grace", "born": 1906, "nick": "Amazing Grace"},
        {"born": null, "name": "Nobody"}
    ]"#;

    #[test]
    fn test_fill_with_header() {
        let mut workbook = Workbook::new();
        let sheet = workbook.create_sheet("people");
        let mut records = JsonRecords::parse(PEOPLE).unwrap();

        let n = fill(sheet, &mut records, true).unwrap();
        assert_eq!(n, 3);
        assert_eq!(sheet.row_count(), 4);
        assert_eq!(sheet.cell(0, 0).unwrap().value(), &CellValue::from("name"));
        assert_eq!(sheet.cell(1, 1).unwrap().value(), &CellValue::Number(1815.0));
        assert_eq!(sheet.cell(1, 2).unwrap().value(), &CellValue::Boolean(true));
        assert_eq!(sheet.cell(3, 0).unwrap().value(), &CellValue::from("Nobody"));
        assert!(sheet.cell(3, 1).map_or(true, |c| c.is_empty()));
    }

    #[test]
    fn test_fill_without_header() {
        let mut workbook = Workbook::new();
        let sheet = workbook.create_sheet("people");
        let mut records = JsonRecords::parse(PEOPLE).unwrap();

        assert_eq!(fill(sheet, &mut records, false).unwrap(), 3);
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.cell(0, 0).unwrap().value(), &CellValue::from("Ada"));
    }

    #[test]
    fn test_invalid_json_records() {
        assert!(JsonRecords::parse(r#"{"a": 1}"#).is_err());
        assert!(JsonRecords::parse(r#"[1, 2]"#).is_err());
        assert!(JsonRecords::parse("not json").is_err());

        let mut empty = JsonRecords::parse("[]").unwrap();
        assert!(empty.labels().is_empty());
        assert!(empty.next_record().unwrap().is_none());
    }
}
