//! Workbook I/O tests through the public API: CSV with locales and
//! character sets, streaming reads and HTML export of opened files.

use chrono::NaiveDate;
use meja::format::Locale;
use meja::io::{CsvReader, DateFormat, HtmlWriter, IoOptions, ListRowBuilder, RowBuilder};
use meja::model::{CellValue, WorkbookEvent};
use meja::{MejaError, Workbook};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn german_options() -> IoOptions {
    IoOptions {
        charset: "windows-1252".to_string(),
        ..IoOptions::new(Locale::De)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CSV
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_csv_round_trip_with_charset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preise.csv");
    let options = german_options();

    let mut workbook = Workbook::with_locale(Locale::De);
    let sheet = workbook.create_sheet("Preise");
    sheet.create_row(["Artikel", "Preis"]);
    sheet.create_row(vec![CellValue::from("Käse"), CellValue::Number(4.5)]);
    sheet.create_row(vec![CellValue::from("Brötchen"), CellValue::Number(0.35)]);
    workbook.write(&path, &options).unwrap();

    // windows-1252 encodes umlauts as single bytes
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.contains(&0xe4));
    assert!(std::str::from_utf8(&bytes).is_err());

    let copy = Workbook::open(&path, &options).unwrap();
    let sheet = copy.sheet(0).unwrap();
    assert_eq!(sheet.row_count(), 3);
    assert_eq!(sheet.cell(1, 0).unwrap().value(), &CellValue::from("Käse"));
    assert_eq!(sheet.cell(1, 1).unwrap().value(), &CellValue::Number(4.5));
    assert_eq!(sheet.cell(2, 1).unwrap().value(), &CellValue::Number(0.35));
}

#[test]
fn test_csv_dates_by_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dates.csv");
    fs::write(&path, "when\n2024-02-29\n2024-02-29 13:45\n29.02.24\n").unwrap();

    let iso = IoOptions {
        date_format: DateFormat::Iso,
        ..IoOptions::default()
    };
    let workbook = Workbook::open(&path, &iso).unwrap();
    let sheet = workbook.sheet(0).unwrap();
    let leap_day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    assert_eq!(sheet.cell(1, 0).unwrap().value(), &CellValue::Date(leap_day));
    assert_eq!(
        sheet.cell(2, 0).unwrap().value(),
        &CellValue::DateTime(leap_day.and_hms_opt(13, 45, 0).unwrap())
    );
    assert_eq!(sheet.cell(3, 0).unwrap().value(), &CellValue::from("29.02.24"));

    let german = IoOptions::new(Locale::De);
    let workbook = Workbook::open(&path, &german).unwrap();
    let sheet = workbook.sheet(0).unwrap();
    assert_eq!(sheet.cell(3, 0).unwrap().value(), &CellValue::Date(leap_day));
}

#[test]
fn test_csv_streaming_reader() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    fs::write(
        &path,
        "# exported log\n# do not edit\nlevel,message\nINFO,started\nWARN,\"disk \"\"/\"\" almost full\"\nINFO,stopped\n",
    )
    .unwrap();

    let mut reader = CsvReader::from_path(&path, &IoOptions::default()).unwrap();
    assert_eq!(reader.ignore_rows(2).unwrap(), 2);
    assert_eq!(reader.read_column_names().unwrap(), ["level", "message"]);

    let mut builder = ListRowBuilder::default();
    assert_eq!(reader.read_some(2, &mut builder).unwrap(), 2);
    assert_eq!(builder.row(), ["WARN", "disk \"/\" almost full"]);
    assert_eq!(reader.rows_read(), 2);

    struct Count(usize);
    impl RowBuilder for Count {
        fn start_row(&mut self) -> meja::MejaResult<()> {
            self.0 += 1;
            Ok(())
        }
        fn add(&mut self, _value: &str) -> meja::MejaResult<()> {
            Ok(())
        }
        fn end_row(&mut self) -> meja::MejaResult<()> {
            Ok(())
        }
    }
    let mut count = Count(0);
    assert_eq!(reader.read_all(&mut count).unwrap(), 1);
    assert_eq!(count.0, 1);
    assert_eq!(reader.rows_read(), 3);
}

#[test]
fn test_csv_field_count_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.csv");
    fs::write(&path, "a,b,c\n1,2\n").unwrap();

    let mut reader = CsvReader::from_path(&path, &IoOptions::default()).unwrap();
    reader.read_column_names().unwrap();
    let err = reader
        .read_row(&mut ListRowBuilder::default())
        .unwrap_err();
    match err {
        MejaError::Csv { message, line, .. } => {
            assert_eq!(message, "not enough fields.");
            assert_eq!(line, 2);
        }
        other => panic!("unexpected error: {}", other),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// URI and HTML
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_open_sets_uri_and_html_links_are_relative() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.csv");
    fs::write(&path, "page\nother\n").unwrap();

    let mut workbook = Workbook::open(&path, &IoOptions::default()).unwrap();
    let events = workbook.subscribe();
    assert!(workbook.uri().is_some());

    workbook
        .sheet_mut(0)
        .unwrap()
        .cell_mut(1, 0)
        .set_hyperlink("other.html");

    let mut html = Vec::new();
    HtmlWriter::with_id("W1", Locale::Root)
        .write(&workbook, &mut html)
        .unwrap();
    let html = String::from_utf8(html).unwrap();
    assert!(html.contains("href=\"other.html\""));
    assert!(html.contains("W1_S"));

    workbook.set_uri(None);
    assert!(matches!(
        events.try_recv().unwrap(),
        WorkbookEvent::UriChanged { new: None, .. }
    ));
}
