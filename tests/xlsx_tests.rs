//! Excel round-trip tests: workbooks written with the XLSX exporter and read
//! back with the importer.

use chrono::NaiveDate;
use meja::io::{IoOptions, XlsxExporter, XlsxImporter};
use meja::model::{CellValue, Color, FillPattern, Workbook};
use pretty_assertions::assert_eq;
use std::io::{Cursor, Read};
use tempfile::TempDir;
use zip::ZipArchive;

fn sample_workbook() -> Workbook {
    let mut workbook = Workbook::new();

    let header = workbook.cell_style("header");
    workbook.style_mut(header).set_fill_fg_color(Color::LIGHTBLUE);
    workbook.style_mut(header).set_fill_pattern(FillPattern::Solid);
    let money = workbook.cell_style("money");
    workbook.style_mut(money).set_data_format("#,##0.00");

    let sheet = workbook.create_sheet("Budget");
    sheet.create_row(["Item", "Amount", "Due", "Paid"]);
    for j in 0..4 {
        sheet.cell_mut(0, j).set_style(header);
    }

    let due = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    sheet.create_row(vec![
        CellValue::from("Rent"),
        CellValue::Number(1200.0),
        CellValue::Date(due),
        CellValue::Boolean(true),
    ]);
    sheet.create_row(vec![
        CellValue::from("Power"),
        CellValue::Number(80.5),
        CellValue::DateTime(due.and_hms_opt(18, 30, 0).unwrap()),
        CellValue::Boolean(false),
    ]);
    sheet.cell_mut(1, 1).set_style(money);
    sheet.cell_mut(2, 1).set_style(money);
    sheet.cell_mut(3, 0).set("Total");
    sheet.cell_mut(3, 1).set_formula("SUM(B2:B3)");

    sheet.cell_mut(5, 0).set("Notes");
    sheet.merge_cells(5, 0, 3, 2).unwrap();
    sheet.split_at(1, 0);
    sheet.set_column_width(0, 120.0);

    workbook.create_sheet("Empty");
    workbook
}

/// Contents of one part of an XLSX archive.
fn xlsx_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

fn reimport(bytes: &[u8]) -> Workbook {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("copy.xlsx");
    std::fs::write(&path, bytes).unwrap();
    let mut workbook = Workbook::new();
    XlsxImporter::new(&path).import(&mut workbook).unwrap();
    workbook
}

#[test]
fn test_xlsx_round_trip_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("budget.xlsx");

    XlsxExporter::new(&sample_workbook()).export(&path).unwrap();

    let mut workbook = Workbook::new();
    XlsxImporter::new(&path).import(&mut workbook).unwrap();

    assert_eq!(workbook.sheet_count(), 2);
    let sheet = workbook.sheet(0).unwrap();
    assert_eq!(sheet.name(), "Budget");
    assert_eq!(workbook.sheet(1).unwrap().name(), "Empty");

    let value = |i, j| sheet.cell(i, j).unwrap().value().clone();
    assert_eq!(value(0, 0), CellValue::from("Item"));
    assert_eq!(value(1, 1), CellValue::Number(1200.0));
    assert_eq!(value(2, 1), CellValue::Number(80.5));
    assert_eq!(value(1, 3), CellValue::Boolean(true));
    assert_eq!(
        value(1, 2),
        CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    );
    assert_eq!(
        value(2, 2),
        CellValue::DateTime(
            NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap()
        )
    );
    assert_eq!(value(3, 1), CellValue::Formula("SUM(B2:B3)".to_string()));
}

#[test]
fn test_xlsx_round_trip_merged_regions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("merged.xlsx");

    XlsxExporter::new(&sample_workbook()).export(&path).unwrap();
    let workbook = Workbook::open(&path, &IoOptions::default()).unwrap();
    let sheet = workbook.sheet(0).unwrap();

    assert_eq!(sheet.merged_regions().len(), 1);
    let region = sheet.merged_regions()[0];
    assert_eq!(region.first_row(), 5);
    assert_eq!(region.last_row(), 6);
    assert_eq!(region.first_column(), 0);
    assert_eq!(region.last_column(), 2);

    let top_left = sheet.cell(5, 0).unwrap();
    assert_eq!(top_left.value(), &CellValue::from("Notes"));
    assert_eq!(top_left.horizontal_span(), 3);
    assert_eq!(top_left.vertical_span(), 2);
    assert_eq!(sheet.cell(6, 2).unwrap().logical_cell(), (5, 0));
}

#[test]
fn test_xlsx_to_buffer() {
    let bytes = XlsxExporter::new(&sample_workbook()).to_buffer().unwrap();
    // XLSX files are zip archives
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_xlsx_invalid_sheet_name() {
    let mut workbook = Workbook::new();
    workbook.create_sheet("bad/name");
    assert!(XlsxExporter::new(&workbook).to_buffer().is_err());
}

#[test]
fn test_xlsx_import_missing_file() {
    let dir = TempDir::new().unwrap();
    let mut workbook = Workbook::new();
    let result = XlsxImporter::new(dir.path().join("missing.xlsx")).import(&mut workbook);
    assert!(result.is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// HYPERLINKS, STYLES AND LAYOUT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_xlsx_hyperlink_keeps_value_and_style() {
    let mut workbook = Workbook::new();
    let linked = workbook.cell_style("linked");
    workbook
        .style_mut(linked)
        .set_fill_fg_color(Color::rgb(0x12, 0x34, 0x56));
    workbook.style_mut(linked).set_fill_pattern(FillPattern::Solid);

    let sheet = workbook.create_sheet("Links");
    sheet
        .cell_mut(0, 0)
        .set(25.0)
        .set_style(linked)
        .set_hyperlink("https://example.com/");
    sheet
        .cell_mut(0, 1)
        .set("docs")
        .set_hyperlink("https://example.com/docs");

    let bytes = XlsxExporter::new(&workbook).to_buffer().unwrap();

    let worksheet = xlsx_part(&bytes, "xl/worksheets/sheet1.xml");
    assert!(worksheet.contains("<hyperlink ref=\"A1\""));
    assert!(worksheet.contains("<hyperlink ref=\"B1\""));
    let rels = xlsx_part(&bytes, "xl/worksheets/_rels/sheet1.xml.rels");
    assert!(rels.contains("https://example.com/"));
    assert!(rels.contains("https://example.com/docs"));
    assert!(xlsx_part(&bytes, "xl/styles.xml").contains("FF123456"));

    let copy = reimport(&bytes);
    let sheet = copy.sheet(0).unwrap();
    assert_eq!(sheet.cell(0, 0).unwrap().value(), &CellValue::Number(25.0));
    assert_eq!(sheet.cell(0, 1).unwrap().value(), &CellValue::from("docs"));
}

#[test]
fn test_xlsx_calendar_holiday_stays_a_number() {
    let workbook = meja::cli::samples::create_calendar(2025, meja::format::Locale::De).unwrap();
    let bytes = XlsxExporter::new(&workbook).to_buffer().unwrap();
    let copy = reimport(&bytes);

    let original = workbook.sheet(0).unwrap();
    let (i, j) = original
        .rows()
        .flat_map(|row| row.cells())
        .find(|cell| cell.hyperlink().is_some())
        .map(|cell| (cell.row_number(), cell.column_number()))
        .unwrap();
    assert_eq!(
        copy.sheet(0).unwrap().cell(i, j).unwrap().value(),
        &CellValue::Number(25.0)
    );
}

#[test]
fn test_xlsx_layout() {
    let mut workbook = sample_workbook();
    let sheet = workbook.sheet_mut(0).unwrap();
    sheet.set_auto_filter_row(Some(0));
    sheet.set_zoom(1.5).unwrap();
    sheet.set_row_height(0, 30.0);

    let bytes = XlsxExporter::new(&workbook).to_buffer().unwrap();
    let worksheet = xlsx_part(&bytes, "xl/worksheets/sheet1.xml");

    // freeze panes below the header row
    assert!(worksheet.contains("ySplit=\"1\""));
    assert!(worksheet.contains("state=\"frozen\""));
    assert!(worksheet.contains("<autoFilter ref=\"A1:"));
    assert!(worksheet.contains("zoomScale=\"150\""));
    assert!(worksheet.contains("<col min=\"1\" max=\"1\""));
    assert!(worksheet.contains("customWidth=\"1\""));
    assert!(worksheet.contains("ht=\"30\""));
    assert!(worksheet.contains("<mergeCell ref=\"A6:C7\""));

    let styles = xlsx_part(&bytes, "xl/styles.xml");
    // header fill
    assert!(styles.contains("FFADD8E6"));
}

// ═══════════════════════════════════════════════════════════════════════════
// DATES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_xlsx_early_dates() {
    let dates = [
        NaiveDate::from_ymd_opt(1900, 1, 15).unwrap(),
        NaiveDate::from_ymd_opt(1900, 2, 28).unwrap(),
        NaiveDate::from_ymd_opt(1900, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(1999, 12, 31).unwrap(),
    ];

    let mut workbook = Workbook::new();
    let sheet = workbook.create_sheet("Dates");
    for date in dates {
        sheet.create_row(vec![CellValue::Date(date)]);
    }
    let before_excel = NaiveDate::from_ymd_opt(1899, 12, 31).unwrap();
    sheet.create_row(vec![CellValue::Date(before_excel)]);

    let copy = reimport(&XlsxExporter::new(&workbook).to_buffer().unwrap());
    let sheet = copy.sheet(0).unwrap();
    for (i, date) in dates.iter().enumerate() {
        assert_eq!(sheet.cell(i, 0).unwrap().value(), &CellValue::Date(*date));
    }
    assert_eq!(
        sheet.cell(4, 0).unwrap().value(),
        &CellValue::from("1899-12-31")
    );
}
