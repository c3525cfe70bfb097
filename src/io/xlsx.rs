//! Excel import (`.xlsx`, `.xlsm`, `.xls`) and export (`.xlsx`)

use crate::error::{MejaError, MejaResult};
use crate::model::{
    BorderStyle, CellStyle, CellValue, Direction, FillPattern, HAlign, Sheet, StyleId, VAlign,
    Workbook,
};
use calamine::{open_workbook_auto, Data, Dimensions, Range, Reader, Sheets};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_xlsxwriter::{
    ExcelDateTime, Format, FormatAlign, FormatBorder, FormatPattern, FormatUnderline,
    Url as XlsxUrl, Workbook as XlsxWorkbook, Worksheet,
};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Width of one Excel character unit in points.
const POINTS_PER_CHAR: f64 = 5.25;

const DEFAULT_DATE_FORMAT: &str = "yyyy-mm-dd";
const DEFAULT_DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Excel date for `dt`; `None` before 1900, which Excel cannot represent.
fn excel_date_time(dt: NaiveDateTime) -> Option<ExcelDateTime> {
    let year = u16::try_from(dt.year()).ok()?;
    ExcelDateTime::from_ymd(year, dt.month() as u8, dt.day() as u8)
        .and_then(|d| d.and_hms(dt.hour() as u16, dt.minute() as u8, dt.second()))
        .ok()
}

/// Cell value for an imported date; midnight yields a date.
fn date_value(dt: NaiveDateTime) -> CellValue {
    if dt.num_seconds_from_midnight() == 0 {
        CellValue::Date(dt.date())
    } else {
        CellValue::DateTime(dt)
    }
}

//==============================================================================
// Export
//==============================================================================

/// Writes a [`Workbook`] as an Excel 2007+ file.
pub struct XlsxExporter<'a> {
    workbook: &'a Workbook,
    /// Excel format per cell style
    formats: HashMap<StyleId, Format>,
}

impl<'a> XlsxExporter<'a> {
    pub fn new(workbook: &'a Workbook) -> Self {
        let formats = workbook
            .styles()
            .iter()
            .map(|(id, _, style)| (id, build_format(style)))
            .collect();
        Self { workbook, formats }
    }

    /// Export the workbook to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> MejaResult<()> {
        let mut xlsx = self.build()?;
        xlsx.save(output_path)
            .map_err(|e| MejaError::Export(format!("Failed to save Excel file: {}", e)))?;
        debug!("wrote {}", output_path.display());
        Ok(())
    }

    /// Export into memory.
    pub fn to_buffer(&self) -> MejaResult<Vec<u8>> {
        let mut xlsx = self.build()?;
        xlsx.save_to_buffer()
            .map_err(|e| MejaError::Export(format!("Failed to write Excel data: {}", e)))
    }

    fn build(&self) -> MejaResult<XlsxWorkbook> {
        let mut xlsx = XlsxWorkbook::new();
        let current = self.workbook.current_sheet_index();
        for (idx, sheet) in self.workbook.sheets().enumerate() {
            let worksheet = xlsx.add_worksheet();
            worksheet
                .set_name(sheet.name())
                .map_err(|e| MejaError::Export(format!("Failed to set worksheet name: {}", e)))?;
            if idx == current {
                worksheet.set_active(true);
            }
            self.export_sheet(worksheet, sheet)?;
        }
        Ok(xlsx)
    }

    fn format(&self, id: StyleId) -> Format {
        self.formats.get(&id).cloned().unwrap_or_default()
    }

    /// Format for a date cell: the style's data format or a default date format.
    fn date_format(&self, id: StyleId, with_time: bool) -> Format {
        let style = self.workbook.style(id);
        let format = self.format(id);
        if style.data_format().is_empty() {
            format.set_num_format(if with_time {
                DEFAULT_DATE_TIME_FORMAT
            } else {
                DEFAULT_DATE_FORMAT
            })
        } else {
            format.set_num_format(excel_date_format(style.data_format()))
        }
    }

    fn export_sheet(&self, worksheet: &mut Worksheet, sheet: &Sheet) -> MejaResult<()> {
        let err = |e: rust_xlsxwriter::XlsxError| {
            MejaError::Export(format!("sheet '{}': {}", sheet.name(), e))
        };

        for row in sheet.rows() {
            for cell in row.cells() {
                let r = row.row_number() as u32;
                let c = cell.column_number() as u16;
                let id = cell.style_id();

                // the link writes its text as a string, the typed value replaces it
                if let Some(link) = cell.hyperlink() {
                    let target = cell
                        .resolved_hyperlink(self.workbook.uri())
                        .ok()
                        .flatten()
                        .map(|u| u.to_string())
                        .unwrap_or_else(|| link.to_string());
                    let url = XlsxUrl::new(target).set_text(self.workbook.format_cell(cell));
                    worksheet
                        .write_url_with_format(r, c, url, &self.format(id))
                        .map_err(err)?;
                }

                self.write_value(worksheet, r, c, cell.value(), id)
                    .map_err(err)?;
            }
        }

        for region in sheet.merged_regions() {
            let (i, j) = (region.first_row(), region.first_column());
            let Some(cell) = sheet.cell(i, j) else {
                continue;
            };
            let format = self.format(cell.style_id());
            worksheet
                .merge_range(
                    i as u32,
                    j as u16,
                    region.last_row() as u32,
                    region.last_column() as u16,
                    "",
                    &format,
                )
                .map_err(err)?;
            // merge_range writes an empty string to the top-left cell
            self.write_value(worksheet, i as u32, j as u16, cell.value(), cell.style_id())
                .map_err(err)?;
        }

        for j in 0..sheet.column_count() {
            if let Some(width) = sheet.column_width_if_set(j) {
                worksheet
                    .set_column_width(j as u16, width as f64 / POINTS_PER_CHAR)
                    .map_err(err)?;
            }
        }
        for i in 0..sheet.row_count() {
            if let Some(height) = sheet.row_height_if_set(i) {
                worksheet.set_row_height(i as u32, height as f64).map_err(err)?;
            }
        }

        if sheet.split_row() > 0 || sheet.split_column() > 0 {
            worksheet
                .set_freeze_panes(sheet.split_row() as u32, sheet.split_column() as u16)
                .map_err(err)?;
        }

        if let Some(i) = sheet.auto_filter_row() {
            if sheet.column_count() > 0 {
                let last_row = sheet.row_count().saturating_sub(1).max(i);
                worksheet
                    .autofilter(i as u32, 0, last_row as u32, (sheet.column_count() - 1) as u16)
                    .map_err(err)?;
            }
        }

        let zoom = (sheet.zoom() * 100.0).round().clamp(10.0, 400.0) as u16;
        if zoom != 100 {
            worksheet.set_zoom(zoom);
        }

        Ok(())
    }

    fn write_value(
        &self,
        worksheet: &mut Worksheet,
        r: u32,
        c: u16,
        value: &CellValue,
        id: StyleId,
    ) -> Result<(), rust_xlsxwriter::XlsxError> {
        let format = self.format(id);
        match value {
            CellValue::Blank => {
                if id != StyleId::DEFAULT {
                    worksheet.write_blank(r, c, &format)?;
                }
            }
            CellValue::Boolean(b) => {
                worksheet.write_boolean_with_format(r, c, *b, &format)?;
            }
            CellValue::Error => {
                worksheet.write_formula_with_format(r, c, "NA()", &format)?;
            }
            CellValue::Formula(f) => {
                worksheet.write_formula_with_format(r, c, format!("={}", f).as_str(), &format)?;
            }
            CellValue::Number(n) => {
                worksheet.write_number_with_format(r, c, *n, &format)?;
            }
            CellValue::Text(s) => {
                worksheet.write_string_with_format(r, c, s, &format)?;
            }
            CellValue::Date(d) => match excel_date_time(d.and_time(NaiveTime::MIN)) {
                Some(date) => {
                    worksheet.write_datetime_with_format(r, c, &date, &self.date_format(id, false))?;
                }
                None => {
                    warn!("date {} is out of Excel's range, written as text", d);
                    worksheet.write_string_with_format(r, c, d.to_string(), &format)?;
                }
            },
            CellValue::DateTime(dt) => match excel_date_time(*dt) {
                Some(date) => {
                    worksheet.write_datetime_with_format(r, c, &date, &self.date_format(id, true))?;
                }
                None => {
                    warn!("date {} is out of Excel's range, written as text", dt);
                    let text = dt.format("%Y-%m-%d %H:%M:%S").to_string();
                    worksheet.write_string_with_format(r, c, text, &format)?;
                }
            },
        }
        Ok(())
    }
}

fn xlsx_color(color: crate::model::Color) -> rust_xlsxwriter::Color {
    rust_xlsxwriter::Color::RGB(color.argb() & 0x00FF_FFFF)
}

fn xlsx_border(border: BorderStyle) -> FormatBorder {
    if border.is_none() {
        FormatBorder::None
    } else if border.width <= 1.0 {
        FormatBorder::Thin
    } else if border.width <= 2.0 {
        FormatBorder::Medium
    } else {
        FormatBorder::Thick
    }
}

/// Build an Excel format from a cell style
fn build_format(style: &CellStyle) -> Format {
    let font = style.font();
    let mut format = Format::new()
        .set_font_name(font.family.as_str())
        .set_font_size(font.size as f64)
        .set_font_color(xlsx_color(font.color));

    if font.bold {
        format = format.set_bold();
    }
    if font.italic {
        format = format.set_italic();
    }
    if font.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    if font.strike_through {
        format = format.set_font_strikethrough();
    }

    format = match style.halign() {
        HAlign::Left => format.set_align(FormatAlign::Left),
        HAlign::Center => format.set_align(FormatAlign::Center),
        HAlign::Right => format.set_align(FormatAlign::Right),
        HAlign::Justify => format.set_align(FormatAlign::Justify),
        HAlign::Automatic => format,
    };
    format = match style.valign() {
        VAlign::Top => format.set_align(FormatAlign::Top),
        VAlign::Middle => format.set_align(FormatAlign::VerticalCenter),
        VAlign::Bottom => format.set_align(FormatAlign::Bottom),
        VAlign::Justify => format.set_align(FormatAlign::VerticalJustify),
        VAlign::Distributed => format.set_align(FormatAlign::VerticalDistributed),
    };

    if style.is_wrap() {
        format = format.set_text_wrap();
    }
    if style.rotation() != 0 {
        format = format.set_rotation(style.rotation());
    }

    if style.fill_pattern() == FillPattern::Solid {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(xlsx_color(style.fill_fg_color()));
    }

    for d in Direction::ALL {
        let border = style.border_style(d);
        if border.is_none() {
            continue;
        }
        let kind = xlsx_border(border);
        let color = xlsx_color(border.color);
        format = match d {
            Direction::North => format.set_border_top(kind).set_border_top_color(color),
            Direction::East => format.set_border_right(kind).set_border_right_color(color),
            Direction::South => format.set_border_bottom(kind).set_border_bottom_color(color),
            Direction::West => format.set_border_left(kind).set_border_left_color(color),
        };
    }

    if !style.data_format().is_empty() {
        format = format.set_num_format(style.data_format());
    }

    format
}

/// Translate a date pattern (`yyyy-MM-dd HH:mm`) to Excel notation (`yyyy-mm-dd hh:mm`).
fn excel_date_format(pattern: &str) -> String {
    let mut out = String::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                let mut literal = String::new();
                while let Some(q) = chars.next() {
                    if q == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            literal.push('\'');
                        } else {
                            break;
                        }
                    } else {
                        literal.push(q);
                    }
                }
                if literal.is_empty() {
                    out.push('\'');
                } else {
                    out.push('"');
                    out.push_str(&literal);
                    out.push('"');
                }
            }
            'M' => out.push('m'),
            'H' => out.push('h'),
            'E' => {
                let mut n = 1;
                while chars.peek() == Some(&'E') {
                    chars.next();
                    n += 1;
                }
                out.push_str(if n <= 3 { "ddd" } else { "dddd" });
            }
            'a' => out.push_str("AM/PM"),
            '[' | ']' => {}
            c => out.push(c),
        }
    }
    out
}

//==============================================================================
// Import
//==============================================================================

/// Reads Excel files into a [`Workbook`].
pub struct XlsxImporter {
    path: std::path::PathBuf,
}

impl XlsxImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Import all sheets: values, formulas and merged regions.
    pub fn import(&self, workbook: &mut Workbook) -> MejaResult<()> {
        let mut excel = open_workbook_auto(&self.path)
            .map_err(|e| MejaError::Import(format!("Failed to open Excel file: {}", e)))?;

        if let Sheets::Xlsx(xlsx) = &mut excel {
            if let Err(e) = xlsx.load_merged_regions() {
                warn!("{}: merged regions not loaded: {}", self.path.display(), e);
            }
        }

        let sheet_names = excel.sheet_names().to_vec();
        for name in &sheet_names {
            let range = excel
                .worksheet_range(name)
                .map_err(|e| MejaError::Import(format!("Failed to read sheet '{}': {}", name, e)))?;
            let formulas = excel.worksheet_formula(name).ok();
            let merged = match &excel {
                Sheets::Xlsx(xlsx) => xlsx
                    .merged_regions_by_sheet(name)
                    .into_iter()
                    .map(|(_, _, dims)| *dims)
                    .collect(),
                _ => Vec::new(),
            };

            let sheet = workbook.create_sheet(name);
            import_values(sheet, &range);
            if let Some(formulas) = &formulas {
                import_formulas(sheet, formulas);
            }
            import_merged_regions(sheet, &merged)?;
            debug!(
                "imported sheet '{}': {} rows, {} columns",
                name,
                sheet.row_count(),
                sheet.column_count()
            );
        }
        Ok(())
    }
}

fn import_values(sheet: &mut Sheet, range: &Range<Data>) {
    let Some((r0, c0)) = range.start() else {
        return;
    };
    for (i, j, data) in range.used_cells() {
        let (i, j) = (r0 as usize + i, c0 as usize + j);
        let value = match data {
            Data::Empty => continue,
            Data::String(s) => CellValue::from(s.as_str()),
            Data::Float(n) => CellValue::Number(*n),
            Data::Int(n) => CellValue::Number(*n as f64),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::Error(_) => CellValue::Error,
            Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(date_value)
                .unwrap_or(CellValue::Number(dt.as_f64())),
            Data::DateTimeIso(s) => parse_iso(s).unwrap_or_else(|| CellValue::from(s.as_str())),
            Data::DurationIso(s) => CellValue::from(s.as_str()),
        };
        sheet.cell_mut(i, j).set(value);
    }
}

fn import_formulas(sheet: &mut Sheet, formulas: &Range<String>) {
    let Some((r0, c0)) = formulas.start() else {
        return;
    };
    for (i, j, formula) in formulas.used_cells() {
        if formula.is_empty() {
            continue;
        }
        let formula = formula.strip_prefix('=').unwrap_or(formula);
        sheet
            .cell_mut(r0 as usize + i, c0 as usize + j)
            .set_formula(formula);
    }
}

fn import_merged_regions(sheet: &mut Sheet, merged: &[Dimensions]) -> MejaResult<()> {
    for region in merged {
        let (first_row, first_col) = (region.start.0 as usize, region.start.1 as usize);
        let (last_row, last_col) = (region.end.0 as usize, region.end.1 as usize);
        sheet.merge_cells(
            first_row,
            first_col,
            last_col - first_col + 1,
            last_row - first_row + 1,
        )?;
    }
    Ok(())
}

fn parse_iso(s: &str) -> Option<CellValue> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(CellValue::DateTime(dt));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(CellValue::Date)
}
