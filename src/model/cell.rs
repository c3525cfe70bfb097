use crate::error::{MejaError, MejaResult};
use crate::format::Locale;
use crate::model::refs::{cell_ref, RefOption};
use crate::model::{CellStyle, CellStyles, CellType, CellValue, EventBus, SheetEvent, StyleId, ERROR_TEXT};
use chrono::{NaiveDate, NaiveDateTime};
use std::ops::Deref;
use std::sync::Arc;
use url::Url;

/// A single cell of a sheet.
///
/// Cells are owned by their row; changes go through [`CellMut`] so that the
/// owning sheet can notify its subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    sheet_name: Arc<str>,
    row: usize,
    column: usize,
    value: CellValue,
    style: StyleId,
    hyperlink: Option<String>,
    span_x: usize,
    span_y: usize,
    logical: (usize, usize),
}

impl Cell {
    pub(crate) fn new(sheet_name: Arc<str>, row: usize, column: usize) -> Self {
        Cell {
            sheet_name,
            row,
            column,
            value: CellValue::Blank,
            style: StyleId::DEFAULT,
            hyperlink: None,
            span_x: 1,
            span_y: 1,
            logical: (row, column),
        }
    }

    pub fn row_number(&self) -> usize {
        self.row
    }

    pub fn column_number(&self) -> usize {
        self.column
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub fn value(&self) -> &CellValue {
        &self.value
    }

    pub fn cell_type(&self) -> CellType {
        self.value.cell_type()
    }

    pub fn style_id(&self) -> StyleId {
        self.style
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_blank()
    }

    pub fn is_error(&self) -> bool {
        self.cell_type() == CellType::Error
    }

    //--------------------------------------------------------------------------
    // Typed access
    //--------------------------------------------------------------------------

    fn type_error(&self, what: &str) -> MejaError {
        MejaError::cell(
            &self.cell_ref(&[RefOption::WithSheet]),
            format!("Cannot get {} from cell of type {}.", what, self.cell_type()),
        )
    }

    pub fn boolean(&self) -> MejaResult<bool> {
        match self.value {
            CellValue::Boolean(b) => Ok(b),
            _ => Err(self.type_error("boolean value")),
        }
    }

    pub fn number(&self) -> MejaResult<f64> {
        match self.value {
            CellValue::Number(n) => Ok(n),
            _ => Err(self.type_error("numeric value")),
        }
    }

    /// Text content; a blank cell yields "".
    pub fn text(&self) -> MejaResult<&str> {
        match &self.value {
            CellValue::Text(s) => Ok(s),
            CellValue::Blank => Ok(""),
            _ => Err(self.type_error("text value")),
        }
    }

    pub fn formula(&self) -> MejaResult<&str> {
        match &self.value {
            CellValue::Formula(f) => Ok(f),
            _ => Err(self.type_error("formula")),
        }
    }

    pub fn date(&self) -> MejaResult<NaiveDate> {
        match self.value {
            CellValue::Date(d) => Ok(d),
            _ => Err(self.type_error("date value")),
        }
    }

    pub fn date_time(&self) -> MejaResult<NaiveDateTime> {
        match self.value {
            CellValue::DateTime(dt) => Ok(dt),
            _ => Err(self.type_error("date value")),
        }
    }

    //--------------------------------------------------------------------------
    // Merging
    //--------------------------------------------------------------------------

    pub fn horizontal_span(&self) -> usize {
        self.span_x
    }

    pub fn vertical_span(&self) -> usize {
        self.span_y
    }

    pub fn is_merged(&self) -> bool {
        self.span_x != 1 || self.span_y != 1
    }

    /// Position of the top-left cell of this cell's merged region, or of the
    /// cell itself when it is not merged.
    pub fn logical_cell(&self) -> (usize, usize) {
        self.logical
    }

    pub(crate) fn added_to_merged_region(&mut self, top_left: (usize, usize), span_x: usize, span_y: usize) {
        if (self.row, self.column) == top_left {
            self.span_x = span_x;
            self.span_y = span_y;
        } else {
            self.span_x = 0;
            self.span_y = 0;
        }
        self.logical = top_left;
    }

    pub(crate) fn removed_from_merged_region(&mut self) {
        self.logical = (self.row, self.column);
        self.span_x = 1;
        self.span_y = 1;
    }

    //--------------------------------------------------------------------------
    // Hyperlinks
    //--------------------------------------------------------------------------

    pub fn hyperlink(&self) -> Option<&str> {
        self.hyperlink.as_deref()
    }

    /// Hyperlink with relative links resolved against `base`.
    pub fn resolved_hyperlink(&self, base: Option<&Url>) -> MejaResult<Option<Url>> {
        let Some(link) = self.hyperlink.as_deref() else {
            return Ok(None);
        };

        match Url::parse(link) {
            Ok(url) => Ok(Some(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = base.ok_or_else(|| {
                    MejaError::State(
                        "cannot resolve the relative link because the workbook URI is not set"
                            .to_string(),
                    )
                })?;
                base.join(link)
                    .map(Some)
                    .map_err(|e| MejaError::Argument(format!("invalid link '{}': {}", link, e)))
            }
            Err(e) => Err(MejaError::Argument(format!("invalid link '{}': {}", link, e))),
        }
    }

    //--------------------------------------------------------------------------
    // Presentation
    //--------------------------------------------------------------------------

    pub fn cell_ref(&self, options: &[RefOption]) -> String {
        cell_ref(&self.sheet_name, self.row, self.column, options)
    }

    /// Text as displayed, formatted with the cell's style.
    pub fn format(&self, styles: &CellStyles, locale: Locale) -> String {
        let style = styles.get(self.style);
        match &self.value {
            CellValue::Blank => String::new(),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Error => ERROR_TEXT.to_string(),
            CellValue::Formula(f) => f.clone(),
            CellValue::Number(n) => style.format_number(*n, locale),
            CellValue::Text(s) => s.clone(),
            CellValue::Date(d) => style.format_date(*d, locale),
            CellValue::DateTime(dt) => style.format_date_time(*dt, locale),
        }
    }

    /// Space needed to display the cell as (width, height) in points.
    pub fn calc_dimension(&self, styles: &CellStyles, locale: Locale) -> (f32, f32) {
        let text = self.format(styles, locale);
        let style: &CellStyle = styles.get(self.style);
        let font = style.font();

        let w = font.text_width(&text) + font.size;
        let h = font.text_height(&text) + font.text_width(" ");

        let rotation = style.rotation();
        if rotation == 0 {
            return (w, h);
        }

        let alpha = (rotation as f32).to_radians();
        let cos = alpha.cos().abs();
        let sin = alpha.sin().abs();
        (cos * w + sin * h, sin * w + cos * h)
    }
}

/// Mutable access to a cell that reports changes to the sheet's subscribers.
pub struct CellMut<'a> {
    cell: &'a mut Cell,
    events: &'a mut EventBus<SheetEvent>,
}

impl<'a> CellMut<'a> {
    pub(crate) fn new(cell: &'a mut Cell, events: &'a mut EventBus<SheetEvent>) -> Self {
        CellMut { cell, events }
    }

    fn replace_value(&mut self, value: CellValue) -> &mut Self {
        if self.cell.value != value {
            let old = std::mem::replace(&mut self.cell.value, value);
            if self.events.has_subscribers() {
                let new = self.cell.value.clone();
                self.events.emit(SheetEvent::CellValueChanged {
                    row: self.cell.row,
                    column: self.cell.column,
                    old,
                    new,
                });
            }
        }
        self
    }

    /// Set the value; an empty string clears the cell.
    pub fn set(&mut self, value: impl Into<CellValue>) -> &mut Self {
        self.replace_value(value.into())
    }

    /// Set a formula, given without the leading `=`.
    pub fn set_formula(&mut self, formula: &str) -> &mut Self {
        if formula.is_empty() {
            return self.clear();
        }
        self.replace_value(CellValue::Formula(formula.to_string()))
    }

    pub fn set_error(&mut self) -> &mut Self {
        self.replace_value(CellValue::Error)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.replace_value(CellValue::Blank)
    }

    pub fn set_style(&mut self, style: StyleId) -> &mut Self {
        if self.cell.style != style {
            let old = self.cell.style;
            self.cell.style = style;
            self.events.emit(SheetEvent::CellStyleChanged {
                row: self.cell.row,
                column: self.cell.column,
                old,
                new: style,
            });
        }
        self
    }

    pub fn set_hyperlink(&mut self, target: impl Into<String>) -> &mut Self {
        self.cell.hyperlink = Some(target.into());
        self
    }

    pub fn clear_hyperlink(&mut self) -> &mut Self {
        self.cell.hyperlink = None;
        self
    }

    /// Copy value and hyperlink from `other` and apply `style`.
    ///
    /// Styles are workbook specific, so the caller maps the source style.
    pub fn copy_from(&mut self, other: &Cell, style: StyleId) -> &mut Self {
        self.set_style(style);
        self.replace_value(other.value.clone());
        if let Some(link) = &other.hyperlink {
            self.cell.hyperlink = Some(link.clone());
        }
        self
    }
}

impl Deref for CellMut<'_> {
    type Target = Cell;

    fn deref(&self) -> &Cell {
        self.cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Locale;

    fn cell() -> Cell {
        Cell::new(Arc::from("Sheet 1"), 0, 0)
    }

    #[test]
    fn test_type_mismatch_message() {
        let mut c = cell();
        let mut bus = EventBus::default();
        CellMut::new(&mut c, &mut bus).set(true);

        let err = c.number().unwrap_err();
        assert_eq!(
            err.to_string(),
            "['Sheet 1'!A1] Cannot get numeric value from cell of type BOOLEAN."
        );
        assert!(c.boolean().unwrap());
    }

    #[test]
    fn test_blank_text_is_empty() {
        let c = cell();
        assert_eq!(c.text().unwrap(), "");
        assert!(c.is_empty());
        assert!(c.formula().is_err());
    }

    #[test]
    fn test_set_emits_only_on_change() {
        let mut c = cell();
        let mut bus = EventBus::default();
        let rx = bus.subscribe();

        CellMut::new(&mut c, &mut bus).set(1.5).set(1.5);
        CellMut::new(&mut c, &mut bus).set("");

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            SheetEvent::CellValueChanged {
                row: 0,
                column: 0,
                old: CellValue::Number(1.5),
                new: CellValue::Blank,
            }
        );
        assert!(c.is_empty());
    }

    #[test]
    fn test_format_values() {
        let styles = CellStyles::new();
        let mut c = cell();
        let mut bus = EventBus::default();

        CellMut::new(&mut c, &mut bus).set(123.5);
        assert_eq!(c.format(&styles, Locale::De), "123,5");

        CellMut::new(&mut c, &mut bus).set_error();
        assert_eq!(c.format(&styles, Locale::Root), "#ERROR");

        CellMut::new(&mut c, &mut bus).set_formula("SUM(A1:A3)");
        assert_eq!(c.format(&styles, Locale::Root), "SUM(A1:A3)");
        assert_eq!(c.formula().unwrap(), "SUM(A1:A3)");
    }

    #[test]
    fn test_resolved_hyperlink() {
        let mut c = cell();
        let mut bus = EventBus::default();
        CellMut::new(&mut c, &mut bus).set_hyperlink("other.xlsx");

        let err = c.resolved_hyperlink(None).unwrap_err();
        assert!(err
            .to_string()
            .contains("cannot resolve the relative link because the workbook URI is not set"));

        let base = Url::parse("file:///data/book.xlsx").unwrap();
        let url = c.resolved_hyperlink(Some(&base)).unwrap().unwrap();
        assert_eq!(url.as_str(), "file:///data/other.xlsx");

        CellMut::new(&mut c, &mut bus).set_hyperlink("https://example.com/x");
        let url = c.resolved_hyperlink(None).unwrap().unwrap();
        assert_eq!(url.as_str(), "https://example.com/x");
    }

    #[test]
    fn test_rotated_dimension() {
        let mut styles = CellStyles::new();
        let id = styles.get_or_create("rotated");
        styles.get_mut(id).set_rotation(90).unwrap();

        let mut c = cell();
        let mut bus = EventBus::default();
        CellMut::new(&mut c, &mut bus).set("abc");
        let (w, h) = c.calc_dimension(&styles, Locale::Root);

        CellMut::new(&mut c, &mut bus).set_style(id);
        let (rw, rh) = c.calc_dimension(&styles, Locale::Root);
        assert!((rw - h).abs() < 1e-3);
        assert!((rh - w).abs() < 1e-3);
    }
}
