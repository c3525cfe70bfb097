use crate::error::{MejaError, MejaResult};
use crate::format::Locale;
use crate::model::{Cell, CellStyle, CellStyles, EventBus, Sheet, StyleId, WorkbookEvent};
use std::sync::mpsc::Receiver;
use url::Url;

/// A workbook: sheets plus the cell styles they share.
#[derive(Debug, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    styles: CellStyles,
    current_sheet: usize,
    uri: Option<Url>,
    locale: Locale,
    events: EventBus<WorkbookEvent>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(locale: Locale) -> Self {
        Workbook {
            locale,
            ..Default::default()
        }
    }

    pub fn subscribe(&mut self) -> Receiver<WorkbookEvent> {
        self.events.subscribe()
    }

    /// Locale used to render numbers and dates.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn uri(&self) -> Option<&Url> {
        self.uri.as_ref()
    }

    pub fn set_uri(&mut self, uri: Option<Url>) {
        let old = std::mem::replace(&mut self.uri, uri);
        self.events.emit(WorkbookEvent::UriChanged {
            old: old.map(String::from),
            new: self.uri.as_ref().map(|u| u.to_string()),
        });
    }

    //==========================================================================
    // Sheets
    //==========================================================================

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> + '_ {
        self.sheets.iter()
    }

    pub fn sheet(&self, idx: usize) -> Option<&Sheet> {
        self.sheets.get(idx)
    }

    pub fn sheet_mut(&mut self, idx: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(idx)
    }

    pub fn sheet_index_by_name(&self, name: &str) -> Option<usize> {
        self.sheets.iter().position(|s| s.name() == name)
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    pub fn sheet_by_name_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name() == name)
    }

    /// Mutable sheet together with the style registry, for operations that
    /// need to format cells while changing the sheet (search, auto-size).
    pub fn sheet_with_styles_mut(&mut self, idx: usize) -> Option<(&mut Sheet, &CellStyles)> {
        let sheet = self.sheets.get_mut(idx)?;
        Some((sheet, &self.styles))
    }

    pub fn create_sheet(&mut self, name: &str) -> &mut Sheet {
        self.sheets.push(Sheet::new(name));
        let index = self.sheets.len() - 1;
        self.events.emit(WorkbookEvent::SheetAdded { index });
        &mut self.sheets[index]
    }

    pub fn remove_sheet(&mut self, idx: usize) -> MejaResult<()> {
        if idx >= self.sheets.len() {
            return Err(MejaError::Argument(format!("sheet index out of range: {}", idx)));
        }
        self.sheets.remove(idx);
        if self.current_sheet >= self.sheets.len() && !self.sheets.is_empty() {
            self.current_sheet = self.sheets.len() - 1;
        }
        self.events.emit(WorkbookEvent::SheetRemoved { index: idx });
        Ok(())
    }

    pub fn remove_sheet_by_name(&mut self, name: &str) -> MejaResult<()> {
        let idx = self
            .sheet_index_by_name(name)
            .ok_or_else(|| MejaError::Argument(format!("no sheet named '{}'", name)))?;
        self.remove_sheet(idx)
    }

    pub fn current_sheet_index(&self) -> usize {
        self.current_sheet
    }

    pub fn current_sheet(&self) -> Option<&Sheet> {
        self.sheets.get(self.current_sheet)
    }

    pub fn set_current_sheet(&mut self, idx: usize) -> MejaResult<()> {
        if idx >= self.sheets.len() {
            return Err(MejaError::Argument(format!("sheet index out of range: {}", idx)));
        }
        let old = self.current_sheet;
        if idx != old {
            self.current_sheet = idx;
            self.events.emit(WorkbookEvent::ActiveSheetChanged { old, new: idx });
        }
        Ok(())
    }

    //==========================================================================
    // Cell styles
    //==========================================================================

    pub fn styles(&self) -> &CellStyles {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut CellStyles {
        &mut self.styles
    }

    /// Id of the style `name`, created with default settings if missing.
    pub fn cell_style(&mut self, name: &str) -> StyleId {
        self.styles.get_or_create(name)
    }

    pub fn style(&self, id: StyleId) -> &CellStyle {
        self.styles.get(id)
    }

    pub fn style_mut(&mut self, id: StyleId) -> &mut CellStyle {
        self.styles.get_mut(id)
    }

    pub fn default_cell_style(&self) -> &CellStyle {
        self.styles.get(StyleId::DEFAULT)
    }

    pub fn has_cell_style(&self, name: &str) -> bool {
        self.styles.contains(name)
    }

    pub fn cell_style_names(&self) -> Vec<String> {
        self.styles.names().map(str::to_string).collect()
    }

    pub fn copy_cell_style(&mut self, name: &str, style: &CellStyle) -> StyleId {
        self.styles.copy_cell_style(name, style)
    }

    /// Cell text as displayed, using this workbook's styles and locale.
    pub fn format_cell(&self, cell: &Cell) -> String {
        cell.format(&self.styles, self.locale)
    }

    //==========================================================================
    // Copy
    //==========================================================================

    /// Copy styles and sheets of `other` into this workbook.
    pub fn copy_from(&mut self, other: &Workbook) -> MejaResult<()> {
        for (_, name, style) in other.styles.iter() {
            self.styles.copy_cell_style(name, style);
        }

        let Workbook { sheets, styles, events, .. } = self;
        for src in &other.sheets {
            sheets.push(Sheet::new(src.name()));
            let index = sheets.len() - 1;
            events.emit(WorkbookEvent::SheetAdded { index });

            let map = |id: StyleId| {
                styles
                    .id(other.styles.name(id))
                    .unwrap_or(StyleId::DEFAULT)
            };
            sheets[index].copy_from(src, map)?;
        }
        Ok(())
    }
}
