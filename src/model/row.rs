use crate::format::Locale;
use crate::model::search::Matcher;
use crate::model::{Cell, CellMut, CellStyles, CellValue, EventBus, SearchSettings, SheetEvent, StyleId};
use std::ops::Deref;
use std::sync::Arc;

/// A row of cells, dense from column 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    sheet_name: Arc<str>,
    row_number: usize,
    cells: Vec<Cell>,
}

impl Row {
    pub(crate) fn new(sheet_name: Arc<str>, row_number: usize) -> Self {
        Row {
            sheet_name,
            row_number,
            cells: Vec::new(),
        }
    }

    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// Number of cells in this row (last cell + 1).
    pub fn column_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    pub fn cell(&self, j: usize) -> Option<&Cell> {
        self.cells.get(j)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Direct access for merge bookkeeping; bypasses change events.
    pub(crate) fn cell_at_mut(&mut self, j: usize) -> Option<&mut Cell> {
        self.cells.get_mut(j)
    }

    /// Search this row, wrapping around at its end.
    ///
    /// Starts after `current_column` when searching from the current cell,
    /// otherwise at column 0.
    pub fn find(
        &self,
        text: &str,
        settings: SearchSettings,
        styles: &CellStyles,
        locale: Locale,
        current_column: usize,
    ) -> Option<usize> {
        if self.cells.is_empty() {
            return None;
        }
        let matcher = Matcher::new(text, settings, styles, locale);
        let n = self.cells.len();
        let start = if settings.search_from_current {
            current_column.min(n - 1)
        } else {
            n - 1
        };

        let mut j = start;
        loop {
            j = if j < n - 1 { j + 1 } else { 0 };
            if matcher.matches(self.cells.get(j)) {
                return Some(j);
            }
            if j == start {
                return None;
            }
        }
    }
}

/// Mutable access to a row; cell creation is reported to the sheet.
pub struct RowMut<'a> {
    row: &'a mut Row,
    events: &'a mut EventBus<SheetEvent>,
    column_count: &'a mut usize,
}

impl<'a> RowMut<'a> {
    pub(crate) fn new(
        row: &'a mut Row,
        events: &'a mut EventBus<SheetEvent>,
        column_count: &'a mut usize,
    ) -> Self {
        RowMut {
            row,
            events,
            column_count,
        }
    }

    fn reserve(&mut self, j: usize) {
        let row = &mut *self.row;
        while row.cells.len() <= j {
            let column = row.cells.len();
            row.cells
                .push(Cell::new(row.sheet_name.clone(), row.row_number, column));
        }

        let old = *self.column_count;
        if j + 1 > old {
            *self.column_count = j + 1;
            self.events.emit(SheetEvent::ColumnsAdded {
                first: old,
                last: j + 1,
            });
        }
    }

    /// Cell `j`, created (together with any cells before it) if missing.
    pub fn cell_mut(&mut self, j: usize) -> CellMut<'_> {
        self.reserve(j);
        CellMut::new(&mut self.row.cells[j], self.events)
    }

    pub fn into_cell_mut(mut self, j: usize) -> CellMut<'a> {
        self.reserve(j);
        let RowMut { row, events, .. } = self;
        CellMut::new(&mut row.cells[j], events)
    }

    /// Append a cell after the last one.
    pub fn create_cell(&mut self, value: impl Into<CellValue>) -> CellMut<'_> {
        let j = self.row.cells.len();
        let mut cell = self.cell_mut(j);
        cell.set(value);
        cell
    }

    /// Copy all cells of `other`, mapping styles with `map_style`.
    pub fn copy_from(&mut self, other: &Row, map_style: impl Fn(StyleId) -> StyleId) {
        for cell in &other.cells {
            self.cell_mut(cell.column_number())
                .copy_from(cell, map_style(cell.style_id()));
        }
    }
}

impl Deref for RowMut<'_> {
    type Target = Row;

    fn deref(&self) -> &Row {
        self.row
    }
}
