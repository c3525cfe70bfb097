use crate::error::{MejaError, MejaResult};
use crate::format::Locale;
use crate::model::refs::RefOption;
use crate::model::search::Matcher;
use crate::model::{
    BorderStyle, Cell, CellMut, CellStyles, CellValue, Direction, EventBus, RectangularRegion,
    Row, RowMut, SearchSettings, SheetEvent, StyleId,
};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_COLUMN_WIDTH: f32 = 80.0;
pub const DEFAULT_ROW_HEIGHT: f32 = 12.0;

/// A worksheet: rows of cells plus layout information.
#[derive(Debug)]
pub struct Sheet {
    name: Arc<str>,
    rows: Vec<Row>,
    column_count: usize,
    column_widths: Vec<Option<f32>>,
    row_heights: Vec<Option<f32>>,
    split_row: usize,
    split_column: usize,
    auto_filter_row: Option<usize>,
    current: (usize, usize),
    zoom: f32,
    merged_regions: Vec<RectangularRegion>,
    events: EventBus<SheetEvent>,
}

impl Sheet {
    pub(crate) fn new(name: &str) -> Self {
        Sheet {
            name: Arc::from(name),
            rows: Vec::new(),
            column_count: 0,
            column_widths: Vec::new(),
            row_heights: Vec::new(),
            split_row: 0,
            split_column: 0,
            auto_filter_row: None,
            current: (0, 0),
            zoom: 1.0,
            merged_regions: Vec::new(),
            events: EventBus::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subscribe(&mut self) -> Receiver<SheetEvent> {
        self.events.subscribe()
    }

    //==========================================================================
    // Rows and cells
    //==========================================================================

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, i: usize) -> Option<&Row> {
        self.rows.get(i)
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows.iter()
    }

    pub fn cell(&self, i: usize, j: usize) -> Option<&Cell> {
        self.rows.get(i).and_then(|row| row.cell(j))
    }

    fn reserve(&mut self, i: usize) {
        let first = self.rows.len();
        while self.rows.len() <= i {
            let n = self.rows.len();
            self.rows.push(Row::new(self.name.clone(), n));
        }
        let last = self.rows.len();
        if last > first {
            self.events.emit(SheetEvent::RowsAdded { first, last });
        }
    }

    /// Row `i`, created (together with any rows before it) if missing.
    pub fn row_mut(&mut self, i: usize) -> RowMut<'_> {
        self.reserve(i);
        RowMut::new(&mut self.rows[i], &mut self.events, &mut self.column_count)
    }

    /// Cell `(i, j)`, created if missing.
    pub fn cell_mut(&mut self, i: usize, j: usize) -> CellMut<'_> {
        self.row_mut(i).into_cell_mut(j)
    }

    /// Append a row holding `values`; returns its row number.
    pub fn create_row<I>(&mut self, values: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<CellValue>,
    {
        let i = self.rows.len();
        let mut row = self.row_mut(i);
        for value in values {
            row.create_cell(value);
        }
        i
    }

    //==========================================================================
    // Layout
    //==========================================================================

    pub fn column_width(&self, j: usize) -> f32 {
        self.column_widths
            .get(j)
            .copied()
            .flatten()
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Width explicitly set for column `j`, if any.
    pub fn column_width_if_set(&self, j: usize) -> Option<f32> {
        self.column_widths.get(j).copied().flatten()
    }

    pub fn set_column_width(&mut self, j: usize, width: f32) {
        if self.column_widths.len() <= j {
            self.column_widths.resize(j + 1, None);
        }
        if self.column_widths[j] != Some(width) {
            self.column_widths[j] = Some(width);
            self.events.emit(SheetEvent::LayoutChanged);
        }
    }

    pub fn row_height(&self, i: usize) -> f32 {
        self.row_heights
            .get(i)
            .copied()
            .flatten()
            .unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    /// Height explicitly set for row `i`, if any.
    pub fn row_height_if_set(&self, i: usize) -> Option<f32> {
        self.row_heights.get(i).copied().flatten()
    }

    pub fn set_row_height(&mut self, i: usize, height: f32) {
        if self.row_heights.len() <= i {
            self.row_heights.resize(i + 1, None);
        }
        self.row_heights[i] = Some(height);
        self.events.emit(SheetEvent::LayoutChanged);
    }

    pub fn split_row(&self) -> usize {
        self.split_row
    }

    pub fn split_column(&self) -> usize {
        self.split_column
    }

    /// Freeze rows above `i` and columns left of `j`.
    pub fn split_at(&mut self, i: usize, j: usize) {
        let old = (self.split_row, self.split_column);
        self.split_row = i;
        self.split_column = j;
        self.events.emit(SheetEvent::SplitChanged { old, new: (i, j) });
    }

    pub fn auto_filter_row(&self) -> Option<usize> {
        self.auto_filter_row
    }

    pub fn set_auto_filter_row(&mut self, i: Option<usize>) {
        self.auto_filter_row = i;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) -> MejaResult<()> {
        if !(zoom > 0.0) {
            return Err(MejaError::Argument(format!("Invalid zoom factor: {}", zoom)));
        }
        if zoom != self.zoom {
            let old = self.zoom;
            self.zoom = zoom;
            self.events.emit(SheetEvent::ZoomChanged { old, new: zoom });
        }
        Ok(())
    }

    pub fn auto_size_column(&mut self, j: usize, styles: &CellStyles, locale: Locale) {
        let width = self
            .rows
            .iter()
            .filter_map(|row| row.cell(j))
            .filter(|cell| !cell.is_empty())
            .map(|cell| cell.calc_dimension(styles, locale).0)
            .fold(0.0, f32::max);
        self.set_column_width(j, width);
    }

    pub fn auto_size_columns(&mut self, styles: &CellStyles, locale: Locale) {
        let mut widths = vec![0.0f32; self.column_count];
        for cell in self.rows.iter().flat_map(|row| row.cells()) {
            if !cell.is_empty() {
                let j = cell.column_number();
                widths[j] = widths[j].max(cell.calc_dimension(styles, locale).0);
            }
        }
        if self.column_widths.len() < widths.len() {
            self.column_widths.resize(widths.len(), None);
        }
        let mut changed = false;
        for (j, width) in widths.into_iter().enumerate() {
            if self.column_widths[j] != Some(width) {
                self.column_widths[j] = Some(width);
                changed = true;
            }
        }
        if changed {
            self.events.emit(SheetEvent::LayoutChanged);
        }
    }

    pub fn auto_size_row(&mut self, i: usize, styles: &CellStyles, locale: Locale) {
        let Some(row) = self.rows.get(i) else {
            return;
        };
        let height = row
            .cells()
            .filter(|cell| !cell.is_empty())
            .map(|cell| cell.calc_dimension(styles, locale).1)
            .fold(0.0, f32::max);
        self.set_row_height(i, height);
    }

    //==========================================================================
    // Current cell
    //==========================================================================

    pub fn current_cell(&self) -> (usize, usize) {
        self.current
    }

    /// Make the logical cell of `(i, j)` the current cell. Returns false if
    /// it already was.
    pub fn set_current_cell(&mut self, i: usize, j: usize) -> bool {
        let target = self.cell(i, j).map(Cell::logical_cell).unwrap_or((i, j));
        if target == self.current {
            return false;
        }
        let old = self.cell(self.current.0, self.current.1).map(|_| self.current);
        self.current = target;
        self.events.emit(SheetEvent::ActiveCellChanged { old, new: target });
        true
    }

    //==========================================================================
    // Merged regions
    //==========================================================================

    pub fn merged_regions(&self) -> &[RectangularRegion] {
        &self.merged_regions
    }

    pub fn merged_region_at(&self, i: usize, j: usize) -> Option<&RectangularRegion> {
        self.merged_regions.iter().find(|rr| rr.contains(i, j))
    }

    pub fn add_merged_region(&mut self, region: RectangularRegion) -> MejaResult<()> {
        if self.merged_regions.iter().any(|rr| rr.intersects(&region)) {
            return Err(MejaError::State(
                "New merged region overlaps with an existing one.".to_string(),
            ));
        }

        let top_left = (region.first_row(), region.first_column());
        let span_x = region.column_count();
        let span_y = region.row_count();
        for (i, j) in region.cells() {
            let mut cell = self.cell_mut(i, j);
            if (i, j) != top_left {
                cell.clear();
            }
            if let Some(cell) = self.rows.get_mut(i).and_then(|row| row.cell_at_mut(j)) {
                cell.added_to_merged_region(top_left, span_x, span_y);
            }
        }

        self.merged_regions.push(region);
        debug!("added merged region: {}", region);
        Ok(())
    }

    /// Merge `span_x` columns and `span_y` rows starting at `(i, j)`.
    pub fn merge_cells(&mut self, i: usize, j: usize, span_x: usize, span_y: usize) -> MejaResult<()> {
        if let Some(cell) = self.cell(i, j) {
            if cell.is_merged() {
                return Err(MejaError::cell(
                    &cell.cell_ref(&[RefOption::WithSheet]),
                    "Cell is already merged.",
                ));
            }
        }
        if span_x < 1 {
            return Err(MejaError::Argument(format!("spanX must be positive: {}", span_x)));
        }
        if span_y < 1 {
            return Err(MejaError::Argument(format!("spanY must be positive: {}", span_y)));
        }
        if span_x == 1 && span_y == 1 {
            return Ok(());
        }
        let region = RectangularRegion::new(i, i + span_y - 1, j, j + span_x - 1)?;
        self.add_merged_region(region)
    }

    /// Dissolve the merged region whose top-left cell is `(i, j)`.
    pub fn unmerge_cells(&mut self, i: usize, j: usize) -> MejaResult<()> {
        let Some(cell) = self.cell(i, j) else {
            return Ok(());
        };
        if cell.logical_cell() != (i, j) {
            return Err(MejaError::cell(
                &cell.cell_ref(&[RefOption::WithSheet]),
                "Cell is not the top left cell of a merged region",
            ));
        }

        let removed: Vec<RectangularRegion> = self
            .merged_regions
            .iter()
            .filter(|rr| rr.first_row() == i && rr.first_column() == j)
            .copied()
            .collect();
        self.merged_regions
            .retain(|rr| !(rr.first_row() == i && rr.first_column() == j));

        for rr in &removed {
            for (ci, cj) in rr.cells() {
                if let Some(cell) = self.rows.get_mut(ci).and_then(|row| row.cell_at_mut(cj)) {
                    cell.removed_from_merged_region();
                }
            }
        }
        debug!("removed merged region at [{},{}]", i, j);
        Ok(())
    }

    //==========================================================================
    // Borders
    //==========================================================================

    /// Border drawn on the `direction` edge of cell `(i, j)`.
    ///
    /// Right and bottom edges use the cell's own border when it has one;
    /// otherwise the neighbour's border on the shared edge wins if set.
    pub fn effective_border_style(
        &self,
        i: usize,
        j: usize,
        direction: Direction,
        styles: &CellStyles,
    ) -> BorderStyle {
        let style_of = |pos: (usize, usize)| {
            self.cell(pos.0, pos.1)
                .map(Cell::style_id)
                .unwrap_or(StyleId::DEFAULT)
        };

        let logical = self.cell(i, j).map(Cell::logical_cell).unwrap_or((i, j));
        let own = styles.get(style_of(logical)).border_style(direction);

        if !own.is_none() && matches!(direction, Direction::East | Direction::South) {
            return own;
        }

        let neighbour = match direction {
            Direction::East => Some((i, j + 1)),
            Direction::West => j.checked_sub(1).map(|j| (i, j)),
            Direction::North => i.checked_sub(1).map(|i| (i, j)),
            Direction::South => Some((i + 1, j)),
        };

        neighbour
            .and_then(|(ni, nj)| self.cell(ni, nj))
            .map(|cell| styles.get(cell.style_id()).border_style(direction.inverse()))
            .filter(|bs| !bs.is_none())
            .unwrap_or(own)
    }

    //==========================================================================
    // Search
    //==========================================================================

    fn next_position(&self, (i, j): (usize, usize)) -> (usize, usize) {
        let n = self.rows.get(i).map(Row::column_count).unwrap_or(0);
        if n > 0 && j + 1 < n {
            (i, j + 1)
        } else if i + 1 < self.rows.len() {
            (i + 1, 0)
        } else {
            (0, 0)
        }
    }

    /// Find the first cell whose text matches `text`, walking the sheet row
    /// by row and wrapping around at the end. Returns `(row, column)`.
    pub fn find(
        &mut self,
        text: &str,
        settings: SearchSettings,
        styles: &CellStyles,
        locale: Locale,
    ) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }

        let matcher = Matcher::new(text, settings, styles, locale);
        let start = if settings.search_from_current {
            self.next_position(self.current)
        } else {
            (0, 0)
        };

        let mut pos = start;
        loop {
            // cells covered by a merged region are not visible
            let cell = self.cell(pos.0, pos.1);
            let hidden = cell.is_some_and(|c| c.logical_cell() != pos);
            if !hidden && matcher.matches(cell) {
                if settings.update_current {
                    self.set_current_cell(pos.0, pos.1);
                }
                return Some(pos);
            }
            pos = self.next_position(pos);
            if pos == start {
                return None;
            }
        }
    }

    /// Search within row `i`; see [`Row::find`].
    pub fn find_in_row(
        &mut self,
        i: usize,
        text: &str,
        settings: SearchSettings,
        styles: &CellStyles,
        locale: Locale,
    ) -> Option<usize> {
        let j = self
            .rows
            .get(i)?
            .find(text, settings, styles, locale, self.current.1)?;
        if settings.update_current {
            self.set_current_cell(i, j);
        }
        Some(j)
    }

    //==========================================================================
    // Bulk operations
    //==========================================================================

    /// Remove all rows, merged regions and layout settings.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.column_count = 0;
        self.column_widths.clear();
        self.row_heights.clear();
        self.split_row = 0;
        self.split_column = 0;
        self.auto_filter_row = None;
        self.current = (0, 0);
        self.zoom = 1.0;
        self.merged_regions.clear();
        self.events.emit(SheetEvent::LayoutChanged);
    }

    /// Copy content and layout of `other`, mapping cell styles with `map_style`.
    pub fn copy_from(&mut self, other: &Sheet, map_style: impl Fn(StyleId) -> StyleId) -> MejaResult<()> {
        for rr in &other.merged_regions {
            self.add_merged_region(*rr)?;
        }

        for row in &other.rows {
            let i = row.row_number();
            self.row_mut(i).copy_from(row, &map_style);
            if let Some(height) = other.row_height_if_set(i) {
                self.set_row_height(i, height);
            }
        }

        self.auto_filter_row = other.auto_filter_row;
        self.split_at(other.split_row, other.split_column);

        for j in 0..other.column_count {
            if let Some(width) = other.column_width_if_set(j) {
                self.set_column_width(j, width);
            }
        }
        if self.zoom != other.zoom {
            self.set_zoom(other.zoom)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellType, Color};
    use chrono::NaiveDate;

    fn sheet() -> Sheet {
        Sheet::new("Test")
    }

    #[test]
    fn test_create_row_mixed_values() {
        let mut s = sheet();
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let i = s.create_row([
            CellValue::from("a"),
            CellValue::from(123.5),
            CellValue::Blank,
            CellValue::from(date),
            CellValue::from(true),
        ]);
        assert_eq!(i, 0);
        assert_eq!(s.row_count(), 1);
        assert_eq!(s.column_count(), 5);

        let styles = CellStyles::new();
        let c = |j| s.cell(0, j).unwrap();
        assert_eq!(c(0).cell_type(), CellType::Text);
        assert_eq!(c(1).format(&styles, Locale::EnUs), "123.5");
        assert_eq!(c(1).format(&styles, Locale::Fr), "123,5");
        assert_eq!(c(2).cell_type(), CellType::Blank);
        assert_eq!(c(3).format(&styles, Locale::EnUs), "Jan 1, 2023");
        assert_eq!(c(3).format(&styles, Locale::De), "01.01.2023");
        assert_eq!(c(3).format(&styles, Locale::Fr), "1 janv. 2023");
        assert!(c(4).boolean().unwrap());
    }

    #[test]
    fn test_rows_added_events() {
        let mut s = sheet();
        let rx = s.subscribe();
        s.cell_mut(2, 0);
        s.cell_mut(1, 0);
        assert_eq!(s.row_count(), 3);
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events[0], SheetEvent::RowsAdded { first: 0, last: 3 });
        assert_eq!(
            events.iter().filter(|e| matches!(e, SheetEvent::RowsAdded { .. })).count(),
            1
        );
    }

    #[test]
    fn test_layout_defaults_and_events() {
        let mut s = sheet();
        assert_eq!(s.column_width(3), DEFAULT_COLUMN_WIDTH);
        assert_eq!(s.row_height(3), DEFAULT_ROW_HEIGHT);
        assert_eq!(s.auto_filter_row(), None);
        assert_eq!(s.zoom(), 1.0);

        let rx = s.subscribe();
        s.set_column_width(2, 40.0);
        s.set_column_width(2, 40.0);
        s.set_row_height(0, 20.0);
        s.set_row_height(0, 20.0);
        assert_eq!(s.column_width(2), 40.0);
        assert_eq!(s.column_width(1), DEFAULT_COLUMN_WIDTH);
        assert_eq!(rx.try_iter().count(), 3);
    }

    #[test]
    fn test_zoom_must_be_positive() {
        let mut s = sheet();
        let err = s.set_zoom(0.0).unwrap_err();
        assert!(err.to_string().contains("Invalid zoom factor"));
        assert!(s.set_zoom(-1.0).is_err());
        s.set_zoom(1.5).unwrap();
        assert_eq!(s.zoom(), 1.5);
    }

    #[test]
    fn test_merge_and_unmerge() {
        let mut s = sheet();
        s.cell_mut(0, 0).set("top left");
        s.cell_mut(1, 1).set("hidden");
        s.merge_cells(0, 0, 2, 2).unwrap();

        let tl = s.cell(0, 0).unwrap();
        assert_eq!((tl.horizontal_span(), tl.vertical_span()), (2, 2));
        let member = s.cell(1, 1).unwrap();
        assert_eq!((member.horizontal_span(), member.vertical_span()), (0, 0));
        assert_eq!(member.logical_cell(), (0, 0));
        assert!(member.is_empty());
        assert_eq!(s.merged_region_at(1, 0).map(|r| r.to_string()).as_deref(), Some("A1:B2"));

        let err = s.merge_cells(1, 1, 2, 1).unwrap_err();
        assert!(err.to_string().contains("Cell is already merged."));

        let overlap = RectangularRegion::new(1, 2, 1, 2).unwrap();
        let err = s.add_merged_region(overlap).unwrap_err();
        assert!(err
            .to_string()
            .contains("New merged region overlaps with an existing one."));

        let err = s.unmerge_cells(1, 1).unwrap_err();
        assert!(err
            .to_string()
            .contains("Cell is not the top left cell of a merged region"));

        s.unmerge_cells(0, 0).unwrap();
        assert!(s.merged_regions().is_empty());
        assert!(!s.cell(1, 1).unwrap().is_merged());
        assert_eq!(s.cell(1, 1).unwrap().logical_cell(), (1, 1));
    }

    #[test]
    fn test_merge_single_cell_is_noop() {
        let mut s = sheet();
        s.merge_cells(0, 0, 1, 1).unwrap();
        assert!(s.merged_regions().is_empty());
        assert!(s.merge_cells(0, 0, 0, 1).is_err());
    }

    #[test]
    fn test_current_cell_uses_logical_cell() {
        let mut s = sheet();
        s.merge_cells(1, 1, 2, 2).unwrap();
        let rx = s.subscribe();

        assert!(s.set_current_cell(2, 2));
        assert_eq!(s.current_cell(), (1, 1));
        assert!(!s.set_current_cell(1, 2));
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![SheetEvent::ActiveCellChanged {
                old: None,
                new: (1, 1)
            }]
        );
    }

    #[test]
    fn test_find_wraps_and_updates_current() {
        let mut s = sheet();
        s.create_row(["alpha", "beta"]);
        s.create_row(["gamma", "Alphabet"]);
        let styles = CellStyles::new();

        let settings = SearchSettings::new().update_current();
        assert_eq!(s.find("alpha", settings, &styles, Locale::Root), Some((0, 0)));

        let next = settings.search_from_current().ignore_case();
        assert_eq!(s.find("alpha", next, &styles, Locale::Root), Some((1, 1)));
        assert_eq!(s.current_cell(), (1, 1));
        // wraps around to the first row
        assert_eq!(s.find("alpha", next, &styles, Locale::Root), Some((0, 0)));

        assert_eq!(s.find("delta", settings, &styles, Locale::Root), None);
        assert_eq!(
            s.find("alpha", SearchSettings::new().match_complete(), &styles, Locale::Root),
            Some((0, 0))
        );
    }

    #[test]
    fn test_find_formula() {
        let mut s = sheet();
        s.cell_mut(0, 0).set(1.0);
        s.cell_mut(0, 1).set_formula("SUM(A1)");
        let styles = CellStyles::new();
        let settings = SearchSettings::new().search_formula();
        assert_eq!(s.find("SUM", settings, &styles, Locale::Root), Some((0, 1)));
        assert_eq!(s.find("x", settings, &styles, Locale::Root), None);
        assert_eq!(Sheet::new("empty").find("", settings, &styles, Locale::Root), None);
    }

    #[test]
    fn test_effective_border() {
        let mut styles = CellStyles::new();
        let boxed = styles.get_or_create("boxed");
        for d in Direction::ALL {
            styles
                .get_mut(boxed)
                .set_border_style(d, BorderStyle::new(1.0, Color::RED));
        }

        let mut s = sheet();
        s.cell_mut(0, 0).set("plain");
        s.cell_mut(0, 1).set("boxed").set_style(boxed);

        // the neighbour's west border is drawn on A1's east edge
        let east = s.effective_border_style(0, 0, Direction::East, &styles);
        assert_eq!(east, BorderStyle::new(1.0, Color::RED));
        assert!(s
            .effective_border_style(0, 0, Direction::West, &styles)
            .is_none());
        assert_eq!(
            s.effective_border_style(0, 1, Direction::South, &styles),
            BorderStyle::new(1.0, Color::RED)
        );
    }

    #[test]
    fn test_auto_size() {
        let styles = CellStyles::new();
        let mut s = sheet();
        s.create_row(["a", "abcdefghij"]);
        s.auto_size_columns(&styles, Locale::Root);
        assert!(s.column_width(1) > s.column_width(0));
        assert!(s.column_width(0) > 0.0);

        s.auto_size_row(0, &styles, Locale::Root);
        assert!(s.row_height(0) > 10.0);
        s.auto_size_row(5, &styles, Locale::Root);
        assert_eq!(s.row_height(5), DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_auto_size_columns_reports_layout_once() {
        let styles = CellStyles::new();
        let mut s = sheet();
        s.create_row(["a", "bb", "ccc"]);
        let rx = s.subscribe();

        s.auto_size_columns(&styles, Locale::Root);
        let layout = rx
            .try_iter()
            .filter(|e| *e == SheetEvent::LayoutChanged)
            .count();
        assert_eq!(layout, 1);

        // unchanged widths
        s.auto_size_columns(&styles, Locale::Root);
        assert_eq!(rx.try_iter().count(), 0);
    }

    #[test]
    fn test_find_skips_merged_members() {
        let mut s = sheet();
        s.create_row(["x", "", "x"]);
        s.create_row(["", "", "x"]);
        s.merge_cells(0, 0, 2, 2).unwrap();
        let styles = CellStyles::new();

        let settings = SearchSettings::new().update_current();
        let next = settings.search_from_current();
        // an empty needle matches every visible cell
        assert_eq!(s.find("", settings, &styles, Locale::Root), Some((0, 0)));
        assert_eq!(s.find("", next, &styles, Locale::Root), Some((0, 2)));
        assert_eq!(s.find("", next, &styles, Locale::Root), Some((1, 2)));
        assert_eq!(s.find("", next, &styles, Locale::Root), Some((0, 0)));
        assert_eq!(s.current_cell(), (0, 0));
    }

    #[test]
    fn test_clear_and_copy() {
        let mut src = sheet();
        src.create_row(["x", "y"]);
        src.merge_cells(1, 0, 2, 1).unwrap();
        src.set_column_width(1, 33.0);
        src.set_row_height(0, 18.0);
        src.split_at(1, 0);
        src.set_auto_filter_row(Some(0));

        let mut dst = Sheet::new("Copy");
        dst.copy_from(&src, |id| id).unwrap();
        assert_eq!(dst.row_count(), 2);
        assert_eq!(dst.cell(0, 1).unwrap().text().unwrap(), "y");
        assert_eq!(dst.merged_regions().len(), 1);
        assert_eq!(dst.column_width(1), 33.0);
        assert_eq!(dst.row_height(0), 18.0);
        assert_eq!((dst.split_row(), dst.split_column()), (1, 0));
        assert_eq!(dst.auto_filter_row(), Some(0));

        dst.clear();
        assert!(dst.is_empty());
        assert_eq!(dst.column_count(), 0);
        assert!(dst.merged_regions().is_empty());
        assert_eq!(dst.column_width(1), DEFAULT_COLUMN_WIDTH);
    }
}
