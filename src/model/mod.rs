//! In-memory spreadsheet model: workbooks, sheets, rows, cells and styles

mod cell;
mod color;
mod event;
mod font;
pub mod refs;
mod region;
mod row;
mod search;
mod sheet;
mod style;
mod value;
mod workbook;

pub use cell::{Cell, CellMut};
pub use color::{Color, PALETTE};
pub use event::{EventBus, SheetEvent, WorkbookEvent};
pub use font::{Font, FontDef};
pub use refs::{cell_ref, column_name, column_number, row_name, CellAddress, RefOption};
pub use region::RectangularRegion;
pub use row::{Row, RowMut};
pub use search::SearchSettings;
pub use sheet::{Sheet, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT};
pub use style::{
    BorderStyle, CellStyle, CellStyles, Direction, FillPattern, HAlign, StyleId, VAlign,
};
pub use value::{CellType, CellValue, ERROR_TEXT};
pub use workbook::Workbook;
