//! Meja - spreadsheet workbooks in memory, with CSV, Excel and HTML I/O
//!
//! The [`model`] module holds workbooks, sheets, rows, cells and the cell
//! styles they share. The [`io`] module reads and writes them; [`format`]
//! renders numbers and dates for a [`format::Locale`].
//!
//! # Features
//!
//! - Dense sheets with merged regions, split panes, zoom and search
//! - Named cell styles: fonts, fills, borders, alignment, number and date formats
//! - CSV with configurable separator, quote character and charset
//! - XLSX/XLS import, XLSX export, HTML export
//! - Change events delivered over channels
//!
//! # Example
//!
//! ```no_run
//! use meja::io::IoOptions;
//! use meja::model::Workbook;
//! use std::path::Path;
//!
//! let options = IoOptions::default();
//! let workbook = Workbook::open(Path::new("data.csv"), &options)?;
//!
//! println!("Sheets: {}", workbook.sheet_count());
//! workbook.write(Path::new("data.xlsx"), &options)?;
//! # Ok::<(), meja::error::MejaError>(())
//! ```

pub mod cli;
pub mod error;
pub mod format;
pub mod io;
pub mod model;
pub mod table;

// Re-export commonly used types
pub use error::{MejaError, MejaResult};
pub use model::{Cell, CellValue, Sheet, Workbook};
