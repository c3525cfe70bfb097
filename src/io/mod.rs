//! Reading and writing workbooks: CSV, Excel and HTML

pub mod csv;
mod file_type;
pub mod html;
mod options;
mod value_parser;
pub mod xlsx;

pub use self::csv::{CsvReader, CsvWriter, ListRowBuilder, RowBuilder, SheetRowBuilder};
pub use file_type::{file_types, FileType, OpenMode};
pub use html::HtmlWriter;
pub use options::{DateFormat, IoOptions, ISO_DATE_PATTERN};
pub use value_parser::CellValueParser;
pub use xlsx::{XlsxExporter, XlsxImporter};

use crate::error::{MejaError, MejaResult};
use crate::model::Workbook;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// `file:` URL for an existing or about to be created file.
fn file_url(path: &Path) -> Option<Url> {
    let absolute = match std::fs::canonicalize(path) {
        Ok(p) => p,
        Err(_) => std::env::current_dir().ok()?.join(path),
    };
    Url::from_file_path(absolute).ok()
}

impl Workbook {
    /// Open a workbook, choosing the format by file extension.
    pub fn open(path: &Path, options: &IoOptions) -> MejaResult<Workbook> {
        let file_type = FileType::require(path, OpenMode::Read)?;
        options.validate()?;
        info!("reading {} ({})", path.display(), file_type);

        let mut workbook = match file_type {
            FileType::Csv => {
                let bytes = std::fs::read(path)?;
                let source = path.display().to_string();
                csv::read_workbook(&bytes, &source, options)?
            }
            FileType::Xls | FileType::Xlsx => {
                let mut workbook = Workbook::with_locale(options.locale);
                XlsxImporter::new(path).import(&mut workbook)?;
                workbook
            }
            FileType::Html => {
                return Err(MejaError::UnsupportedFileType(format!(
                    "HTML files cannot be read: {}",
                    path.display()
                )))
            }
        };

        workbook.set_uri(file_url(path));
        Ok(workbook)
    }

    /// Write to `path`, choosing the format by file extension.
    pub fn write(&self, path: &Path, options: &IoOptions) -> MejaResult<()> {
        let file_type = FileType::require(path, OpenMode::Write)?;
        self.write_as(file_type, path, options)
    }

    pub fn write_as(&self, file_type: FileType, path: &Path, options: &IoOptions) -> MejaResult<()> {
        options.validate()?;
        info!("writing {} ({})", path.display(), file_type);

        match file_type {
            FileType::Csv => {
                let out = BufWriter::new(File::create(path)?);
                let mut out = csv::write_workbook(self, out, options)?;
                std::io::Write::flush(&mut out)?;
            }
            FileType::Xlsx => XlsxExporter::new(self).export(path)?,
            FileType::Html => {
                let mut out = BufWriter::new(File::create(path)?);
                HtmlWriter::new(options.locale).write(self, &mut out)?;
                std::io::Write::flush(&mut out)?;
            }
            FileType::Xls => {
                return Err(MejaError::UnsupportedFileType(format!(
                    "{} files cannot be written: {}",
                    file_type.name(),
                    path.display()
                )))
            }
        }
        debug!("{} sheet(s) written", self.sheet_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;
    use tempfile::TempDir;

    #[test]
    fn test_open_sets_uri() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,1\nb,2\n").unwrap();

        let workbook = Workbook::open(&path, &IoOptions::default()).unwrap();
        let uri = workbook.uri().unwrap();
        assert_eq!(uri.scheme(), "file");
        assert!(uri.path().ends_with("/data.csv"));

        let sheet = workbook.sheet(0).unwrap();
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.cell(1, 1).unwrap().value(), &CellValue::Number(2.0));
    }

    #[test]
    fn test_unsupported_types() {
        let dir = TempDir::new().unwrap();
        let workbook = Workbook::new();
        let options = IoOptions::default();

        let err = workbook
            .write(&dir.path().join("out.xls"), &options)
            .unwrap_err();
        assert!(matches!(err, MejaError::UnsupportedFileType(_)));

        let err = Workbook::open(&dir.path().join("in.html"), &options).unwrap_err();
        assert!(matches!(err, MejaError::UnsupportedFileType(_)));

        let err = Workbook::open(&dir.path().join("in.ods"), &options).unwrap_err();
        assert!(matches!(err, MejaError::UnsupportedFileType(_)));
    }
}
