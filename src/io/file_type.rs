use crate::error::{MejaError, MejaResult};
use std::fmt;
use std::path::Path;

/// What a file type can be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
    ReadAndWrite,
}

impl OpenMode {
    /// True if `self` supports everything `mode` needs.
    pub fn includes(&self, mode: OpenMode) -> bool {
        *self == OpenMode::ReadAndWrite || *self == mode
    }
}

/// Workbook file formats known to meja.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Csv,
    Xls,
    Xlsx,
    Html,
}

impl FileType {
    pub const ALL: [FileType; 4] = [FileType::Csv, FileType::Xls, FileType::Xlsx, FileType::Html];

    pub fn name(&self) -> &'static str {
        match self {
            FileType::Csv => "CSV",
            FileType::Xls => "Excel 97-2003",
            FileType::Xlsx => "Excel 2007+",
            FileType::Html => "HTML",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FileType::Csv => "CSV (comma separated values)",
            FileType::Xls => "Excel 97-2003 workbook",
            FileType::Xlsx => "Excel 2007+ workbook",
            FileType::Html => "HTML document",
        }
    }

    /// File extensions without the leading dot, the first one is preferred.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileType::Csv => &["csv", "txt"],
            FileType::Xls => &["xls"],
            FileType::Xlsx => &["xlsx", "xlsm"],
            FileType::Html => &["html", "htm"],
        }
    }

    pub fn mode(&self) -> OpenMode {
        match self {
            FileType::Csv | FileType::Xlsx => OpenMode::ReadAndWrite,
            FileType::Xls => OpenMode::Read,
            FileType::Html => OpenMode::Write,
        }
    }

    pub fn is_supported(&self, mode: OpenMode) -> bool {
        self.mode().includes(mode)
    }

    /// Detect the file type from the extension of `path` (case-insensitive).
    pub fn for_path(path: &Path) -> Option<FileType> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        FileType::ALL
            .into_iter()
            .find(|t| t.extensions().contains(&ext.as_str()))
    }

    /// Like [`FileType::for_path`], failing unless the type supports `mode`.
    pub fn require(path: &Path, mode: OpenMode) -> MejaResult<FileType> {
        let file_type = FileType::for_path(path)
            .ok_or_else(|| MejaError::UnsupportedFileType(path.display().to_string()))?;
        if !file_type.is_supported(mode) {
            return Err(MejaError::UnsupportedFileType(format!(
                "{} files cannot be {}: {}",
                file_type.name(),
                if mode == OpenMode::Read { "read" } else { "written" },
                path.display()
            )));
        }
        Ok(file_type)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All file types supporting `mode`.
pub fn file_types(mode: OpenMode) -> Vec<FileType> {
    FileType::ALL
        .into_iter()
        .filter(|t| t.is_supported(mode))
        .collect()
}
