use thiserror::Error;

pub type MejaResult<T> = Result<T, MejaError>;

#[derive(Error, Debug)]
pub enum MejaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Cell level failure, message already carries the `[ref]` prefix.
    #[error("{0}")]
    Cell(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Illegal state: {0}")]
    State(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("CSV error in {source_name} at line {line}: {message}")]
    Csv {
        message: String,
        source_name: String,
        line: usize,
    },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
}

impl MejaError {
    /// Builds a cell error prefixed with the cell reference, e.g. `[Sheet1!A1] message`.
    pub fn cell(cell_ref: &str, message: impl AsRef<str>) -> Self {
        MejaError::Cell(format!("[{}] {}", cell_ref, message.as_ref()))
    }

    pub fn csv(message: impl Into<String>, source_name: impl Into<String>, line: usize) -> Self {
        MejaError::Csv {
            message: message.into(),
            source_name: source_name.into(),
            line,
        }
    }
}
