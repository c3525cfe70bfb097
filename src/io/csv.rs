//! CSV reading and writing
//!
//! Reading decodes the whole input with the configured character set first
//! (a byte order mark takes precedence and is removed), then splits it into
//! records with the `csv` crate. Quoted fields may contain doubled quote
//! characters and line breaks. Empty lines are skipped.

use crate::error::{MejaError, MejaResult};
use crate::io::{CellValueParser, IoOptions};
use crate::model::{CellValue, Sheet, Workbook};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Name of the sheet created when reading a CSV file into a workbook.
pub const CSV_SHEET_NAME: &str = "Sheet 1";

/// Source name used when the input has no file name.
pub const STREAM_SOURCE: &str = "[stream]";

/// Receives the fields of each row read by a [`CsvReader`].
pub trait RowBuilder {
    fn start_row(&mut self) -> MejaResult<()>;
    fn add(&mut self, value: &str) -> MejaResult<()>;
    fn end_row(&mut self) -> MejaResult<()>;
}

/// Collects the fields of the last row as strings.
#[derive(Debug, Default)]
pub struct ListRowBuilder {
    row: Vec<String>,
}

impl ListRowBuilder {
    pub fn row(&self) -> &[String] {
        &self.row
    }

    pub fn into_row(self) -> Vec<String> {
        self.row
    }
}

impl RowBuilder for ListRowBuilder {
    fn start_row(&mut self) -> MejaResult<()> {
        self.row.clear();
        Ok(())
    }

    fn add(&mut self, value: &str) -> MejaResult<()> {
        self.row.push(value.to_string());
        Ok(())
    }

    fn end_row(&mut self) -> MejaResult<()> {
        Ok(())
    }
}

/// Appends rows to a sheet, converting each field with a [`CellValueParser`].
pub struct SheetRowBuilder<'a> {
    sheet: &'a mut Sheet,
    parser: CellValueParser,
    current_row: Option<usize>,
    column: usize,
}

impl<'a> SheetRowBuilder<'a> {
    pub fn new(sheet: &'a mut Sheet, parser: CellValueParser) -> Self {
        SheetRowBuilder {
            sheet,
            parser,
            current_row: None,
            column: 0,
        }
    }
}

impl RowBuilder for SheetRowBuilder<'_> {
    fn start_row(&mut self) -> MejaResult<()> {
        if self.current_row.is_some() {
            return Err(MejaError::State("unexpected call to start_row()".to_string()));
        }
        let i = self.sheet.row_count();
        self.sheet.row_mut(i);
        self.current_row = Some(i);
        self.column = 0;
        Ok(())
    }

    fn add(&mut self, value: &str) -> MejaResult<()> {
        let i = self
            .current_row
            .ok_or_else(|| MejaError::State("missing call to start_row()".to_string()))?;
        let value = self.parser.parse(value);
        self.sheet.cell_mut(i, self.column).set(value);
        self.column += 1;
        Ok(())
    }

    fn end_row(&mut self) -> MejaResult<()> {
        if self.current_row.take().is_none() {
            return Err(MejaError::State("unexpected call to end_row()".to_string()));
        }
        self.column = 0;
        Ok(())
    }
}

//==============================================================================
// Reader
//==============================================================================

/// Streaming CSV reader feeding a [`RowBuilder`] row by row.
pub struct CsvReader {
    reader: csv::Reader<Cursor<Vec<u8>>>,
    record: csv::StringRecord,
    source: String,
    column_names: Option<Vec<String>>,
    ignore_missing_fields: bool,
    ignore_excess_fields: bool,
    line_number: usize,
    row_number: usize,
    rows_read: usize,
}

impl CsvReader {
    pub fn new(bytes: &[u8], source: &str, options: &IoOptions) -> MejaResult<Self> {
        options.validate()?;
        let text = decode(bytes, options.encoding()?, source);

        let separator = options.separator();
        let delimiter = options.delimiter;
        check_quoting(&text, separator, delimiter)
            .map_err(|(message, line)| MejaError::csv(message, source, line))?;

        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(separator as u8)
            .quote(delimiter as u8)
            .double_quote(true)
            .from_reader(Cursor::new(text.into_bytes()));

        Ok(CsvReader {
            reader,
            record: csv::StringRecord::new(),
            source: source.to_string(),
            column_names: None,
            ignore_missing_fields: false,
            ignore_excess_fields: false,
            line_number: 0,
            row_number: 0,
            rows_read: 0,
        })
    }

    pub fn from_path(path: &Path, options: &IoOptions) -> MejaResult<Self> {
        let bytes = std::fs::read(path)?;
        CsvReader::new(&bytes, &path.display().to_string(), options)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Last physical line consumed, counting from 1.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Number of rows consumed so far, including a header row.
    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// Number of data rows passed to a builder.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn ignore_missing_fields(&self) -> bool {
        self.ignore_missing_fields
    }

    pub fn set_ignore_missing_fields(&mut self, ignore: bool) {
        self.ignore_missing_fields = ignore;
    }

    pub fn ignore_excess_fields(&self) -> bool {
        self.ignore_excess_fields
    }

    pub fn set_ignore_excess_fields(&mut self, ignore: bool) {
        self.ignore_excess_fields = ignore;
    }

    pub fn column_names(&self) -> Option<&[String]> {
        self.column_names.as_deref()
    }

    pub fn set_column_names(&mut self, names: Vec<String>) {
        self.column_names = Some(names);
    }

    /// Name of column `j`, or its index as text when no names are known.
    pub fn column_name(&self, j: usize) -> String {
        self.column_names
            .as_ref()
            .and_then(|names| names.get(j).cloned())
            .unwrap_or_else(|| j.to_string())
    }

    /// Use the next row as column names.
    pub fn read_column_names(&mut self) -> MejaResult<&[String]> {
        let fields = self
            .read_fields()?
            .ok_or_else(|| self.error("no column names."))?;
        let mut builder = ListRowBuilder::default();
        feed(&mut builder, &fields)?;
        self.row_number += 1;
        Ok(self.column_names.insert(builder.into_row()).as_slice())
    }

    /// Skip `n` physical lines; returns the number of lines skipped.
    pub fn ignore_rows(&mut self, n: usize) -> MejaResult<usize> {
        let position = self.reader.position().clone();
        let data = self.reader.get_ref().get_ref();
        let mut offset = position.byte() as usize;
        let mut ignored = 0;
        while ignored < n && offset < data.len() {
            offset = match data[offset..].iter().position(|&b| b == b'\n') {
                Some(k) => offset + k + 1,
                None => data.len(),
            };
            ignored += 1;
        }

        self.line_number += ignored;
        let mut target = csv::Position::new();
        target
            .set_byte(offset as u64)
            .set_line(self.line_number as u64 + 1)
            .set_record(position.record());
        self.reader
            .seek(target)
            .map_err(|e| self.error(e.to_string()))?;
        Ok(ignored)
    }

    /// Read one row into `builder`; returns false at the end of input.
    pub fn read_row(&mut self, builder: &mut impl RowBuilder) -> MejaResult<bool> {
        let Some(fields) = self.read_fields()? else {
            return Ok(false);
        };

        if let Some(names) = &self.column_names {
            if fields.len() < names.len() && !self.ignore_missing_fields {
                return Err(self.error("not enough fields."));
            }
            if fields.len() > names.len() && !self.ignore_excess_fields {
                return Err(self.error("too many fields."));
            }
        }

        feed(builder, &fields)?;
        self.row_number += 1;
        self.rows_read += 1;
        Ok(true)
    }

    /// Read up to `n` rows; returns the number of rows read.
    pub fn read_some(&mut self, n: usize, builder: &mut impl RowBuilder) -> MejaResult<usize> {
        let mut read = 0;
        while read < n && self.read_row(builder)? {
            read += 1;
        }
        Ok(read)
    }

    /// Read all remaining rows; returns the number of rows read.
    pub fn read_all(&mut self, builder: &mut impl RowBuilder) -> MejaResult<usize> {
        let mut read = 0;
        while self.read_row(builder)? {
            read += 1;
        }
        Ok(read)
    }

    fn read_fields(&mut self) -> MejaResult<Option<Vec<String>>> {
        let more = self
            .reader
            .read_record(&mut self.record)
            .map_err(|e| MejaError::csv(e.to_string(), &self.source, self.line_number + 1))?;
        if !more {
            return Ok(None);
        }

        let start = self
            .record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(self.line_number + 1);
        let embedded: usize = self.record.iter().map(|f| f.matches('\n').count()).sum();
        self.line_number = start + embedded;

        Ok(Some(self.record.iter().map(str::to_string).collect()))
    }

    fn error(&self, message: impl Into<String>) -> MejaError {
        MejaError::csv(message, &self.source, self.line_number)
    }
}

fn feed(builder: &mut impl RowBuilder, fields: &[String]) -> MejaResult<()> {
    builder.start_row()?;
    for field in fields {
        builder.add(field)?;
    }
    builder.end_row()
}

fn decode(bytes: &[u8], encoding: &'static Encoding, source: &str) -> String {
    let (text, used, had_errors) = encoding.decode(bytes);
    if used != encoding {
        debug!(
            "{}: byte order mark found, reading as {} instead of {}",
            source,
            used.name(),
            encoding.name()
        );
    }
    if had_errors {
        warn!("{}: input contains invalid {} sequences", source, used.name());
    }
    text.into_owned()
}

/// Strict check of quoted fields, which the `csv` crate parses leniently.
///
/// A quote must be closed before the end of input, and a closing quote must
/// be followed by a separator or a line break.
fn check_quoting(text: &str, separator: char, delimiter: char) -> Result<(), (&'static str, usize)> {
    let mut chars = text.chars().peekable();
    let mut line = 1;
    let mut field_start = true;

    while let Some(c) = chars.next() {
        if field_start && c == delimiter {
            let start_line = line;
            loop {
                match chars.next() {
                    None => {
                        return Err((
                            "Unexpected end of input while looking for matching delimiter.",
                            start_line,
                        ))
                    }
                    Some('\n') => line += 1,
                    Some(q) if q == delimiter => {
                        if chars.peek() == Some(&delimiter) {
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    Some(_) => {}
                }
            }
            match chars.peek() {
                None | Some('\n') | Some('\r') => field_start = false,
                Some(&c) if c == separator => field_start = false,
                Some(_) => return Err(("invalid csv data.", line)),
            }
        } else if c == separator {
            field_start = true;
        } else if c == '\n' {
            line += 1;
            field_start = true;
        } else {
            field_start = false;
        }
    }
    Ok(())
}

//==============================================================================
// Writer
//==============================================================================

const ALLOWED_CHARS: &str = "!§$%&/()=?`°^'.,:;-_#'+~*<>|@ \t";

/// Writes CSV rows, quoting fields only where needed.
pub struct CsvWriter<W: Write> {
    out: W,
    encoding: &'static Encoding,
    separator: char,
    delimiter: char,
    fields_in_row: usize,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W, options: &IoOptions) -> MejaResult<Self> {
        options.validate()?;
        Ok(CsvWriter {
            out,
            encoding: options.encoding()?,
            separator: options.separator(),
            delimiter: options.delimiter,
            fields_in_row: 0,
        })
    }

    pub fn add_field(&mut self, text: &str) -> MejaResult<()> {
        if self.fields_in_row > 0 {
            let mut buf = [0u8; 4];
            let separator: &str = self.separator.encode_utf8(&mut buf);
            self.write_text(separator)?;
        }
        if self.is_quote_needed(text) {
            let quote = self.delimiter.to_string();
            let doubled = text.replace(self.delimiter, &quote.repeat(2));
            self.write_text(&format!("{}{}{}", quote, doubled, quote))?;
        } else {
            self.write_text(text)?;
        }
        self.fields_in_row += 1;
        Ok(())
    }

    pub fn next_row(&mut self) -> MejaResult<()> {
        self.write_text("\n")?;
        self.fields_in_row = 0;
        Ok(())
    }

    /// Terminate a partially written row and flush.
    pub fn finish(mut self) -> MejaResult<W> {
        if self.fields_in_row > 0 {
            self.next_row()?;
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn is_quote_needed(&self, text: &str) -> bool {
        text.chars().any(|c| {
            c == self.separator
                || c == self.delimiter
                || !(c.is_alphanumeric() || ALLOWED_CHARS.contains(c))
        })
    }

    fn write_text(&mut self, text: &str) -> MejaResult<()> {
        // encoding_rs only decodes UTF-16, its encoder falls back to UTF-8
        if self.encoding == UTF_16LE || self.encoding == UTF_16BE {
            let little_endian = self.encoding == UTF_16LE;
            let bytes: Vec<u8> = text
                .encode_utf16()
                .flat_map(|unit| {
                    if little_endian {
                        unit.to_le_bytes()
                    } else {
                        unit.to_be_bytes()
                    }
                })
                .collect();
            self.out.write_all(&bytes)?;
            return Ok(());
        }

        let (bytes, _, unmappable) = self.encoding.encode(text);
        if unmappable {
            warn!("'{}' cannot be represented in {}", text, self.encoding.name());
        }
        self.out.write_all(&bytes)?;
        Ok(())
    }
}

//==============================================================================
// Workbooks
//==============================================================================

/// Read CSV data into a new workbook with a single sheet.
pub fn read_workbook(bytes: &[u8], source: &str, options: &IoOptions) -> MejaResult<Workbook> {
    let mut reader = CsvReader::new(bytes, source, options)?;
    let parser = CellValueParser::from_options(options)?;

    let mut workbook = Workbook::with_locale(options.locale);
    let sheet = workbook.create_sheet(CSV_SHEET_NAME);
    let mut builder = SheetRowBuilder::new(sheet, parser);
    let rows = reader.read_all(&mut builder)?;
    debug!("{}: read {} rows", source, rows);
    Ok(workbook)
}

/// Write all sheets as CSV, each followed by an empty line.
///
/// Cells are written as formatted text, formulas with a leading `=`.
pub fn write_workbook<W: Write>(workbook: &Workbook, out: W, options: &IoOptions) -> MejaResult<W> {
    let mut writer = CsvWriter::new(out, options)?;
    for sheet in workbook.sheets() {
        for row in sheet.rows() {
            for cell in row.cells() {
                let text = match cell.value() {
                    CellValue::Formula(f) => format!("={}", f),
                    _ => cell.format(workbook.styles(), options.locale),
                };
                writer.add_field(&text)?;
            }
            writer.next_row()?;
        }
        writer.next_row()?;
    }
    writer.finish()
}
