use crate::cli::samples;
use crate::error::{MejaError, MejaResult};
use crate::format::Locale;
use crate::io::{DateFormat, IoOptions};
use crate::model::{cell_ref, column_name, RefOption, SearchSettings, Sheet, Workbook};
use crate::table::{self, JsonRecords};
use chrono::Datelike;
use colored::Colorize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Widest column printed by `show`
const MAX_COLUMN_WIDTH: usize = 40;

/// Combine an options file with command line overrides.
pub fn build_options(
    options_file: Option<&Path>,
    locale: Option<Locale>,
    separator: Option<char>,
    charset: Option<String>,
    date_format: Option<DateFormat>,
) -> MejaResult<IoOptions> {
    let mut options = match options_file {
        Some(path) => IoOptions::from_yaml_file(path)?,
        None => IoOptions::default(),
    };
    if let Some(locale) = locale {
        options.locale = locale;
    }
    if separator.is_some() {
        options.separator = separator;
    }
    if let Some(charset) = charset {
        options.charset = charset;
    }
    if let Some(date_format) = date_format {
        options.date_format = date_format;
    }
    options.validate()?;
    debug!("effective options: {:?}", options);
    Ok(options)
}

/// Truncate to `width` characters, marking cut text with an ellipsis.
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
        clipped.push('…');
        clipped
    }
}

/// Longest sheet name Excel accepts
const MAX_SHEET_NAME: usize = 31;

/// A sheet name Excel accepts: invalid characters replaced, at most 31 characters.
fn sheet_name_for(text: &str) -> String {
    let name: String = text
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME)
        .collect();
    // Excel also rejects a leading or trailing apostrophe
    name.trim_matches('\'').to_string()
}

fn sheet_summary(sheet: &Sheet) -> String {
    let mut summary = format!("{} rows × {} columns", sheet.row_count(), sheet.column_count());
    if !sheet.merged_regions().is_empty() {
        summary.push_str(&format!(", {} merged regions", sheet.merged_regions().len()));
    }
    if sheet.split_row() > 0 || sheet.split_column() > 0 {
        summary.push_str(&format!(
            ", split at {}",
            cell_ref("", sheet.split_row(), sheet.split_column(), &[])
        ));
    }
    summary
}

/// Execute the convert command
pub fn convert(input: PathBuf, output: PathBuf, options: &IoOptions, verbose: bool) -> MejaResult<()> {
    println!("{}", "🔄 Meja - Convert".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!("{}", "📖 Reading workbook...".cyan());
    }
    let workbook = Workbook::open(&input, options)?;

    if verbose {
        for sheet in workbook.sheets() {
            println!("   📄 {}: {}", sheet.name().bright_blue(), sheet_summary(sheet));
        }
        println!();
        println!("{}", "💾 Writing workbook...".cyan());
    }
    workbook.write(&output, options)?;

    println!("{}", "✅ Conversion Complete!".bold().green());
    println!(
        "   {} sheet(s) written to {}\n",
        workbook.sheet_count(),
        output.display()
    );
    Ok(())
}

/// Execute the info command
pub fn info(file: PathBuf, options: &IoOptions, verbose: bool) -> MejaResult<()> {
    println!("{}", "📊 Meja - Workbook Info".bold().green());
    println!("   File: {}\n", file.display());

    let workbook = Workbook::open(&file, options)?;

    println!("{}", format!("📄 Sheets ({}):", workbook.sheet_count()).bold().cyan());
    for (idx, sheet) in workbook.sheets().enumerate() {
        let marker = if idx == workbook.current_sheet_index() {
            " (current)".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "   {}{}: {}",
            sheet.name().bright_blue().bold(),
            marker,
            sheet_summary(sheet)
        );
        if verbose {
            for region in sheet.merged_regions() {
                println!("      merged {}", region);
            }
        }
    }

    let styles = workbook.styles();
    println!();
    println!("{}", format!("🎨 Cell styles ({}):", styles.len()).bold().cyan());
    if verbose {
        for name in styles.names() {
            let label = if name.is_empty() { "(default)" } else { name };
            println!("   {}", label);
        }
    }
    println!();
    Ok(())
}

/// Execute the show command - print sheet cells as a text table
pub fn show(file: PathBuf, sheet_name: Option<String>, options: &IoOptions) -> MejaResult<()> {
    let workbook = Workbook::open(&file, options)?;
    let sheet = match &sheet_name {
        Some(name) => workbook
            .sheet_by_name(name)
            .ok_or_else(|| MejaError::Argument(format!("no sheet named '{}'", name)))?,
        None => workbook
            .current_sheet()
            .ok_or_else(|| MejaError::State("workbook has no sheets".to_string()))?,
    };

    println!("{}", format!("📄 {}", sheet.name()).bold().green());

    let texts: Vec<Vec<String>> = sheet
        .rows()
        .map(|row| {
            (0..sheet.column_count())
                .map(|j| {
                    row.cell(j)
                        .map(|cell| clip(&workbook.format_cell(cell), MAX_COLUMN_WIDTH))
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = (0..sheet.column_count())
        .map(|j| column_name(j).len())
        .collect();
    for row in &texts {
        for (j, text) in row.iter().enumerate() {
            widths[j] = widths[j].max(text.chars().count());
        }
    }
    let row_label_width = sheet.row_count().to_string().len();

    let header: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(j, w)| format!("{:<w$}", column_name(j), w = *w))
        .collect();
    println!(
        "{:>rw$} | {}",
        "",
        header.join(" | ").bold(),
        rw = row_label_width
    );

    for (i, row) in texts.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(text, w)| format!("{:<w$}", text, w = *w))
            .collect();
        let label = format!("{:>rw$}", i + 1, rw = row_label_width);
        println!("{} | {}", label.bold(), cells.join(" | "));
    }
    println!();
    Ok(())
}

/// Execute the find command - list all cells matching `text`
pub fn find(
    file: PathBuf,
    text: String,
    ignore_case: bool,
    whole: bool,
    formula: bool,
    options: &IoOptions,
) -> MejaResult<usize> {
    println!("{}", "🔍 Meja - Find".bold().green());
    println!("   File: {}", file.display());
    println!("   Text: {}\n", text.bright_blue().bold());

    if text.is_empty() {
        return Err(MejaError::Argument("search text must not be empty".to_string()));
    }

    let mut settings = SearchSettings::new().update_current();
    settings.ignore_case = ignore_case;
    settings.match_complete = whole;
    settings.search_formula = formula;

    let mut workbook = Workbook::open(&file, options)?;
    let locale = workbook.locale();
    let mut hits = Vec::new();
    for idx in 0..workbook.sheet_count() {
        let Some((sheet, styles)) = workbook.sheet_with_styles_mut(idx) else {
            continue;
        };
        let mut seen = HashSet::new();
        let mut next = sheet.find(&text, settings, styles, locale);
        while let Some(pos) = next {
            if !seen.insert(pos) {
                break;
            }
            hits.push((sheet.name().to_string(), pos));
            next = sheet.find(&text, settings.search_from_current(), styles, locale);
        }
    }

    for (sheet_name, (i, j)) in &hits {
        let cell = workbook
            .sheet_by_name(sheet_name)
            .and_then(|sheet| sheet.cell(*i, *j));
        let shown = cell.map(|c| workbook.format_cell(c)).unwrap_or_default();
        println!(
            "   {}: {}",
            cell_ref(sheet_name, *i, *j, &[RefOption::WithSheet]).bright_blue(),
            shown
        );
    }

    if hits.is_empty() {
        println!("{}", "❌ No matches found".yellow());
    } else {
        println!("\n{}", format!("✅ {} match(es)", hits.len()).bold().green());
    }
    Ok(hits.len())
}

/// Execute the calendar command
pub fn calendar(output: PathBuf, year: Option<i32>, options: &IoOptions) -> MejaResult<()> {
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    println!("{}", "📅 Meja - Calendar".bold().green());
    println!("   Year:   {}", year);
    println!("   Locale: {}", options.locale);
    println!("   Output: {}\n", output.display());

    let workbook = samples::create_calendar(year, options.locale)?;
    workbook.write(&output, options)?;

    println!("{}", "✅ Calendar written!".bold().green());
    Ok(())
}

/// Execute the kitchen-sink command
pub fn kitchen_sink(output: PathBuf, options: &IoOptions) -> MejaResult<()> {
    println!("{}", "🎨 Meja - Kitchen Sink".bold().green());
    println!("   Output: {}\n", output.display());

    let workbook = samples::create_kitchen_sink()?;
    workbook.write(&output, options)?;

    println!("{}", "✅ Palette workbook written!".bold().green());
    for sheet in workbook.sheets() {
        println!("   📄 {}: {}", sheet.name().bright_blue(), sheet_summary(sheet));
    }
    println!();
    Ok(())
}

/// Execute the fill command - JSON records into a new workbook
pub fn fill(input: PathBuf, output: PathBuf, no_header: bool, options: &IoOptions) -> MejaResult<()> {
    println!("{}", "📥 Meja - Fill".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let json = fs::read_to_string(&input)?;
    let mut records = JsonRecords::parse(&json)?;

    let sheet_name = input
        .file_stem()
        .map(|s| sheet_name_for(&s.to_string_lossy()))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "records".to_string());

    let mut workbook = Workbook::with_locale(options.locale);
    let sheet = workbook.create_sheet(&sheet_name);
    let count = table::fill(sheet, &mut records, !no_header)?;
    if !no_header {
        sheet.split_at(1, 0);
        sheet.set_auto_filter_row(Some(0));
    }
    let locale = workbook.locale();
    if let Some((sheet, styles)) = workbook.sheet_with_styles_mut(0) {
        sheet.auto_size_columns(styles, locale);
    }

    workbook.write(&output, options)?;

    println!("{}", "✅ Fill Complete!".bold().green());
    println!("   {} record(s) written to {}\n", count, output.display());
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
