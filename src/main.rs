use clap::{Parser, Subcommand};
use meja::cli;
use meja::error::MejaResult;
use meja::format::Locale;
use meja::io::DateFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meja")]
#[command(about = "Read, convert and inspect spreadsheets: CSV, XLSX, XLS and HTML.")]
#[command(long_about = "Meja - spreadsheet workbooks on the command line

FORMATS:
  csv, txt    - read and write
  xlsx, xlsm  - read and write
  xls         - read only
  html, htm   - write only

COMMANDS:
  convert       - Convert between formats (by file extension)
  info          - Show sheets, dimensions and cell styles
  show          - Print a sheet as a text table
  find          - Find cells by text
  calendar      - Create a calendar workbook
  kitchen-sink  - Create a colour palette workbook
  fill          - Turn a JSON array of objects into a workbook

EXAMPLES:
  meja convert data.csv data.xlsx
  meja convert report.xlsx report.html --locale de-DE
  meja show data.csv --separator ';' --charset windows-1252
  meja find budget.xlsx total --ignore-case
  meja calendar calendar.html --year 2025")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML file with I/O options (locale, separator, delimiter, date_format, charset)
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    /// Locale for numbers and dates (root, en-US, en-GB, de-DE, fr-FR)
    #[arg(long, global = true, env = "MEJA_LOCALE")]
    locale: Option<Locale>,

    /// CSV field separator
    #[arg(long, global = true, env = "MEJA_SEPARATOR")]
    separator: Option<char>,

    /// Character set for CSV files
    #[arg(long, global = true, env = "MEJA_CHARSET")]
    charset: Option<String>,

    /// How dates are recognized in CSV input (locale-short, locale-long, iso)
    #[arg(long, global = true)]
    date_format: Option<DateFormat>,

    /// Show verbose output and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a workbook to another format
    Convert {
        /// Input file (csv, txt, xlsx, xlsm, xls)
        input: PathBuf,

        /// Output file (csv, txt, xlsx, html)
        output: PathBuf,
    },

    /// Show sheets, dimensions and cell styles
    Info {
        /// Workbook file
        file: PathBuf,
    },

    /// Print a sheet as a text table
    Show {
        /// Workbook file
        file: PathBuf,

        /// Sheet to show (default: the current sheet)
        #[arg(short, long)]
        sheet: Option<String>,
    },

    #[command(long_about = "Find cells by their displayed text.

Searches all sheets row by row and lists every matching cell.

EXAMPLES:
  meja find data.csv London
  meja find data.xlsx london --ignore-case --whole
  meja find model.xlsx SUM --formula")]
    /// Find cells by text
    Find {
        /// Workbook file
        file: PathBuf,

        /// Text to search for
        text: String,

        /// Ignore case
        #[arg(short, long)]
        ignore_case: bool,

        /// Match the complete cell text only
        #[arg(short, long)]
        whole: bool,

        /// Search formula text instead of displayed values
        #[arg(short, long)]
        formula: bool,
    },

    /// Create a calendar workbook
    Calendar {
        /// Output file (csv, xlsx, html)
        output: PathBuf,

        /// Year (default: the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Create a workbook showing the colour palette
    KitchenSink {
        /// Output file (csv, xlsx, html)
        output: PathBuf,
    },

    /// Fill a workbook from a JSON array of objects
    Fill {
        /// JSON input file
        input: PathBuf,

        /// Output file (csv, xlsx, html)
        output: PathBuf,

        /// Do not write a header row with the field names
        #[arg(long)]
        no_header: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "meja=debug" } else { "meja=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> MejaResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli::build_options(
        cli.options.as_deref(),
        cli.locale,
        cli.separator,
        cli.charset,
        cli.date_format,
    )?;
    let verbose = cli.verbose;

    match cli.command {
        Commands::Convert { input, output } => cli::convert(input, output, &options, verbose),

        Commands::Info { file } => cli::info(file, &options, verbose),

        Commands::Show { file, sheet } => cli::show(file, sheet, &options),

        Commands::Find {
            file,
            text,
            ignore_case,
            whole,
            formula,
        } => cli::find(file, text, ignore_case, whole, formula, &options).map(|_| ()),

        Commands::Calendar { output, year } => cli::calendar(output, year, &options),

        Commands::KitchenSink { output } => cli::kitchen_sink(output, &options),

        Commands::Fill {
            input,
            output,
            no_header,
        } => cli::fill(input, output, no_header, &options),
    }
}
