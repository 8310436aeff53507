use clap::{Args, Parser, Subcommand};
use gridx::cli::{self, ConvertEdits};
use gridx::config::{InferenceOrder, Settings, DEFAULT_PREVIEW_ROWS, DEFAULT_THRESHOLD};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridx")]
#[command(about = "Load, type, edit and preview spreadsheet columns.")]
#[command(long_about = "GridX - Spreadsheet column typing and preview
CSV/TSV and workbooks in, typed columns out, CSV/TSV/xlsx back to disk.

COMMANDS:
  info      - Sheets, shape, columns with inferred types
  preview   - First rows as a text grid (or JSON)
  convert   - Apply column edits and save to another format
  analyze   - Summary, profile, missing, duplicates, outliers, correlation, timeseries
  shell     - Interactive line-oriented session

TYPE INFERENCE:
  Text columns become datetime or numeric when more than the threshold
  (default 0.6) of their rows parse. Empty cells count against the ratio.
  Decimal commas are accepted.

EXAMPLES:
  gridx info sales.csv
  gridx preview report.xlsx --sheet Q3 --rows 20
  gridx convert sales.csv sales.xlsx --rename qty=quantity --retype price=float
  gridx analyze sales.csv outliers
  gridx shell sales.csv")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Rows shown by preview
    #[arg(long, global = true, env = "GRIDX_PREVIEW_ROWS", default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview_rows: usize,

    /// Share of parsed values (0-1] a text column needs before it is retyped
    #[arg(long, global = true, env = "GRIDX_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Which parse is attempted first: datetime-first or numeric-first
    #[arg(long, global = true, env = "GRIDX_INFERENCE_ORDER", default_value = "datetime-first")]
    inference_order: InferenceOrder,

    /// Write CSV/TSV without a UTF-8 byte-order mark
    #[arg(long, global = true, env = "GRIDX_NO_BOM")]
    no_bom: bool,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl GlobalArgs {
    fn settings(&self) -> Settings {
        Settings {
            preview_rows: self.preview_rows,
            threshold: self.threshold,
            inference_order: self.inference_order,
            csv_bom: !self.no_bom,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show sheets, shape and column types of a file
    Info {
        /// CSV, TSV or workbook file
        file: PathBuf,

        /// Workbook sheet to read (defaults to the first)
        #[arg(short, long)]
        sheet: Option<String>,
    },

    /// Print the first rows of a file
    Preview {
        /// CSV, TSV or workbook file
        file: PathBuf,

        /// Workbook sheet to read (defaults to the first)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Rows to show (overrides --preview-rows)
        #[arg(short, long)]
        rows: Option<usize>,

        /// Emit the preview as JSON
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Load a file, apply column edits and save it.

Edits are applied in a fixed order: add, rename, retype, drop.
Any failing edit aborts the conversion and nothing is written.

TYPES:
  integer, float, datetime, boolean, text

EXAMPLES:
  gridx convert in.csv out.xlsx --add source=import --add notes
  gridx convert in.xlsx out.csv --sheet Data --rename \"Unit Price=price\"
  gridx convert in.csv out.tsv --retype active=boolean --drop tmp")]
    /// Apply column edits and save to CSV, TSV or xlsx
    Convert {
        /// Input file
        input: PathBuf,

        /// Output file (.csv, .tsv or .xlsx)
        output: PathBuf,

        /// Workbook sheet to read (defaults to the first)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Add a column: NAME (null-filled) or NAME=VALUE
        #[arg(long, value_name = "NAME[=VALUE]")]
        add: Vec<String>,

        /// Rename a column: OLD=NEW
        #[arg(long, value_name = "OLD=NEW")]
        rename: Vec<String>,

        /// Convert a column: COLUMN=TYPE
        #[arg(long, value_name = "COLUMN=TYPE")]
        retype: Vec<String>,

        /// Delete a column
        #[arg(long, value_name = "COLUMN")]
        drop: Vec<String>,
    },

    /// Run an exploratory analysis
    Analyze {
        /// CSV, TSV or workbook file
        file: PathBuf,

        /// summary, profile, missing, duplicates, outliers, correlation or timeseries
        kind: String,

        /// Workbook sheet to read (defaults to the first)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Columns to profile (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,
    },

    /// Start an interactive session
    Shell {
        /// File to open on start
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "gridx=debug" } else { "gridx=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = cli.global.settings();

    match cli.command {
        Commands::Info { file, sheet } => cli::info(file, sheet, settings)?,

        Commands::Preview {
            file,
            sheet,
            rows,
            json,
        } => cli::preview(file, sheet, rows, json, settings)?,

        Commands::Convert {
            input,
            output,
            sheet,
            add,
            rename,
            retype,
            drop,
        } => cli::convert(
            input,
            output,
            sheet,
            ConvertEdits {
                add,
                rename,
                retype,
                drop,
            },
            settings,
        )?,

        Commands::Analyze {
            file,
            kind,
            sheet,
            columns,
        } => cli::analyze(file, sheet, kind, columns, settings)?,

        Commands::Shell { file } => cli::shell(file, settings)?,
    }

    Ok(())
}
