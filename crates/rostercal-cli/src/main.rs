//! rostercal CLI - spreadsheet roster to calendar conversion

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rostercal::export::COMBINED_KEY;
use rostercal::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "rostercal")]
#[command(
    author,
    version,
    about = "Turn color-coded spreadsheet rosters into iCalendar files"
)]
struct Cli {
    /// Increase log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SheetArgs {
    /// Input workbook (.xlsx)
    input: PathBuf,

    /// Sheet layout
    #[arg(short, long, default_value_t = Layout::Preceptor)]
    layout: Layout,

    /// Sheet name (default: the layout's usual sheet)
    #[arg(short, long)]
    sheet: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all sheets in a workbook
    Sheets {
        /// Input workbook (.xlsx)
        input: PathBuf,
    },

    /// Print the schedule blocks recovered from a sheet
    Blocks {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write iCalendar files, one per person by default
    Export {
        #[command(flatten)]
        sheet: SheetArgs,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// First date to export, inclusive (M/D/YYYY or YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// Last date to export, inclusive (M/D/YYYY or YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Write one combined calendar instead of one per person
        #[arg(long)]
        combined: bool,

        /// Include administrative time
        #[arg(long)]
        admin_time: bool,

        /// JSON object mapping attending names to email addresses
        #[arg(long)]
        emails: Option<PathBuf>,

        /// Print a per-day digest of every calendar written
        #[arg(long)]
        summary: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sheets { input } => list_sheets(&input),
        Commands::Blocks { sheet, json } => print_blocks(&sheet, json),
        Commands::Export {
            sheet,
            out,
            start,
            end,
            combined,
            admin_time,
            emails,
            summary,
        } => {
            let email_map = match emails {
                Some(path) => load_emails(&path)?,
                None => HashMap::new(),
            };
            let options = ExportOptions {
                start_date: start,
                end_date: end,
                file_per_person: !combined,
                include_admin_time: admin_time,
                email_map,
            };
            export(&sheet, &out, options, summary)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    rostercal::parse_short_date(s)
        .ok_or_else(|| format!("'{}' is not a date (expected M/D/YYYY or YYYY-MM-DD)", s))
}

fn load_emails(path: &Path) -> Result<HashMap<String, String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read email map '{}'", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Email map '{}' is not a JSON object of strings", path.display()))
}

fn read_blocks(args: &SheetArgs) -> Result<Vec<ScheduleBlock>> {
    rostercal::parse_file(&args.input, args.layout, args.sheet.as_deref())
        .with_context(|| format!("Failed to read '{}'", args.input.display()))
}

fn list_sheets(input: &Path) -> Result<()> {
    let doc = XlsxDocument::open(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    println!("Sheets in '{}':", input.display());
    for (i, name) in doc.sheet_names().iter().enumerate() {
        println!("  {}: {}", i, name);
    }
    Ok(())
}

fn print_blocks(args: &SheetArgs, json: bool) -> Result<()> {
    let blocks = read_blocks(args)?;

    if json {
        let out = serde_json::to_string_pretty(&blocks).context("Failed to serialize blocks")?;
        println!("{}", out);
    } else {
        for block in &blocks {
            println!("{}", block);
        }
        eprintln!("{} block(s)", blocks.len());
    }
    Ok(())
}

fn export(args: &SheetArgs, out: &Path, options: ExportOptions, summary: bool) -> Result<()> {
    let blocks = read_blocks(args)?;
    let per_person = options.file_per_person;

    let mut exporter = Exporter::new(options);
    let events = exporter.add_blocks(&blocks)?;
    if events == 0 {
        bail!("No events to export from '{}'", args.input.display());
    }

    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create '{}'", out.display()))?;

    let keys: Vec<String> = exporter
        .keys()
        .filter(|key| !per_person || *key != COMBINED_KEY)
        .map(String::from)
        .collect();

    for key in &keys {
        let path = out.join(Exporter::file_name(key));
        let bytes = exporter.render(key)?;
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "wrote calendar");

        if summary {
            println!("== {} ==", key);
            print!("{}", exporter.summarize(key)?);
        }
    }

    eprintln!(
        "Wrote {} event(s) in {} calendar(s) to '{}'",
        events,
        keys.len(),
        out.display()
    );
    Ok(())
}
