use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tally_core::{
    AnalyticsData, CATEGORY_RULES, OTHER, SortOrder, UNCATEGORIZED, aggregate, apply_filter,
    compare_dates, generate_date_range, parse_date,
};
use tally_ingest::load_statement;
use tally_report::{ExportFormat, RenderOptions, export, render_summary};

mod config;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Bank statement analytics")]
struct Cli {
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print totals and the by-date, by-category and by-correspondent tables
    Summary {
        /// Statement file (.xls, .xlsx, .ods or .csv)
        file: PathBuf,

        #[command(flatten)]
        selection: Selection,

        /// Date ordering for the by-date table
        #[arg(long, value_enum, default_value_t = SortArg::Grouping)]
        sort: SortArg,

        /// Newest dates first
        #[arg(long)]
        desc: bool,

        /// Show only the N largest categories and correspondents
        #[arg(long)]
        top: Option<usize>,
    },

    /// Write the (optionally filtered) analytics to CSV files or JSON
    Export {
        file: PathBuf,

        #[arg(long, value_enum)]
        format: FormatArg,

        /// Output directory (csv) or file (json)
        #[arg(long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        selection: Selection,
    },

    /// Date helpers
    Dates {
        #[command(subcommand)]
        command: DatesCommand,
    },

    /// List category labels and their keywords
    Categories,

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(clap::Args, Debug, Default)]
struct Selection {
    /// Keep records in this category (repeatable)
    #[arg(long = "category", value_name = "LABEL")]
    categories: Vec<String>,

    /// Keep records with this correspondent (repeatable)
    #[arg(long = "correspondent", value_name = "NAME")]
    correspondents: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum DatesCommand {
    /// Every day from start to end inclusive, as dd.mm.yyyy
    Range { start: String, end: String },
    /// Chronological comparison of two dates
    Compare { a: String, b: String },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortArg {
    /// Lexicographic, as the dates are grouped
    Grouping,
    /// Calendar order
    Display,
}

impl From<SortArg> for SortOrder {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Grouping => SortOrder::Grouping,
            SortArg::Display => SortOrder::Display,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;

    // RUST_LOG > --verbose > config log_level
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(&cfg.output.log_level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    match cli.command {
        Command::Summary {
            file,
            selection,
            sort,
            desc,
            top,
        } => {
            let base = load(&file, &cfg)?;
            let view = select(&base, &selection);
            let opts = RenderOptions {
                date_order: sort.into(),
                descending: desc,
                top,
            };
            print!("{}", render_summary(&view, &cfg.currency, &opts));
        }

        Command::Export {
            file,
            format,
            out,
            selection,
        } => {
            let base = load(&file, &cfg)?;
            let view = select(&base, &selection);
            let format = ExportFormat::from(format);
            let out = out.unwrap_or_else(|| default_out(&cfg, format));
            for p in export(&view, format, &out, &cfg.currency)? {
                println!("{}", p.display());
            }
        }

        Command::Dates { command } => match command {
            DatesCommand::Range { start, end } => {
                for day in checked_range(&start, &end)? {
                    println!("{day}");
                }
            }
            DatesCommand::Compare { a, b } => {
                for d in [&a, &b] {
                    if parse_date(d).is_none() {
                        bail!("not a date: {d}");
                    }
                }
                let sign = match compare_dates(&a, &b) {
                    std::cmp::Ordering::Less => "<",
                    std::cmp::Ordering::Equal => "=",
                    std::cmp::Ordering::Greater => ">",
                };
                println!("{a} {sign} {b}");
            }
        },

        Command::Categories => {
            for rule in CATEGORY_RULES {
                println!("{:<18} {}", rule.label, rule.keywords.join(", "));
            }
            println!("{OTHER:<18} (no rule matched)");
            println!("{UNCATEGORIZED:<18} (blank description)");
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config(&cfg)?,
        },
    }

    Ok(())
}

fn load(file: &Path, cfg: &Config) -> Result<AnalyticsData> {
    let records = load_statement(file, &cfg.ingest)?;
    Ok(aggregate(records))
}

/// Filtered view for the CLI selection; unknown labels are kept but reported.
fn select<'a>(base: &'a AnalyticsData, selection: &Selection) -> std::borrow::Cow<'a, AnalyticsData> {
    let cats: BTreeSet<String> = selection.categories.iter().cloned().collect();
    let corrs: BTreeSet<String> = selection.correspondents.iter().cloned().collect();

    for c in cats.iter().filter(|c| base.category(c).is_none()) {
        tracing::warn!(category = %c, "no records in category");
    }
    for c in corrs.iter().filter(|c| base.correspondent(c).is_none()) {
        tracing::warn!(correspondent = %c, "no records for correspondent");
    }

    apply_filter(base, &cats, &corrs)
}

fn default_out(cfg: &Config, format: ExportFormat) -> PathBuf {
    let dir = cfg.output.export_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    dir.join(format.default_name())
}

fn checked_range(start: &str, end: &str) -> Result<Vec<String>> {
    for d in [start, end] {
        if parse_date(d).is_none() {
            bail!("not a date: {d}");
        }
    }
    let days = generate_date_range(start, end);
    if days.is_empty() {
        tracing::warn!(start, end, "start is after end; empty range");
    }
    Ok(days)
}
