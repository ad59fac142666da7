use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use hms::config::{self, HmsConfig, CONFIG_FILE};
use hms::hms_billing::{Adjustments, DiscountType};
use hms::hms_labs::{lab_query, LabQuery};
use hms::hms_records::parse_timestamp;
use hms::render;
use log::{debug, LevelFilter};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "hms",
    version,
    about = "Hospital management computations: lab trends and surgery billing",
    long_about = "hms derives lab-history statistics and drafts surgery invoices\n\
        from the JSON payloads served by the hospital backend.\n\n\
        Commands:\n  \
        labs     Statistics and abnormal trends for a patient's lab history\n  \
        bill     Auto-generate and total the invoice for a surgery\n  \
        config   Create or validate hms.toml"
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a lab-history payload
    Labs(LabsArgs),
    /// Draft the invoice for a surgery payload
    Bill(BillArgs),
    /// Manage hms.toml
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
struct LabsArgs {
    /// Lab-history JSON (reads stdin when omitted or "-")
    file: Option<PathBuf>,

    /// Only include this test (case-insensitive)
    #[arg(long = "test", value_name = "NAME")]
    test_name: Option<String>,

    /// Earliest ordered date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE")]
    from: Option<String>,

    /// Latest ordered date, inclusive (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE")]
    to: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct BillArgs {
    /// Surgery JSON (reads stdin when omitted or "-")
    file: Option<PathBuf>,

    /// Configuration file (defaults to ./hms.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Discount value, percent or flat amount per --discount-type
    #[arg(long, value_name = "N")]
    discount: Option<Decimal>,

    /// How to read --discount: percentage or flat
    #[arg(long, value_name = "TYPE")]
    discount_type: Option<DiscountType>,

    /// Tax percent applied after discount
    #[arg(long, value_name = "N")]
    tax_rate: Option<Decimal>,

    /// Amount covered by insurance
    #[arg(long, value_name = "N")]
    insurance: Option<Decimal>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Write a hms.toml with the built-in tariff
    Init {
        /// Overwrite an existing hms.toml
        #[arg(long)]
        force: bool,
    },
    /// Validate a configuration file
    Check {
        /// Configuration file (defaults to ./hms.toml)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);
    let ctx = Context {
        verbose: cli.verbose > 0,
        quiet: cli.quiet,
    };
    let rc = match cli.command {
        Command::Labs(args) => run_labs(&ctx, &args),
        Command::Bill(args) => run_bill(&ctx, &args),
        Command::Config(ConfigCommand::Init { force }) => run_config_init(&ctx, force),
        Command::Config(ConfigCommand::Check { config }) => run_config_check(&ctx, config.as_deref()),
    };
    std::process::exit(rc);
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logger(verbose: u8, quiet: bool) {
    env_logger::Builder::new()
        .filter_level(log_level(verbose, quiet))
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

struct Context {
    verbose: bool,
    quiet: bool,
}

impl Context {
    fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    fn verbose(&self, msg: &str) {
        if self.verbose && !self.quiet {
            println!("  {msg}");
        }
    }

    fn success(&self, msg: &str) {
        if !self.quiet {
            println!("✓ {msg}");
        }
    }
}

fn read_input(file: Option<&Path>) -> Result<String, String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {e}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(e) => {
            eprintln!("error: failed to encode output: {e}");
            2
        }
    }
}

/// Bound for `--from`/`--to`. A bare day covers the whole day.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DateBound {
    Day(NaiveDate),
    Instant(chrono::DateTime<chrono::Utc>),
}

fn parse_date_bound(flag: &str, raw: &str) -> Result<DateBound, String> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(DateBound::Day(day));
    }
    parse_timestamp(raw)
        .map(DateBound::Instant)
        .ok_or_else(|| format!("--{flag}: '{raw}' is not a date"))
}

fn build_query(args: &LabsArgs) -> Result<LabQuery, String> {
    let mut query = lab_query();
    if let Some(name) = &args.test_name {
        query = query.test(name.as_str());
    }
    if let Some(raw) = &args.from {
        query = match parse_date_bound("from", raw)? {
            DateBound::Day(day) => query.from_day(day),
            DateBound::Instant(at) => query.from(at),
        };
    }
    if let Some(raw) = &args.to {
        query = match parse_date_bound("to", raw)? {
            DateBound::Day(day) => query.through_day(day),
            DateBound::Instant(at) => query.to(at),
        };
    }
    Ok(query.build())
}

fn run_labs(ctx: &Context, args: &LabsArgs) -> i32 {
    let query = match build_query(args) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let input = match read_input(args.file.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    debug!("lab query: {query:?}");

    let analysis = match hms::analyze_lab_history(&input, &query) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };

    if args.json {
        return print_json(&analysis);
    }
    for t in &analysis.report.tests {
        ctx.verbose(&format!(
            "{} {} {}",
            t.ordered_date.format("%Y-%m-%d"),
            t.test_name,
            t.results
        ));
    }
    ctx.info(render::lab_analysis_text(&analysis).trim_end());
    0
}

/// Config defaults with any flags given on the command line laid over them.
fn build_adjustments(config: &HmsConfig, args: &BillArgs) -> Adjustments {
    let mut adj = config.invoice.adjustments();
    if let Some(d) = args.discount {
        adj.discount = d;
    }
    if let Some(t) = args.discount_type {
        adj.discount_type = t;
    }
    if let Some(r) = args.tax_rate {
        adj.tax_rate = r;
    }
    if let Some(i) = args.insurance {
        adj.insurance_coverage = i;
    }
    adj
}

fn run_bill(ctx: &Context, args: &BillArgs) -> i32 {
    let config = match config::resolve_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let input = match read_input(args.file.as_deref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let adjustments = build_adjustments(&config, args);

    let draft = match hms::draft_surgery_invoice(&input, &config, Some(adjustments)) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };

    if args.json {
        return print_json(&draft);
    }
    ctx.info(render::invoice_text(&draft).trim_end());
    0
}

fn run_config_init(ctx: &Context, force: bool) -> i32 {
    let path = PathBuf::from(CONFIG_FILE);
    if path.exists() && !force {
        eprintln!(
            "error: '{}' already exists (use --force to overwrite)",
            path.display()
        );
        return 2;
    }
    if let Err(e) = fs::write(&path, config::generate_config()) {
        eprintln!("error: failed to write '{}': {e}", path.display());
        return 2;
    }
    ctx.success(&format!("Created {CONFIG_FILE}"));
    0
}

fn run_config_check(ctx: &Context, explicit: Option<&Path>) -> i32 {
    let path = explicit.unwrap_or(Path::new(CONFIG_FILE));
    let config = match config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let t = &config.tariff;
    ctx.verbose(&format!("OT hourly default: {}", t.ot_hourly.default));
    ctx.verbose(&format!("Surgeon fee default: {}", t.surgeon_fee.default));
    ctx.verbose(&format!("Anesthesia hourly default: {}", t.anesthesia_hourly.default));
    ctx.verbose(&format!("Team fee default: {}", t.team_fee.default));
    ctx.verbose(&format!("Consumables: {}", t.consumables));
    ctx.verbose(&format!(
        "Invoice defaults: discount {} ({}), tax {}%",
        config.invoice.discount, config.invoice.discount_type, config.invoice.tax_rate
    ));
    ctx.success(&format!("{} is valid", path.display()));
    0
}
