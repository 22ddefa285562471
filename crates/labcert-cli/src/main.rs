use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use eyre::{Result, WrapErr};
use jiff::civil::Date;
use labcert_cli::config::{config_path, load_config, save_config, LabcertConfig};
use labcert_cli::pipeline::{export_table, read_records, write_tsv};
use labcert_core::models::department::Department;
use labcert_core::models::verdict::Verdict;
use labcert_interpret::serology_text::extract_certificate;
use labcert_view::filter::ViewFilters;
use labcert_view::options::filter_options;
use labcert_view::stats::result_stats;
use labcert_view::view::Layout;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "labcert", version, about = "Interpret lab results into certificate tables")]
struct Cli {
    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Config file. Defaults to `labcert/config.json` in the user config directory.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the results table and print it.
    Table(TableArgs),
    /// Print per-disease and microbiology statistics.
    Stats(FilterArgs),
    /// List the values each filter can take.
    Options {
        /// JSON array of unit records; `-` reads stdin.
        input: PathBuf,
        #[arg(long)]
        department: Option<Department>,
    },
    /// Extract serology statistics from certificate page text files.
    Serology {
        /// One text file per certificate page.
        #[arg(required = true)]
        pages: Vec<PathBuf>,
    },
    /// Write the current config (defaults when none exists) back to disk.
    InitConfig,
}

#[derive(Args)]
struct FilterArgs {
    /// JSON array of unit records; `-` reads stdin.
    input: PathBuf,
    #[arg(long)]
    department: Option<Department>,
    #[arg(long = "company")]
    companies: Vec<String>,
    #[arg(long = "farm")]
    farms: Vec<String>,
    #[arg(long = "flock")]
    flocks: Vec<String>,
    #[arg(long = "cycle")]
    cycles: Vec<String>,
    #[arg(long = "age")]
    ages: Vec<String>,
    #[arg(long = "source")]
    sources: Vec<String>,
    #[arg(long = "sample-type")]
    sample_types: Vec<String>,
    #[arg(long = "disease")]
    diseases: Vec<String>,
    #[arg(long = "kit-type")]
    kit_types: Vec<String>,
    /// Earliest date received, inclusive (YYYY-MM-DD).
    #[arg(long)]
    from: Option<Date>,
    /// Latest date received, inclusive (YYYY-MM-DD).
    #[arg(long)]
    to: Option<Date>,
    #[arg(long = "verdict", value_enum)]
    verdicts: Vec<VerdictArg>,
}

#[derive(Args)]
struct TableArgs {
    #[command(flatten)]
    filters: FilterArgs,
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
    /// Build rows in slices of this many units.
    #[arg(long)]
    chunk_size: Option<NonZeroUsize>,
    /// Hide an optional column (e.g. `flock`, `report_no`).
    #[arg(long = "hide", value_name = "COLUMN")]
    hidden: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Unit,
    Pool,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Unit => Layout::PerUnit,
            LayoutArg::Pool => Layout::PerPool,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum VerdictArg {
    Positive,
    Negative,
    Detected,
    NotDetected,
    OverLimit,
    WithinLimit,
}

impl From<VerdictArg> for Verdict {
    fn from(arg: VerdictArg) -> Self {
        match arg {
            VerdictArg::Positive => Verdict::Positive,
            VerdictArg::Negative => Verdict::Negative,
            VerdictArg::Detected => Verdict::Detected,
            VerdictArg::NotDetected => Verdict::NotDetected,
            VerdictArg::OverLimit => Verdict::OverLimit,
            VerdictArg::WithinLimit => Verdict::WithinLimit,
        }
    }
}

impl FilterArgs {
    /// Layer the flags over the configured filters. A category given on the
    /// command line replaces the configured one.
    fn over(self, config: &LabcertConfig) -> ViewFilters {
        fn pick<T>(flag: Vec<T>, configured: &[T]) -> Vec<T>
        where
            T: Clone,
        {
            if flag.is_empty() { configured.to_vec() } else { flag }
        }

        let base = &config.default_filters;
        ViewFilters {
            companies: pick(self.companies, &base.companies),
            farms: pick(self.farms, &base.farms),
            flocks: pick(self.flocks, &base.flocks),
            cycles: pick(self.cycles, &base.cycles),
            ages: pick(self.ages, &base.ages),
            sources: pick(self.sources, &base.sources),
            sample_types: pick(self.sample_types, &base.sample_types),
            diseases: pick(self.diseases, &base.diseases),
            kit_types: pick(self.kit_types, &base.kit_types),
            date_from: self.from.or(base.date_from),
            date_to: self.to.or(base.date_to),
            department: self.department.or(base.department).or(config.department),
            verdicts: pick(
                self.verdicts.into_iter().map(Verdict::from).collect(),
                &base.verdicts,
            ),
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if cli.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let path = match cli.config {
        Some(path) => path,
        None => config_path()?,
    };
    let config = load_config(&path)?;

    match cli.command {
        Command::Table(args) => {
            let layout = args.layout.map(Layout::from).unwrap_or(config.layout);
            let mut visible = config.visible_columns.clone();
            for key in &args.hidden {
                visible.set(key, false)?;
            }

            let records = read_records(&args.filters.input)?;
            let filters = args.filters.over(&config);
            let table = export_table(&records, &filters, layout, &visible, args.chunk_size);

            match args.format {
                Format::Json => println!("{}", table.to_json()?),
                Format::Table => write_tsv(&table, &mut std::io::stdout().lock())?,
            }
        }
        Command::Stats(args) => {
            let records = read_records(&args.input)?;
            let filters = args.over(&config);
            print_json(&result_stats(&records, &filters))?;
        }
        Command::Options { input, department } => {
            let records = read_records(&input)?;
            print_json(&filter_options(&records, department.or(config.department)))?;
        }
        Command::Serology { pages } => {
            let texts = pages
                .iter()
                .map(|page| {
                    std::fs::read_to_string(page)
                        .wrap_err_with(|| format!("failed to read page {}", page.display()))
                })
                .collect::<Result<Vec<_>>>()?;
            let extracted = extract_certificate(texts.iter().map(String::as_str));
            tracing::info!(pages = texts.len(), diseases = extracted.len(), "extracted certificate");
            print_json(&extracted)?;
        }
        Command::InitConfig => {
            save_config(&config, &path)?;
        }
    }

    Ok(())
}
