use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use kolada_rs::api::{DEFAULT_BASE_URL, DEFAULT_PER_PAGE};
use kolada_rs::config::{CompareConfig, DEFAULT_THRESHOLD, SummaryConfig, TrendConfig};
use kolada_rs::{Client, MetadataResolver, pipeline, report};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "kolada",
    version,
    about = "Fetch Kolada municipality KPIs, compare years & write CSV reports"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Kolada API base URL.
    #[arg(long, global = true, env = "KOLADA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Page-size hint for data requests.
    #[arg(long, global = true, default_value_t = DEFAULT_PER_PAGE)]
    per_page: u32,
    /// Directory CSV files are written to.
    #[arg(long, global = true, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-municipality trend CSV over a year range, one file per municipality.
    Trend(TrendArgs),
    /// KPIs with a small change between two years for one municipality.
    Compare(CompareArgs),
    /// Count of KPIs changed by exactly 1 plus population, for every municipality.
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
struct TrendArgs {
    /// Starting year (e.g., 2009)
    #[arg(long)]
    start_year: i32,
    /// Ending year, inclusive (e.g., 2012)
    #[arg(long)]
    end_year: i32,
    /// Only this municipality id (default: all municipalities)
    #[arg(short, long)]
    municipality: Option<String>,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Municipality id (e.g., 1860)
    #[arg(short, long)]
    municipality: String,
    /// First year (e.g., 2009)
    #[arg(long)]
    year1: i32,
    /// Second year (e.g., 2010)
    #[arg(long)]
    year2: i32,
    /// Largest absolute percentage change counted as a small change.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,
    /// Also include whole-number KPIs at or below this value that change (0 disables).
    #[arg(long, default_value_t = 0)]
    whole_threshold: u32,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// First year (e.g., 2009)
    #[arg(long)]
    year1: i32,
    /// Second year (e.g., 2010)
    #[arg(long)]
    year2: i32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Trend(args) => cmd_trend(&cli.global, args),
        Command::Compare(args) => cmd_compare(&cli.global, args),
        Command::Summary(args) => cmd_summary(&cli.global, args),
    }
}

fn client(global: &GlobalArgs) -> Result<Client> {
    Ok(Client::new()?
        .base_url(&global.base_url)
        .per_page(global.per_page))
}

fn cmd_trend(global: &GlobalArgs, args: TrendArgs) -> Result<()> {
    let config = TrendConfig::new(args.start_year, args.end_year, args.municipality)?;
    let client = client(global)?;
    log::info!("Processing data for years: {:?}", config.years);

    let mut meta = MetadataResolver::new(&client);
    pipeline::write_trends(&client, &mut meta, &config, &global.out_dir)?;
    eprintln!("All CSV files have been generated.");
    Ok(())
}

fn cmd_compare(global: &GlobalArgs, args: CompareArgs) -> Result<()> {
    let config = CompareConfig::new(
        &args.municipality,
        args.year1,
        args.year2,
        args.threshold,
        args.whole_threshold,
    )?;
    let client = client(global)?;
    let mut meta = MetadataResolver::new(&client);
    let rows = pipeline::compare_years(&client, &mut meta, &config)?;

    if rows.is_empty() {
        println!(
            "{}",
            report::no_deltas_message(config.year1, config.year2, &config.policy)
        );
    } else {
        println!(
            "\n{}\n",
            report::deltas_heading(config.year1, config.year2, &config.policy)
        );
        for r in &rows {
            println!("{}\n", r.listing(config.year1, config.year2));
        }
    }

    if let Some(path) = pipeline::write_comparison(&config, &rows, &global.out_dir)? {
        eprintln!("Results written to {}", path.display());
    }
    Ok(())
}

fn cmd_summary(global: &GlobalArgs, args: SummaryArgs) -> Result<()> {
    let config = SummaryConfig {
        year1: args.year1,
        year2: args.year2,
    };
    let client = client(global)?;
    let path = pipeline::write_summary(&client, &config, &global.out_dir)?;
    eprintln!("Results written to {}", path.display());
    Ok(())
}
