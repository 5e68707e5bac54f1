use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use renoscope_engine::{ForensicFlags, UserContext, VerdictEngine};
use renoscope_reference::ReferenceStore;
use std::path::PathBuf;
use std::sync::Arc;

mod batch;
mod config;
mod flags;

use config::CliConfig;
use flags::{CoreSystemFlag, LivingSpaceFlag, RelationshipFlag};

#[derive(Parser)]
#[command(name = "renoscope")]
#[command(about = "Home-repair cost exposure verdicts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Reference data directory (defaults to renoscope.toml, then the
    /// embedded dataset)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a verdict for one property profile
    Verdict(VerdictArgs),

    /// Generate verdicts for every metro x era combination
    Batch(BatchArgs),

    /// List reference data coverage
    Data(DataArgs),
}

#[derive(Args)]
struct VerdictArgs {
    /// Metro code, e.g. AUSTIN_ROUND_ROCK_TX
    #[arg(long)]
    metro: Option<String>,

    /// Construction era code, e.g. 1980_1995
    #[arg(long)]
    era: Option<String>,

    /// Stated repair budget in dollars
    #[arg(long)]
    budget: f64,

    /// House size in square feet (defaults to the metro average)
    #[arg(long)]
    sqft: Option<f64>,

    #[arg(long, value_enum, default_value = "buying")]
    relationship: RelationshipFlag,

    /// Observed single-strand aluminum branch wiring
    #[arg(long)]
    aluminum_wiring: bool,

    /// Observed polybutylene supply piping
    #[arg(long)]
    polybutylene: bool,

    /// Observed Federal Pacific Stab-Lok panel
    #[arg(long)]
    fpe_panel: bool,

    /// Observed sulfur-contaminated (defective) drywall
    #[arg(long)]
    chinese_drywall: bool,

    /// Core system confirmed as recently replaced (repeatable; LIVING only)
    #[arg(long = "updated-system", value_enum)]
    updated_systems: Vec<CoreSystemFlag>,

    /// Living space confirmed as recently remodeled (repeatable; LIVING only)
    #[arg(long = "remodeled-space", value_enum)]
    remodeled_spaces: Vec<LivingSpaceFlag>,

    /// Pretty-print the JSON verdict
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct BatchArgs {
    /// Budget applied to every combination
    #[arg(long, default_value_t = 50_000.0)]
    budget: f64,

    #[arg(long, value_enum, default_value = "buying")]
    relationship: RelationshipFlag,

    /// Output file for JSON lines (stdout when omitted)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct DataArgs {
    /// Emit JSON instead of a plain listing
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    let config = CliConfig::load();
    let store = load_store(cli.data_dir.or_else(|| config.data_dir.clone()))?;
    let engine = VerdictEngine::new(store);

    match cli.command {
        Commands::Verdict(args) => run_verdict(&engine, &config, args),
        Commands::Batch(args) => {
            batch::run(engine, args.budget, args.relationship.as_domain(), args.out).await
        }
        Commands::Data(args) => run_data(&engine, args),
    }
}

fn load_store(data_dir: Option<PathBuf>) -> Result<Arc<ReferenceStore>> {
    let store = match data_dir {
        Some(dir) => ReferenceStore::load_dir(&dir)
            .with_context(|| format!("loading reference data from {}", dir.display()))?,
        None => ReferenceStore::builtin().clone(),
    };
    let warnings = store.validate();
    if !warnings.is_empty() {
        bail!("reference data failed validation ({} warning(s))", warnings.len());
    }
    Ok(Arc::new(store))
}

fn run_verdict(engine: &VerdictEngine, config: &CliConfig, args: VerdictArgs) -> Result<()> {
    let metro = args
        .metro
        .or_else(|| config.default_metro.clone())
        .context("--metro is required (or default_metro in renoscope.toml)")?;
    let era = args
        .era
        .or_else(|| config.default_era.clone())
        .context("--era is required (or default_era in renoscope.toml)")?;

    let mut ctx = UserContext::new(args.budget, metro, era, args.relationship.as_domain());
    ctx.house_sqft = args.sqft;
    ctx.forensic = ForensicFlags {
        aluminum_wiring: args.aluminum_wiring,
        polybutylene: args.polybutylene,
        fpe_panel: args.fpe_panel,
        chinese_drywall: args.chinese_drywall,
    };
    ctx.core_system_history = args
        .updated_systems
        .iter()
        .map(|s| s.as_domain())
        .collect();
    ctx.living_space_history = args
        .remodeled_spaces
        .iter()
        .map(|s| s.as_domain())
        .collect();

    let verdict = engine.generate_verdict(&ctx)?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&verdict)?
    } else {
        serde_json::to_string(&verdict)?
    };
    println!("{rendered}");
    Ok(())
}

fn run_data(engine: &VerdictEngine, args: DataArgs) -> Result<()> {
    let store = engine.store();

    if args.json {
        let summary = serde_json::json!({
            "metros": store.metros().keys().collect::<Vec<_>>(),
            "eras": store.eras().keys().collect::<Vec<_>>(),
            "items": store.item_count(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("metros ({}):", store.metros().len());
    for (code, metro) in store.metros() {
        println!("  {code}  labor x{:.2}  {}", metro.labor_multiplier, metro.foundation_type);
    }
    println!("eras ({}):", store.eras().len());
    for (code, era) in store.eras() {
        println!("  {code}  {} hazard(s)", era.hazards.len());
    }
    println!("priced items: {}", store.item_count());
    Ok(())
}
