use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ratecard::{
    ComplexityTier, EstimateRequest, FeeMode, ProjectType, Settings, TrafficLevel,
    handlers::{
        catalog::{CatalogSection, handle_catalog},
        estimate::handle_estimate,
        fees::{handle_fees, handle_fees_compare},
    },
};
use tracing::{Level, debug};

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Parser)]
#[command(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Args {
    #[arg(
        long,
        global = true,
        help = "(Optional) Adds a catalog file layered over the built-in rate card."
    )]
    pub catalog: Option<String>,

    #[arg(long, global = true, help = "(Optional) Prints results as JSON.")]
    pub json: bool,

    #[arg(long, global = true, help = "(Optional) Logs calculation details to stderr.")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Estimates the cost of a project.
    Estimate {
        #[arg(long, help = "Project type: website, app or both.")]
        project_type: ProjectType,

        #[arg(long, help = "Complexity tier: basic, business, ecommerce or custom.")]
        complexity: ComplexityTier,

        #[arg(long, default_value = "low", help = "Traffic level: low, medium, high or very-high.")]
        traffic: TrafficLevel,

        #[arg(long, default_value_t = 1, help = "Number of pages.")]
        pages: u32,

        #[arg(long = "feature", help = "Adds a feature by id. Repeatable.")]
        features: Vec<String>,
    },

    /// Calculates payment processing fees.
    Fees {
        #[arg(long, help = "Amount to calculate from.")]
        amount: String,

        #[arg(long, default_value = "gross-to-net", help = "gross-to-net or net-to-gross.")]
        mode: FeeMode,

        #[arg(
            long,
            required_unless_present = "compare",
            conflicts_with = "compare",
            help = "Payment method id."
        )]
        method: Option<String>,

        #[arg(long, help = "Compares every payment method in the catalog.")]
        compare: bool,
    },

    /// Prints the loaded catalog.
    Catalog {
        #[arg(value_enum)]
        section: Option<CatalogSection>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.verbose);

    let settings = Settings::load(&args.catalog).context("Failed to load catalog")?;
    debug!(
        "catalog: {} features, {} payment methods",
        settings.pricing.features.len(),
        settings.fees.methods.len()
    );

    let output = match args.command {
        Command::Estimate {
            project_type,
            complexity,
            traffic,
            pages,
            features,
        } => {
            let request = EstimateRequest {
                project_type,
                complexity_tier: complexity,
                traffic_level: traffic,
                features,
                page_count: pages,
            };
            handle_estimate(&settings, &request, args.json)?
        }
        Command::Fees {
            amount,
            mode,
            method,
            compare,
        } => match method {
            Some(method) if !compare => handle_fees(&settings, mode, &amount, &method, args.json)?,
            _ => handle_fees_compare(&settings, mode, &amount, args.json)?,
        },
        Command::Catalog { section } => handle_catalog(&settings, section, args.json)?,
    };

    print!("{output}");

    Ok(())
}
