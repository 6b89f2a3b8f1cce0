use std::path;

use chrono::Utc;
use clap::Parser;
use harvester_gen::{
    GenerateOutcome, Generator, GeneratorArgs, GeneratorConfig, expand_path, resolve_date_range,
};
use tracing::{debug, info};

/// OAI-PMH harvester generator
#[derive(Debug, Parser)]
#[command(name = "harvester-gen")]
#[command(
    about = "Create a new scrapi harvester from an OAI-PMH endpoint",
    long_about = None,
    after_help = "Example: harvester-gen -b http://udspace.udel.edu/dspace-oai/request -s udel"
)]
struct Cli {
    #[command(flatten)]
    args: GeneratorArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first, then .env.local can override
    let _ = dotenvy::from_filename_override(".env");
    let _ = dotenvy::from_filename_override(".env.local");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse().args;

    if args.favicon || args.bepress {
        debug!("--favicon and --bepress are reserved and have no effect yet");
    }

    let Some(base_url) = args.baseurl else {
        debug!("no base url given, nothing to generate");
        return Ok(());
    };
    let short_name = args
        .shortname
        .ok_or_else(|| anyhow::anyhow!("a shortname is required to generate a harvester"))?;

    let (start_date, end_date) =
        resolve_date_range(args.daterange.as_deref(), Utc::now().date_naive())?;

    let config = GeneratorConfig {
        base_url,
        short_name,
        start_date,
        end_date,
        harvesters_dir: path::absolute(expand_path(&args.dir))?,
    };

    let generator = Generator::new(config)?;
    match generator.run().await? {
        GenerateOutcome::Written(path) => info!("wrote {}", path.display()),
        GenerateOutcome::AlreadyExists(_) => {
            info!("a harvester with this shortname already exists")
        }
    }

    Ok(())
}
