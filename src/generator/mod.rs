mod cli;
mod conflict;
mod schema;
mod template;

use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use tokio::fs;
use tracing::info;

pub use cli::GeneratorArgs;

use crate::oai::OaiClient;
use conflict::harvester_exists;
use schema::extract_properties;
use template::HarvesterTemplate;

/// Extension of generated harvester source files.
pub const HARVESTER_EXTENSION: &str = "py";

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub short_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub harvesters_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Written(PathBuf),
    AlreadyExists(PathBuf),
}

/// Resolve the query window: an explicit `YYYY-MM-DD:YYYY-MM-DD` value,
/// or the two days up to `today`. The caller supplies `today` so the
/// default does not depend on the wall clock.
pub fn resolve_date_range(
    raw: Option<&str>,
    today: NaiveDate,
) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let Some(raw) = raw else {
        return Ok((today - Days::new(2), today));
    };

    let (start, end) = raw
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("date range must be YYYY-MM-DD:YYYY-MM-DD"))?;
    Ok((start.parse()?, end.parse()?))
}

pub struct Generator {
    config: GeneratorConfig,
    client: OaiClient,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> anyhow::Result<Self> {
        let client = OaiClient::new(&config.base_url)?;
        Ok(Self { config, client })
    }

    /// Query the endpoint, render the harvester source, and write it out
    /// unless a harvester with this shortname already exists.
    pub async fn run(&self) -> anyhow::Result<GenerateOutcome> {
        info!(
            "sampling {} from {} to {}",
            self.config.base_url, self.config.start_date, self.config.end_date
        );
        let fields = self.client.sample_record_fields().await?;
        let properties = extract_properties(fields);

        let identity = self.client.identify().await?;
        let rendered = HarvesterTemplate::new(&self.config, &identity, &properties)?.render();

        let file_name = format!("{}.{}", self.config.short_name, HARVESTER_EXTENSION);
        let path = self.config.harvesters_dir.join(file_name);
        if harvester_exists(&self.config.short_name, &self.config.harvesters_dir)? {
            return Ok(GenerateOutcome::AlreadyExists(path));
        }

        fs::write(&path, rendered).await?;
        Ok(GenerateOutcome::Written(path))
    }
}
