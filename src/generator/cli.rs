use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub struct GeneratorArgs {
    /// The base url for the OAI provider, everything before the ?
    #[arg(short = 'b', long)]
    pub baseurl: Option<String>,

    /// The shortname of the provider
    #[arg(short = 's', long)]
    pub shortname: Option<String>,

    /// Query window, isoformat YYYY-MM-DD:YYYY-MM-DD
    #[arg(short = 'd', long)]
    pub daterange: Option<String>,

    /// Harvesters directory of the scrapi checkout
    #[arg(long, default_value = "../scrapi/scrapi/harvesters", env = "HARVESTERS_DIR")]
    pub dir: PathBuf,

    /// Save the provider favicon (reserved, currently inert)
    #[arg(short = 'f', long, default_value_t = false)]
    pub favicon: bool,

    /// Generate the bepress series list (reserved, currently inert)
    #[arg(long, default_value_t = false)]
    pub bepress: bool,
}
