use clap::Parser;
use routetree::cli::{run_cli, Cli};
use routetree::config::RouteTreeConfig;
use routetree::telemetry::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_env())?;
    let config = RouteTreeConfig::from_env();
    run_cli(&cli, &config, &mut std::io::stdout().lock())
}
