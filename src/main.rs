use anyhow::{Context, Result};
use ppa_report::{run, ReportConfig, TextRenderer};
use std::path::PathBuf;

/// Environment variable naming the configuration file.
const CONFIG_VARIABLE: &str = "PPA_REPORT_CONFIG";

/// Configuration file looked up in the working directory by default.
const DEFAULT_CONFIG_FILE: &str = "ppa_report.json";

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::var_os(CONFIG_VARIABLE)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = ReportConfig::load(&path)?;

    let stdout = std::io::stdout();
    let mut renderer = TextRenderer::new(stdout.lock());
    let table = run(&config, &mut renderer)
        .with_context(|| format!("Build report from '{}'", config.market_file.display()))?;
    log::info!("report has {} row(s)", table.row_count());
    Ok(())
}
