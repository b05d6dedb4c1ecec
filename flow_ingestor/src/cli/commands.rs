use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::{
    config::{RunConfig, load_run_config_path},
    errors::Error,
    io::sink::{JsonFileSink, ReportSink, StdoutSink},
    providers::{vandatrack::VandaTrackProvider, yahoo::YahooChartProvider},
    runner::AnalysisRunner,
};
use flow_signals::config::NormalizationReport;

#[derive(Serialize)]
struct ConfigCheck<'a> {
    config: &'a RunConfig,
    normalization: &'a NormalizationReport,
}

pub async fn report(config: &Path, out: Option<&Path>) -> Result<(), Error> {
    let (cfg, _) = load_run_config_path(config).map_err(Error::Config)?;

    let flow = VandaTrackProvider::new(&cfg.fetch)?;
    let prices = YahooChartProvider::new(&cfg.fetch)?;
    let mut runner = AnalysisRunner::new(flow, prices, cfg.filters);
    let output = runner.run(cfg.analysis).await?;

    match out {
        Some(path) => {
            let written = JsonFileSink::new(path).write(&output).await?;
            info!(path = %written.display(), "report written");
        }
        None => StdoutSink.write(&output).await?,
    }
    Ok(())
}

pub fn check_config(config: &Path) -> Result<(), Error> {
    let (cfg, report) = load_run_config_path(config).map_err(Error::Config)?;
    let check = ConfigCheck {
        config: &cfg,
        normalization: &report,
    };
    let text = serde_json::to_string_pretty(&check)
        .map_err(|e| Error::Config(anyhow::Error::new(e)))?;
    println!("{text}");
    Ok(())
}
