// Ordered fetch demo
//
// Requests every id given on the command line (file1 file2 file3 by default)
// from the simulated provider at once, then prints the responses in request
// order. RUST_LOG controls logging; ORDERED_FETCH_* variables tune delays
// and timeouts.

use anyhow::{Context, Result};
use log::info;

use ordered_fetch::{
    FetchConfig, LineSink, OrderedFetch, RequestBatch, SimulatedProvider, SimulationConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ids: Vec<String> = std::env::args().skip(1).collect();
    let batch = if ids.is_empty() {
        RequestBatch::from(["file1", "file2", "file3"])
    } else {
        ids.into_iter().collect()
    };

    let simulation = SimulationConfig::from_env().context("invalid simulation settings")?;
    let config = FetchConfig::from_env().context("invalid fetch settings")?;

    let provider =
        SimulatedProvider::reference(simulation).context("invalid simulation settings")?;
    let fetcher = OrderedFetch::with_config(provider, config);
    let mut sink = LineSink::stdout();

    let summary = fetcher
        .run(&batch, &mut sink)
        .await
        .context("ordered fetch failed")?;

    info!("Complete! {}", serde_json::to_string(&summary)?);
    Ok(())
}
