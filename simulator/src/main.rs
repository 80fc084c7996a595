use anyhow::Context;
use clap::Parser;
use generator::profile::{build_station_input, GeneratorConfig};
use log::info;
use output::model::RunSummary;
use output::writer::{append_report, write_records_to};
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::WorkflowConfig;
use workflow::input::load_stations;
use workflow::runner::Runner;

mod generator;
mod output;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline detection and phase-picking driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Replay pre-computed classifier output (JSON list of stations)
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, default_value_t = 0.5)]
    detection_threshold: f32,
    #[arg(long, default_value_t = 0.2)]
    p_threshold: f32,
    #[arg(long, default_value_t = 0.2)]
    s_threshold: f32,
    /// Fraction of each window re-analysed by the shifted pass; 0 disables it
    #[arg(long, default_value_t = 0.3)]
    overlap: f32,
    /// Number of synthetic stations when no input is given
    #[arg(long, default_value_t = 2)]
    stations: usize,
    /// Windows per synthetic station
    #[arg(long, default_value_t = 10)]
    windows: usize,
    /// Random events per synthetic station
    #[arg(long, default_value_t = 5)]
    events: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write event records here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "tools/data/picking_report.log")]
    report: PathBuf,
    /// Process stations concurrently, one blocking task each
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        let overlap = (args.overlap > 0.0).then_some(args.overlap);
        let config = WorkflowConfig::from_args(
            args.detection_threshold,
            args.p_threshold,
            args.s_threshold,
            overlap,
        );
        config
            .to_picker_config()
            .validate()
            .context("validating command-line configuration")?;
        config
    };

    let stations = if let Some(path) = &args.input {
        load_stations(path)?
    } else {
        (0..args.stations)
            .map(|idx| {
                build_station_input(&GeneratorConfig {
                    station: format!("S{:03}", idx),
                    windows: args.windows,
                    window_length: workflow_config.window_length,
                    random_events: args.events,
                    seed: args.seed + idx as u64,
                    ..Default::default()
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?
    };
    info!("processing {} station(s)", stations.len());

    let runner = Runner::new(workflow_config);
    let results = if args.parallel {
        let runtime = TokioBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("creating runtime for station tasks")?;
        runtime.block_on(runner.run_parallel(stations))?
    } else {
        runner.run_all(&stations)?
    };

    let written = write_records_to(args.output.as_deref(), &results)?;
    let summary = RunSummary::from_results(&results);
    append_report(&args.report, &summary)?;

    eprintln!(
        "Picking run -> stations {}, windows {}, events {}, duplicates suppressed {}",
        summary.stations, summary.windows, written, summary.duplicates
    );

    Ok(())
}
