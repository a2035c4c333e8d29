use anyhow::Context;
use chrono::Local;
use clap::Parser;
use conecore::chart::{generate_chart_name, ChartLibrary};
use conecore::session::TagOutcome;
use generator::walk::build_walk;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use gui_bridge::model::VisualizationModel;
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use storage::{DirectoryFiles, DirectoryStorage};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod storage;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Autocross course walk simulator and chart tool")]
struct Args {
    /// Walk a simulated course, save it as a chart and print the plot summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rotation: f64,
    #[arg(long, default_value_t = 5.0)]
    threshold: f64,
    /// Seed for the simulated walk
    #[arg(long)]
    seed: Option<u64>,
    /// Name for the saved chart (defaults to a timestamp)
    #[arg(long)]
    name: Option<String>,
    /// Print every stored chart
    #[arg(long, default_value_t = false)]
    list: bool,
    /// Delete the stored chart at this index
    #[arg(long)]
    delete: Option<usize>,
    /// Export the stored chart at this index as <name>.json
    #[arg(long)]
    export: Option<usize>,
    /// Export every stored chart into one file
    #[arg(long, default_value_t = false)]
    export_all: bool,
    /// Import a single exported chart file into the library
    #[arg(long)]
    import: Option<PathBuf>,
    /// Keep the GUI bridge alive for the plot viewer
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.zoom, args.rotation, args.threshold)
    };
    if let Some(seed) = args.seed {
        workflow_config.walk.seed = seed;
    }

    let storage = DirectoryStorage::new(&workflow_config.storage_dir);
    let library = Arc::new(RwLock::new(ChartLibrary::new(storage)));
    let runner = Runner::new(workflow_config.clone());
    let gui_bridge = GuiBridge::new(Arc::new(runner.clone()), library.clone());
    let mut files = DirectoryFiles::new(&workflow_config.export_dir);

    if let Some(path) = args.import {
        let mut picker = files.clone().with_import(&path);
        let chart = library
            .write()
            .map_err(|_| anyhow::anyhow!("chart library lock poisoned"))?
            .import(&mut picker)
            .with_context(|| format!("importing chart from {}", path.display()))?;
        println!("Chart successfully loaded: {}", chart.name);
    }

    if args.offline {
        let steps = build_walk(&workflow_config.walk)?;
        let chart_name = args
            .name
            .clone()
            .unwrap_or_else(|| generate_chart_name(&Local::now()));
        let result = runner.execute(&steps, &chart_name)?;

        println!(
            "Offline walk -> tagged {}, rejected {}, plotted {}",
            result.counters.tagged,
            result.counters.rejected,
            result.plotted.len()
        );
        for (attempt, outcome) in result.outcomes.iter().enumerate() {
            match outcome {
                TagOutcome::Tagged(_) => {}
                TagOutcome::AccuracyRejected {
                    accuracy_m,
                    threshold_m,
                } => println!(
                    "  attempt {}: accuracy {:.1} m over {:.1} m, retaken",
                    attempt + 1,
                    accuracy_m,
                    threshold_m
                ),
                other => println!("  attempt {}: not tagged ({:?})", attempt + 1, other),
            }
        }

        let (index, charts) = {
            let mut guard = library
                .write()
                .map_err(|_| anyhow::anyhow!("chart library lock poisoned"))?;
            let index = guard.save(result.chart.clone()).context("saving chart")?;
            (index, guard.summaries()?)
        };
        println!("Saved {} as chart {}", result.chart.name, index + 1);

        let model = VisualizationModel::new(result.chart.clone(), result.plotted.clone(), charts)
            .with_location(result.last_location);
        gui_bridge.publish(&model)?;
        gui_bridge.publish_status("Offline walk results ready.");

        let report = format!(
            "chart={} tagged={} rejected={} cones={} rotation={}\n",
            result.chart.name,
            result.counters.tagged,
            result.counters.rejected,
            result.chart.cone_data.len(),
            result.chart.rotation_angle
        );
        let report_path = workflow_config.storage_dir.join("walk_report.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening {}", report_path.display()))?;
        file.write_all(report.as_bytes())?;
    }

    {
        let mut guard = library
            .write()
            .map_err(|_| anyhow::anyhow!("chart library lock poisoned"))?;

        if let Some(index) = args.delete {
            let removed = guard
                .delete(index)
                .with_context(|| format!("deleting chart {}", index))?;
            println!("Deleted chart {}", removed.name);
        }

        if let Some(index) = args.export {
            let file_name = guard
                .export(index, &mut files)
                .with_context(|| format!("exporting chart {}", index))?;
            println!(
                "Chart exported to {}",
                files.export_dir().join(file_name).display()
            );
        }

        if args.export_all {
            match guard.export_all(&mut files).context("exporting charts")? {
                Some(file_name) => println!(
                    "Charts successfully exported to: {}",
                    files.export_dir().join(file_name).display()
                ),
                None => println!("No charts available to export."),
            }
        }

        if args.list {
            let summaries = guard.summaries().context("listing charts")?;
            if summaries.is_empty() {
                println!("No charts found.");
            }
            for (index, summary) in summaries.iter().enumerate() {
                println!("Chart {}: {}", index + 1, summary);
            }
        }
    }

    if args.serve {
        let address = gui_bind_address();
        gui_bridge.serve(address);
        info!("bridge listening on {}", address);
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
