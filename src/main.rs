use anyhow::Result;
use clap::Parser;
use flock_common::FlockConfig;
use flock_engine::output::{write_cluster_series, write_snapshots};
use flock_engine::FlockSimulation;
use log::{debug, error, info, trace};
use std::path::PathBuf;
use std::time::Instant;

/// Command-line arguments for the flock engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulation config file (.toml)
    #[arg(default_value = "config.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize the logger
    env_logger::init();

    info!("Starting Flock Engine...");

    // --- Load Configuration ---
    let config = FlockConfig::load(&args.config)?;
    info!("Loaded configuration from {}.", args.config.display());
    info!("Using {} Rayon threads.", rayon::current_num_threads());

    // --- Initialize Simulation ---
    let mut sim = FlockSimulation::new(config)?;
    debug!("Steering Parameters: {:#?}", sim.params());

    let total_steps = sim.config().run.steps;
    let record_interval = sim.config().run.record_interval.max(1);
    info!("Recording snapshot every {} steps.", record_interval);

    info!("Starting simulation loop for {} steps...", total_steps);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;
    let mut cluster_series = Vec::with_capacity(total_steps as usize + 1);

    // --- Initial Snapshot (step = 0) ---
    sim.record_snapshot();
    cluster_series.push((0, sim.last_cluster().count));

    for step in 0..total_steps {
        let step_start_time = Instant::now();
        let report = sim.step();
        let step_duration = step_start_time.elapsed();
        cluster_series.push((report.step, report.cluster.count));

        let current_time = Instant::now();
        let print_interval_secs = 5.0;
        let should_print_status = current_time.duration_since(previous_print_time).as_secs_f64() >= print_interval_secs;
        let is_record_step = report.step % record_interval == 0;
        let is_last_step = step == total_steps - 1;

        if is_record_step || is_last_step {
            sim.record_snapshot();
        }

        if should_print_status || is_last_step {
            info!(
                "Step [{}/{}] | Clusters: {} | Noise: {} | Step Time: {:6.2} ms | Elapsed: {:.2} s",
                report.step,
                total_steps,
                report.cluster.count,
                report.cluster.noise_count(),
                step_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = current_time;
        } else {
            trace!(
                "Step [{}/{}] completed in {:.2} ms",
                report.step,
                total_steps,
                step_duration.as_secs_f64() * 1000.0
            );
        }
    }

    info!("Simulation finished in {:.3} seconds.", start_time.elapsed().as_secs_f64());

    // --- Save Recorded Data ---
    let output = sim.config().output.clone();
    if output.save_snapshots {
        if let Err(e) = write_snapshots(sim.recorded_snapshots(), &output.base_filename, output.format.as_deref()) {
            error!("Error saving snapshots: {:#}", e);
        }
    } else {
        info!("Skipping saving snapshots as per config (save_snapshots is false).");
    }

    if output.save_cluster_series {
        if let Err(e) = write_cluster_series(&cluster_series, &output.base_filename) {
            error!("Error saving cluster series: {:#}", e);
        }
    } else {
        info!("Skipping saving cluster series as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}
