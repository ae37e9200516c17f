use anyhow::{Context, Result};
use flock_common::StepSnapshot;
use log::{error, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes recorded snapshots next to `base` in the requested format:
/// "json", "bincode" or "messagepack". Unknown formats fall back to JSON.
pub fn write_snapshots(snapshots: &[StepSnapshot], base: &str, format: Option<&str>) -> Result<PathBuf> {
    match format.unwrap_or("json") {
        "json" => write_json(snapshots, base),
        "bincode" => {
            // Binary format (much more compact)
            let path = PathBuf::from(format!("{}_snapshots.bin", base));
            let mut writer = create(&path)?;
            bincode::serialize_into(&mut writer, snapshots)
                .with_context(|| format!("Error serializing snapshots to bincode '{}'", path.display()))?;
            writer.flush()?;
            info!("All snapshots saved to {} (binary format)", path.display());
            Ok(path)
        }
        "messagepack" => {
            let path = PathBuf::from(format!("{}_snapshots.msgpack", base));
            let mut writer = create(&path)?;
            rmp_serde::encode::write(&mut writer, snapshots)
                .with_context(|| format!("Error serializing snapshots to MessagePack '{}'", path.display()))?;
            writer.flush()?;
            info!("All snapshots saved to {} (MessagePack format)", path.display());
            Ok(path)
        }
        other => {
            error!("Unknown output format: {}. Using JSON instead.", other);
            write_json(snapshots, base)
        }
    }
}

fn write_json(snapshots: &[StepSnapshot], base: &str) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_snapshots.json", base));
    let mut writer = create(&path)?;
    serde_json::to_writer(&mut writer, snapshots)
        .with_context(|| format!("Error serializing snapshots to JSON '{}'", path.display()))?;
    writer.flush()?;
    info!("All snapshots saved to {}", path.display());
    Ok(path)
}

/// Writes the per-step cluster counts as `step,cluster_count` rows for an external chart.
pub fn write_cluster_series(series: &[(u64, usize)], base: &str) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}_clusters.csv", base));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Error creating CSV file '{}'", path.display()))?;
    writer.write_record(["step", "cluster_count"])?;
    for (step, count) in series {
        writer.write_record([step.to_string(), count.to_string()])?;
    }
    writer.flush()?;
    info!("Cluster series ({} steps) saved to {}", series.len(), path.display());
    Ok(path)
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Error creating snapshot file '{}'", path.display()))?;
    Ok(BufWriter::new(file))
}
