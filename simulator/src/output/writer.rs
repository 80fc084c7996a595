use crate::output::model::RunSummary;
use crate::workflow::runner::StationResult;
use anyhow::Context;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes every record as one JSON object per line, stations in result order.
pub fn write_records<W: Write>(out: W, results: &[StationResult]) -> anyhow::Result<usize> {
    let mut out = BufWriter::new(out);
    let mut written = 0;
    for result in results {
        for record in &result.records {
            serde_json::to_writer(&mut out, record)
                .with_context(|| format!("serializing record for {}", result.station))?;
            out.write_all(b"\n")?;
            written += 1;
        }
    }
    out.flush().context("flushing event records")?;
    Ok(written)
}

pub fn write_records_to(path: Option<&Path>, results: &[StationResult]) -> anyhow::Result<usize> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = File::create(path)
                .with_context(|| format!("creating record output {}", path.display()))?;
            write_records(file, results)
        }
        None => write_records(io::stdout().lock(), results),
    }
}

pub fn append_report(path: &Path, summary: &RunSummary) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    file.write_all(summary.report_line().as_bytes())?;
    Ok(())
}
