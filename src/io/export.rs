//! CSV export of balance results.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::assets::storage::StorageController;
use crate::sim::balance::BalanceOutcome;
use crate::sim::types::SimGrid;

/// Writes the full per-interval result set to a CSV file.
///
/// One row per interval: index, elapsed hours, the aggregated
/// non-dispatchable series, the final net load, then an output and SoC
/// column per storage controller in merit order. Column names derive from
/// controller names, spaces replaced so downstream tools can use them as
/// identifiers.
pub fn export_csv(
    path: &Path,
    outcome: &BalanceOutcome,
    storage: &[StorageController],
    grid: &SimGrid,
) -> io::Result<()> {
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), outcome, storage, grid)
}

/// Writes the result set to any writer; [`export_csv`] handles files.
pub fn write_csv<W: Write>(
    writer: W,
    outcome: &BalanceOutcome,
    storage: &[StorageController],
    grid: &SimGrid,
) -> io::Result<()> {
    let mut w = csv::Writer::from_writer(writer);

    let mut header = vec![
        "interval".to_string(),
        "time_hr".to_string(),
        "non_dispatchable_kwh".to_string(),
        "net_load_kwh".to_string(),
    ];
    for c in storage {
        let tag = c.name.replace(' ', "_");
        header.push(format!("{tag}_output_kwh"));
        header.push(format!("{tag}_soc_kwh"));
    }
    w.write_record(&header)?;

    for t in 0..grid.intervals() {
        let mut record = vec![
            t.to_string(),
            format!("{:.2}", t as f64 * grid.dt_hours),
            format!("{:.6}", outcome.non_dispatchable_total[t]),
            format!("{:.6}", outcome.net_load[t]),
        ];
        for c in storage {
            record.push(format!("{:.6}", c.output()[t]));
            record.push(format!("{:.6}", c.soc()[t]));
        }
        w.write_record(&record)?;
    }

    w.flush()
}
