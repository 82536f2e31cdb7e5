//! Result export.
//!
//! The survival CSV keeps the historical two-record layout (class name, then
//! all rates) so existing analysis notebooks keep working.

use std::path::Path;

use irn_core::Trajectory;

use crate::error::ExperimentResult;
use crate::metrics::SurvivalSummary;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Write survival rates as `class_name` on the first line and every rate on
/// the second.
///
/// # Errors
///
/// Returns an error if `rates` is empty or the file cannot be written.
pub fn write_survival_csv(
    path: impl AsRef<Path>,
    class_name: &str,
    rates: &[f64],
) -> ExperimentResult<()> {
    writer_utils::ensure_not_empty(rates, "survival rates")?;
    let file = writer_utils::create_output_file(path)?;
    csv::write_survival_rates(class_name, rates, file)
}

/// Write per-step compartment counts of one run as
/// `step,susceptible,infectious,removed`.
pub fn write_trajectory_csv(path: impl AsRef<Path>, trajectory: &Trajectory) -> ExperimentResult<()> {
    let file = writer_utils::create_output_file(path)?;
    csv::write_trajectory(trajectory, file)
}

/// Write one row of summary statistics per network.
pub fn write_summary_csv(
    path: impl AsRef<Path>,
    summaries: &[SurvivalSummary],
) -> ExperimentResult<()> {
    writer_utils::ensure_not_empty(summaries, "summaries")?;
    let file = writer_utils::create_output_file(path)?;
    csv::write_summaries(summaries, file)
}
