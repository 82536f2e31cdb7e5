use std::io::Write;

use irn_core::Trajectory;

use crate::error::ExperimentResult;
use crate::metrics::SurvivalSummary;

/// Two records: the class name, then every survival rate in batch order.
pub(crate) fn write_survival_rates<W: Write>(
    class_name: &str,
    rates: &[f64],
    writer: W,
) -> ExperimentResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    wtr.write_record([class_name])?;
    wtr.write_record(rates.iter().map(|rate| rate.to_string()))?;
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub(crate) fn write_trajectory<W: Write>(trajectory: &Trajectory, writer: W) -> ExperimentResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["step", "susceptible", "infectious", "removed"])?;
    for (step, counts) in trajectory.counts().iter().enumerate() {
        wtr.write_record([
            step.to_string(),
            counts.susceptible.to_string(),
            counts.infectious.to_string(),
            counts.removed.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub(crate) fn write_summaries<W: Write>(
    summaries: &[SurvivalSummary],
    writer: W,
) -> ExperimentResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["network", "runs", "mean", "median", "p10", "p90", "min", "max"])?;
    for (index, summary) in summaries.iter().enumerate() {
        wtr.write_record([
            index.to_string(),
            summary.runs.to_string(),
            summary.mean.to_string(),
            summary.median.to_string(),
            summary.p10.to_string(),
            summary.p90.to_string(),
            summary.min.to_string(),
            summary.max.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
