use std::fs::File;
use std::path::Path;

use crate::error::{ExperimentError, ExperimentResult};

pub(crate) fn ensure_not_empty<T>(items: &[T], what: &str) -> ExperimentResult<()> {
    if items.is_empty() {
        return Err(ExperimentError::Config(format!("no {what} to export")));
    }

    Ok(())
}

pub(crate) fn create_output_file(path: impl AsRef<Path>) -> ExperimentResult<File> {
    let path = path.as_ref();
    File::create(path).map_err(|source| ExperimentError::io(path, source))
}
