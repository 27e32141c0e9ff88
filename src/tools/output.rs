use std::fs::File;
use std::path::{Path, PathBuf};

use super::errors::{ScoutError, ScoutResult};
use crate::api_models::ResolvedEntity;

pub const HEADER: [&str; 3] = ["Account Name", "Address", "URL"];

/// Append-only results table.
pub struct ResultsWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows: usize,
}

impl ResultsWriter {
    /// Truncate `path` and write the header row.
    pub fn create(path: &Path) -> ScoutResult<Self> {
        let file = File::create(path)
            .map_err(|e| ScoutError::file_system(e, Some(path.to_path_buf())))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer.write_record(HEADER)?;
        writer
            .flush()
            .map_err(|e| ScoutError::file_system(e, Some(path.to_path_buf())))?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            rows: 0,
        })
    }

    pub fn append(&mut self, result: &ResolvedEntity) -> ScoutResult<()> {
        self.writer.serialize(result)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and return how many data rows were written.
    pub fn finish(mut self) -> ScoutResult<usize> {
        self.writer
            .flush()
            .map_err(|e| ScoutError::file_system(e, Some(self.path.clone())))?;
        Ok(self.rows)
    }
}
