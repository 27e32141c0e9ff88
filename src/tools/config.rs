use std::path::PathBuf;

use super::errors::{ScoutError, ScoutResult};

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";
pub const DEFAULT_INPUT: &str = "assignment.xlsx";
pub const DEFAULT_OUTPUT: &str = "results.csv";
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Settings for the search-page harvester
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub search_url: String,
    pub user_agent: String,
    /// No timeout unless set.
    pub timeout_seconds: Option<u64>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            timeout_seconds: None,
        }
    }
}

/// Settings for one enrichment run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub max_concurrency: usize,
    pub show_progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            max_concurrency: DEFAULT_CONCURRENCY,
            show_progress: true,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> ScoutResult<()> {
        if self.max_concurrency == 0 {
            return Err(ScoutError::invalid_config(
                "concurrency",
                "must allow at least one entity in flight",
            ));
        }
        if self.input_path == self.output_path {
            return Err(ScoutError::invalid_config(
                "output",
                "output path would overwrite the input spreadsheet",
            ));
        }
        Ok(())
    }
}
