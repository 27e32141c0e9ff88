pub mod config;
pub mod errors;
pub mod logging;
pub mod matching;
pub mod output;
pub mod spreadsheet;
pub mod web_search;

// Re-export commonly used items
pub use config::{HarvestConfig, RunConfig};
pub use errors::{ScoutError, ScoutResult};
pub use matching::select_best_url;
pub use output::ResultsWriter;
pub use spreadsheet::read_entities;
pub use web_search::{harvest_entity, LinkSource, SearchHarvester};
