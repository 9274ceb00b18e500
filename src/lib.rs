pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::http_engine::HttpEngineClient;
pub use config::{AnalysisConfig, CliConfig};
pub use crate::core::analysis::{run_analysis, AnalysisEngine};
pub use utils::error::{AnalyzerError, Result};
