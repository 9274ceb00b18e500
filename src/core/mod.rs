pub mod analysis;
pub mod collector;
pub mod narrator;
pub mod regression;

pub use crate::domain::model::{AnalysisReport, EngineValue, PromptOutcome, YearEffect, YearPair};
pub use crate::domain::ports::{ConfigProvider, EngineConnector, EngineSession};
pub use crate::utils::error::Result;
