pub mod toml_config;

use crate::domain::model::YearPair;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_required_field, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use toml_config::FileConfig;

/// 引擎閘道預設跑在 Rserve 的慣用埠
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:6311";
pub const DEFAULT_DATASET_URL: &str =
    "https://austinclemens.com/rohde_rollcalls/house_votes.csv";

const DEFAULT_YEAR_COLUMN: &str = "year";
const DEFAULT_PARTY_UNITY_COLUMN: &str = "v16";
const DEFAULT_NEAR_UNANIMOUS_COLUMN: &str = "v18";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "polarization-analyzer")]
#[command(about = "Compares House of Representatives polarization between two years")]
pub struct CliConfig {
    #[arg(long, help = "Base URL of the statistical engine gateway")]
    pub engine_url: Option<String>,

    #[arg(long, help = "URL of the roll-call vote dataset")]
    pub dataset_url: Option<String>,

    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "First year to compare (requires --year2, skips the prompts)")]
    pub year1: Option<i32>,

    #[arg(long, help = "Second year to compare (requires --year1, skips the prompts)")]
    pub year2: Option<i32>,

    #[arg(long, help = "Identifier used in logs for this run")]
    pub execution_id: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 兩個年份旗標都給定時跳過互動輸入，只給一個視為配置錯誤
    pub fn preset_years(&self) -> Result<Option<YearPair>> {
        if self.year1.is_none() && self.year2.is_none() {
            return Ok(None);
        }

        let year1 = *validate_required_field("year1", &self.year1)?;
        let year2 = *validate_required_field("year2", &self.year2)?;
        Ok(Some(YearPair::new(year1, year2)?))
    }
}

/// 解析完成的執行配置：預設值 ← TOML 檔 ← 命令列旗標
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub engine_url: String,
    pub dataset_url: String,
    pub year_column: String,
    pub party_unity_column: String,
    pub near_unanimous_column: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            engine_url: DEFAULT_ENGINE_URL.to_string(),
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            year_column: DEFAULT_YEAR_COLUMN.to_string(),
            party_unity_column: DEFAULT_PARTY_UNITY_COLUMN.to_string(),
            near_unanimous_column: DEFAULT_NEAR_UNANIMOUS_COLUMN.to_string(),
            timeout_seconds: None,
        }
    }
}

impl AnalysisConfig {
    pub fn resolve(cli: &CliConfig, file: Option<FileConfig>) -> Self {
        let mut config = Self::default();

        if let Some(file) = file {
            if let Some(engine) = file.engine {
                if let Some(url) = engine.url {
                    config.engine_url = url;
                }
                if engine.timeout_seconds.is_some() {
                    config.timeout_seconds = engine.timeout_seconds;
                }
            }
            if let Some(dataset) = file.dataset {
                if let Some(url) = dataset.url {
                    config.dataset_url = url;
                }
                if let Some(column) = dataset.year_column {
                    config.year_column = column;
                }
                if let Some(column) = dataset.party_unity_column {
                    config.party_unity_column = column;
                }
                if let Some(column) = dataset.near_unanimous_column {
                    config.near_unanimous_column = column;
                }
            }
        }

        // 命令列旗標優先於檔案
        if let Some(url) = &cli.engine_url {
            config.engine_url = url.clone();
        }
        if let Some(url) = &cli.dataset_url {
            config.dataset_url = url.clone();
        }

        config
    }
}

impl ConfigProvider for AnalysisConfig {
    fn engine_url(&self) -> &str {
        &self.engine_url
    }

    fn dataset_url(&self) -> &str {
        &self.dataset_url
    }

    fn year_column(&self) -> &str {
        &self.year_column
    }

    fn party_unity_column(&self) -> &str {
        &self.party_unity_column
    }

    fn near_unanimous_column(&self) -> &str {
        &self.near_unanimous_column
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for AnalysisConfig {
    fn validate(&self) -> Result<()> {
        validate_url("engine_url", &self.engine_url)?;
        validate_url("dataset_url", &self.dataset_url)?;
        validate_non_empty_string("year_column", &self.year_column)?;
        validate_non_empty_string("party_unity_column", &self.party_unity_column)?;
        validate_non_empty_string("near_unanimous_column", &self.near_unanimous_column)?;
        Ok(())
    }
}
