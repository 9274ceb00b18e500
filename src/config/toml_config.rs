use crate::utils::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TOML 配置檔，所有欄位皆可省略，留空的部分使用內建預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub engine: Option<EngineSection>,
    pub dataset: Option<DatasetSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSection {
    pub url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetSection {
    pub url: Option<String>,
    pub year_column: Option<String>,
    pub party_unity_column: Option<String>,
    pub near_unanimous_column: Option<String>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalyzerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalyzerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ENGINE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[engine]
url = "http://r-gateway.internal:8000"
timeout_seconds = 30

[dataset]
url = "https://example.com/votes.csv"
year_column = "year"
party_unity_column = "v16"
near_unanimous_column = "v18"
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();

        let engine = config.engine.unwrap();
        assert_eq!(engine.url.as_deref(), Some("http://r-gateway.internal:8000"));
        assert_eq!(engine.timeout_seconds, Some(30));

        let dataset = config.dataset.unwrap();
        assert_eq!(dataset.url.as_deref(), Some("https://example.com/votes.csv"));
        assert_eq!(dataset.party_unity_column.as_deref(), Some("v16"));
    }

    #[test]
    fn test_partial_config_leaves_other_sections_unset() {
        let config = FileConfig::from_toml_str("[engine]\nurl = \"http://localhost:9000\"\n").unwrap();

        assert_eq!(
            config.engine.unwrap().url.as_deref(),
            Some("http://localhost:9000")
        );
        assert!(config.dataset.is_none());

        let empty = FileConfig::from_toml_str("").unwrap();
        assert!(empty.engine.is_none());
        assert!(empty.dataset.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_ENGINE_URL", "http://substituted:6311");

        let toml_content = r#"
[engine]
url = "${TEST_ENGINE_URL}"
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.engine.unwrap().url.as_deref(),
            Some("http://substituted:6311")
        );

        std::env::remove_var("TEST_ENGINE_URL");
    }

    #[test]
    fn test_unset_env_var_is_left_verbatim() {
        let toml_content = r#"
[dataset]
url = "${POLARIZATION_UNSET_VAR}"
"#;

        let config = FileConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.dataset.unwrap().url.as_deref(),
            Some("${POLARIZATION_UNSET_VAR}")
        );
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = FileConfig::from_toml_str("[engine\nurl = ").unwrap_err();
        assert!(err.to_string().contains("TOML parsing error"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[dataset]
year_column = "congress_year"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = FileConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.dataset.unwrap().year_column.as_deref(),
            Some("congress_year")
        );
    }
}
