use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::validate_range;
use serde::{Deserialize, Serialize};

/// 資料集涵蓋 1953–2024 年的眾議院點名投票
pub const DATASET_FIRST_YEAR: i32 = 1953;
pub const DATASET_LAST_YEAR: i32 = 2024;

/// 一組已驗證的比較年份，恆有 year1 < year2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearPair {
    pub year1: i32,
    pub year2: i32,
}

impl YearPair {
    pub fn new(year1: i32, year2: i32) -> Result<Self> {
        validate_range("year1", year1, DATASET_FIRST_YEAR, DATASET_LAST_YEAR - 1)?;
        validate_range("year2", year2, year1 + 1, DATASET_LAST_YEAR)?;
        Ok(Self { year1, year2 })
    }
}

/// 輸入收集的結果：一組年份，或使用者要求離開
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    Years(YearPair),
    Quit,
}

/// 遠端引擎單次求值回傳的型別化結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EngineValue {
    Null,
    Double(f64),
    #[serde(rename = "string_array")]
    Strings(Vec<String>),
}

impl EngineValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            EngineValue::Null => "null",
            EngineValue::Double(_) => "double",
            EngineValue::Strings(_) => "string_array",
        }
    }

    pub fn into_f64(self, expr: &str) -> Result<f64> {
        match self {
            EngineValue::Double(v) => Ok(v),
            other => Err(AnalyzerError::MismatchError {
                expr: expr.to_string(),
                expected: "double",
                actual: other.type_name(),
            }),
        }
    }

    pub fn into_strings(self, expr: &str) -> Result<Vec<String>> {
        match self {
            EngineValue::Strings(v) => Ok(v),
            other => Err(AnalyzerError::MismatchError {
                expr: expr.to_string(),
                expected: "string_array",
                actual: other.type_name(),
            }),
        }
    }
}

/// 年份項係數的顯著性數值，原樣取自遠端模型
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearEffect {
    pub p_value: f64,
    pub t_value: f64,
}

/// 一次完整分析要輸出的所有內容
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub summary_lines: Vec<String>,
    pub effect: YearEffect,
    pub sentence: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_pair_accepts_full_range() {
        assert!(YearPair::new(1953, 1954).is_ok());
        assert!(YearPair::new(1953, 2024).is_ok());
        assert!(YearPair::new(2023, 2024).is_ok());
    }

    #[test]
    fn test_year_pair_rejects_out_of_range() {
        assert!(YearPair::new(1952, 1960).is_err());
        assert!(YearPair::new(2024, 2024).is_err());
        assert!(YearPair::new(1960, 1960).is_err());
        assert!(YearPair::new(1960, 1955).is_err());
        assert!(YearPair::new(1960, 2025).is_err());
    }

    #[test]
    fn test_engine_value_deserializes_tagged_payloads() {
        let double: EngineValue = serde_json::from_str(r#"{"type":"double","value":0.003}"#).unwrap();
        assert_eq!(double, EngineValue::Double(0.003));

        let strings: EngineValue =
            serde_json::from_str(r#"{"type":"string_array","value":["Call:","lm(...)"]}"#).unwrap();
        assert_eq!(
            strings,
            EngineValue::Strings(vec!["Call:".to_string(), "lm(...)".to_string()])
        );

        let null: EngineValue = serde_json::from_str(r#"{"type":"null"}"#).unwrap();
        assert_eq!(null, EngineValue::Null);
    }

    #[test]
    fn test_engine_value_accessors_check_shape() {
        assert_eq!(EngineValue::Double(1.5).into_f64("x").unwrap(), 1.5);

        let err = EngineValue::Strings(vec![]).into_f64("coef").unwrap_err();
        assert!(err.to_string().contains("expected double"));

        let err = EngineValue::Null.into_strings("summary").unwrap_err();
        assert!(err.to_string().contains("expected string_array"));
    }
}
