use crate::domain::model::{YearEffect, YearPair};
use crate::domain::ports::{ConfigProvider, EngineSession};
use crate::utils::error::Result;

/// 重新命名後的語意欄位，模型公式固定使用這兩個名稱
const PARTY_UNITY_VOTE: &str = "party_unity_vote";
const NEAR_UNANIMOUS: &str = "near_unanimous";

const FIT_MODEL_EXPR: &str =
    "model <- lm(party_unity_vote ~ is_year1 + near_unanimous, data = subset)";
const SUMMARY_EXPR: &str = "capture.output(summary(model))";

// 係數列序為截距、is_year1、near_unanimous；第 2 列就是年份指標
const P_VALUE_EXPR: &str = "summary(model)$coefficients[2,4]";
const T_VALUE_EXPR: &str = "summary(model)$coefficients[2,3]";

/// 對已開啟的會話送出固定順序的建模指令並取回結果
///
/// Every step failure aborts the run; there is no per-step retry. The
/// returned scalars are used exactly as the engine reported them.
pub struct RegressionRunner<'a, C: ConfigProvider> {
    config: &'a C,
    years: YearPair,
}

impl<'a, C: ConfigProvider> RegressionRunner<'a, C> {
    pub fn new(config: &'a C, years: YearPair) -> Self {
        Self { config, years }
    }

    pub async fn run<S: EngineSession>(&self, session: &S) -> Result<(Vec<String>, YearEffect)> {
        let YearPair { year1, year2 } = self.years;
        tracing::info!("📊 Fitting polarization model for {} vs {}", year1, year2);

        // 載入資料集並把原始欄位改為語意名稱
        session
            .eval(&load_dataset_expr(self.config.dataset_url()))
            .await?;
        session
            .eval(&rename_column_expr(
                self.config.party_unity_column(),
                PARTY_UNITY_VOTE,
            ))
            .await?;
        session
            .eval(&rename_column_expr(
                self.config.near_unanimous_column(),
                NEAR_UNANIMOUS,
            ))
            .await?;

        // 篩出兩個年份，並加上標記較早年份的指標欄
        session
            .eval(&filter_years_expr(self.config.year_column(), self.years))
            .await?;
        session
            .eval(&year_indicator_expr(self.config.year_column(), year1))
            .await?;

        session.eval(FIT_MODEL_EXPR).await?;
        tracing::debug!("Model fitted, retrieving summary");

        let summary_lines = session
            .eval(SUMMARY_EXPR)
            .await?
            .into_strings(SUMMARY_EXPR)?;

        let p_value = session.eval(P_VALUE_EXPR).await?.into_f64(P_VALUE_EXPR)?;
        let t_value = session.eval(T_VALUE_EXPR).await?.into_f64(T_VALUE_EXPR)?;

        tracing::info!("✅ Regression complete: p = {}, t = {}", p_value, t_value);
        Ok((summary_lines, YearEffect { p_value, t_value }))
    }
}

fn load_dataset_expr(dataset_url: &str) -> String {
    format!("df <- read.csv('{}');", escape_r_string(dataset_url))
}

fn rename_column_expr(raw_name: &str, semantic_name: &str) -> String {
    format!(
        "colnames(df)[colnames(df) == '{}'] <- '{}'",
        escape_r_string(raw_name),
        escape_r_string(semantic_name)
    )
}

fn filter_years_expr(year_column: &str, years: YearPair) -> String {
    format!(
        "subset <- subset(df, {col} == {} | {col} == {})",
        years.year1,
        years.year2,
        col = year_column
    )
}

fn year_indicator_expr(year_column: &str, year1: i32) -> String {
    format!(
        "subset$is_year1 <- ifelse(subset${} == {}, 1, 0)",
        year_column, year1
    )
}

// 單引號 R 字串字面值的跳脫，反斜線要先處理
fn escape_r_string(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('\'', "\\'")
}
