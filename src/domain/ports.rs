use crate::domain::model::EngineValue;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 遠端統計引擎的連線工廠
#[async_trait]
pub trait EngineConnector: Send + Sync {
    type Session: EngineSession;

    async fn connect(&self) -> Result<Self::Session>;
}

/// 一條已開啟的引擎會話：求值與關閉
///
/// `close` 取走所有權，關閉後的會話無法再被使用。
#[async_trait]
pub trait EngineSession: Send {
    async fn eval(&self, expr: &str) -> Result<EngineValue>;

    async fn close(self) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn engine_url(&self) -> &str;
    fn dataset_url(&self) -> &str;
    fn year_column(&self) -> &str;
    fn party_unity_column(&self) -> &str;
    fn near_unanimous_column(&self) -> &str;
    fn timeout_seconds(&self) -> Option<u64>;
}
