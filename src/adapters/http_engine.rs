use crate::domain::model::EngineValue;
use crate::domain::ports::{ConfigProvider, EngineConnector, EngineSession};
use crate::utils::error::{AnalyzerError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 統計引擎 HTTP 閘道的客戶端
///
/// 閘道提供三個端點：
/// - `POST {base}/sessions` 開啟會話，回傳 `{"session_id": "..."}`
/// - `POST {base}/sessions/{id}/eval` 求值，body 為 `{"expr": "..."}`
/// - `DELETE {base}/sessions/{id}` 關閉會話
#[derive(Debug, Clone)]
pub struct HttpEngineClient {
    base_url: String,
    timeout: Option<Duration>,
    client: Client,
}

impl HttpEngineClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout: None,
            client: Client::new(),
        }
    }

    /// 以配置埠提供的位址與逾時建立客戶端
    pub fn from_config(config: &impl ConfigProvider) -> Self {
        let client = Self::new(config.engine_url());
        match config.timeout_seconds() {
            Some(seconds) => client.with_timeout_seconds(seconds),
            None => client,
        }
    }

    /// 未設定時請求會無限期等待遠端回應
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout = Some(Duration::from_secs(seconds));
        self
    }

    fn sessions_url(&self) -> String {
        format!("{}/sessions", self.base_url)
    }
}

#[async_trait::async_trait]
impl EngineConnector for HttpEngineClient {
    type Session = HttpEngineSession;

    async fn connect(&self) -> Result<HttpEngineSession> {
        tracing::info!("🚀 Opening session against engine at: {}", self.base_url);

        // 建立會話：此階段的任何失敗都視為連線錯誤
        let mut request = self.client.post(self.sessions_url());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AnalyzerError::ConnectionError {
                message: e.to_string(),
            })?;
        tracing::debug!("Session open response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::ConnectionError {
                message: format!("engine refused session open ({}): {}", status, body.trim()),
            });
        }

        let opened: OpenSessionResponse =
            response
                .json()
                .await
                .map_err(|e| AnalyzerError::ConnectionError {
                    message: format!("malformed session open reply: {}", e),
                })?;

        tracing::info!("✅ Engine session established: {}", opened.session_id);
        Ok(HttpEngineSession {
            session_id: opened.session_id,
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            client: self.client.clone(),
        })
    }
}

/// 一條已開啟的遠端會話，求值共享同一個遠端工作區
#[derive(Debug)]
pub struct HttpEngineSession {
    session_id: String,
    base_url: String,
    timeout: Option<Duration>,
    client: Client,
}

impl HttpEngineSession {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn eval_url(&self) -> String {
        format!("{}/sessions/{}/eval", self.base_url, self.session_id)
    }

    fn session_url(&self) -> String {
        format!("{}/sessions/{}", self.base_url, self.session_id)
    }
}

#[async_trait::async_trait]
impl EngineSession for HttpEngineSession {
    async fn eval(&self, expr: &str) -> Result<EngineValue> {
        tracing::debug!("Evaluating remote expression: {}", expr);

        let mut request = self.client.post(self.eval_url()).json(&EvalRequest { expr });
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        tracing::debug!("Eval response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::EvalError {
                expr: expr.to_string(),
                message: format!("engine returned {}: {}", status, body.trim()),
            });
        }

        let reply: EvalResponse =
            response
                .json()
                .await
                .map_err(|e| AnalyzerError::EvalError {
                    expr: expr.to_string(),
                    message: format!("malformed eval reply: {}", e),
                })?;

        match reply.status.as_str() {
            "ok" => Ok(reply.result.unwrap_or(EngineValue::Null)),
            _ => Err(AnalyzerError::EvalError {
                expr: expr.to_string(),
                message: reply
                    .message
                    .unwrap_or_else(|| "engine reported an unspecified failure".to_string()),
            }),
        }
    }

    async fn close(self) -> Result<()> {
        tracing::debug!("Closing engine session: {}", self.session_id);

        let mut request = self.client.delete(self.session_url());
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AnalyzerError::ConnectionError {
                message: format!(
                    "engine refused session close ({})",
                    response.status()
                ),
            });
        }

        tracing::debug!("Engine session closed: {}", self.session_id);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct EvalRequest<'a> {
    expr: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenSessionResponse {
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct EvalResponse {
    status: String,
    #[serde(default)]
    result: Option<EngineValue>,
    #[serde(default)]
    message: Option<String>,
}
