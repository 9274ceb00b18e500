use crate::core::collector::YearCollector;
use crate::core::narrator::narrate;
use crate::core::regression::RegressionRunner;
use crate::domain::model::{AnalysisReport, PromptOutcome, YearPair};
use crate::domain::ports::{ConfigProvider, EngineConnector, EngineSession};
use crate::utils::error::Result;
use std::io::{BufRead, Write};
use std::time::Instant;

/// 單次分析的協調者：開會話、跑迴歸、敘述結果
pub struct AnalysisEngine<E: EngineConnector, C: ConfigProvider> {
    connector: E,
    config: C,
    execution_id: String,
}

impl<E: EngineConnector, C: ConfigProvider> AnalysisEngine<E, C> {
    pub fn new(connector: E, config: C, execution_id: String) -> Self {
        Self {
            connector,
            config,
            execution_id,
        }
    }

    /// 執行一次完整分析
    ///
    /// The session is released on every exit path. A close failure is
    /// logged and never masks a run error.
    pub async fn analyze(&self, years: YearPair) -> Result<AnalysisReport> {
        let started = Instant::now();
        tracing::info!(
            "🚀 Analysis {} started: {} vs {}",
            self.execution_id,
            years.year1,
            years.year2
        );

        let session = self.connector.connect().await?;

        // 先保留執行結果，再無條件關閉會話
        let run_result = RegressionRunner::new(&self.config, years).run(&session).await;
        if let Err(close_err) = session.close().await {
            tracing::warn!("Engine session close failed: {}", close_err);
        }
        let (summary_lines, effect) = run_result?;

        let sentence = narrate(effect, years);
        tracing::info!(
            "✅ Analysis {} complete (duration: {:?})",
            self.execution_id,
            started.elapsed()
        );

        Ok(AnalysisReport {
            summary_lines,
            effect,
            sentence,
        })
    }
}

/// 組合輸入收集與分析流程，所有使用者可見輸出都寫進 `writer`
///
/// `years` carries pre-validated years from the command line; when it is
/// `None` the interactive collector runs first. Returns `Ok(None)` when
/// the user quit, in which case no engine session was ever opened.
pub async fn run_analysis<R, W, E, C>(
    reader: R,
    writer: &mut W,
    years: Option<YearPair>,
    engine: &AnalysisEngine<E, C>,
) -> Result<Option<AnalysisReport>>
where
    R: BufRead,
    W: Write,
    E: EngineConnector,
    C: ConfigProvider,
{
    let years = match years {
        Some(pair) => pair,
        None => {
            print_banner(writer)?;
            let mut collector = YearCollector::new(reader, &mut *writer);
            match collector.collect_years()? {
                PromptOutcome::Years(pair) => pair,
                PromptOutcome::Quit => return Ok(None),
            }
        }
    };

    writeln!(writer, "Calculating regression. Please wait...")?;
    writer.flush()?;

    let report = engine.analyze(years).await?;

    // 模型摘要逐行原樣輸出，結尾附上一句話的解讀
    for line in &report.summary_lines {
        writeln!(writer, "{}", line)?;
    }
    writeln!(writer, "{}", report.sentence)?;
    writer.flush()?;

    Ok(Some(report))
}

fn print_banner<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        "Welcome to the House of Representatives Polarization Analyzer!"
    )?;
    writeln!(
        writer,
        "Please enter two years between 1953 and 2024 to compare polarization levels."
    )?;
    writeln!(
        writer,
        "The first year must precede the second, so you cannot start with 2024."
    )?;
    writeln!(writer, "Type 'q' at any point to exit the program.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::domain::model::EngineValue;
    use crate::utils::error::AnalyzerError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct MockConnector {
        replies: Mutex<Option<Vec<Result<EngineValue>>>>,
        connects: AtomicUsize,
        closed: Arc<AtomicBool>,
        close_fails: bool,
    }

    impl MockConnector {
        fn with_replies(replies: Vec<Result<EngineValue>>) -> Self {
            Self {
                replies: Mutex::new(Some(replies)),
                connects: AtomicUsize::new(0),
                closed: Arc::new(AtomicBool::new(false)),
                close_fails: false,
            }
        }

        fn failing_close(mut self) -> Self {
            self.close_fails = true;
            self
        }
    }

    #[async_trait::async_trait]
    impl EngineConnector for MockConnector {
        type Session = MockSession;

        async fn connect(&self) -> Result<MockSession> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            let replies = self.replies.lock().unwrap().take().unwrap_or_default();
            Ok(MockSession {
                replies: Mutex::new(replies.into_iter().collect()),
                closed: self.closed.clone(),
                close_fails: self.close_fails,
            })
        }
    }

    struct MockSession {
        replies: Mutex<VecDeque<Result<EngineValue>>>,
        closed: Arc<AtomicBool>,
        close_fails: bool,
    }

    #[async_trait::async_trait]
    impl EngineSession for MockSession {
        async fn eval(&self, _expr: &str) -> Result<EngineValue> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(EngineValue::Null))
        }

        async fn close(self) -> Result<()> {
            self.closed.store(true, Ordering::SeqCst);
            if self.close_fails {
                Err(AnalyzerError::ConnectionError {
                    message: "close refused".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn happy_replies() -> Vec<Result<EngineValue>> {
        let mut replies: Vec<Result<EngineValue>> = (0..6).map(|_| Ok(EngineValue::Null)).collect();
        replies.push(Ok(EngineValue::Strings(vec![
            "Call:".to_string(),
            "Residuals:".to_string(),
        ])));
        replies.push(Ok(EngineValue::Double(0.003)));
        replies.push(Ok(EngineValue::Double(-4.2)));
        replies
    }

    fn engine_with(connector: MockConnector) -> AnalysisEngine<MockConnector, AnalysisConfig> {
        AnalysisEngine::new(connector, AnalysisConfig::default(), "run_test".to_string())
    }

    #[tokio::test]
    async fn test_session_is_closed_after_success() {
        let engine = engine_with(MockConnector::with_replies(happy_replies()));
        let years = YearPair::new(1965, 2005).unwrap();

        let report = engine.analyze(years).await.unwrap();

        assert!(engine.connector.closed.load(Ordering::SeqCst));
        assert_eq!(
            report.sentence,
            "This regression finds that the difference in polarization was very significant,\nwith increased polarization in 2005 compared to 1965."
        );
    }

    #[tokio::test]
    async fn test_session_is_closed_when_a_step_fails() {
        let replies = vec![Err(AnalyzerError::EvalError {
            expr: "df <- read.csv('...');".to_string(),
            message: "could not resolve host".to_string(),
        })];
        let engine = engine_with(MockConnector::with_replies(replies));
        let years = YearPair::new(1965, 2005).unwrap();

        let err = engine.analyze(years).await.unwrap_err();

        assert!(engine.connector.closed.load(Ordering::SeqCst));
        assert!(matches!(err, AnalyzerError::EvalError { .. }));
    }

    #[tokio::test]
    async fn test_close_failure_does_not_mask_the_run_error() {
        let replies = vec![Err(AnalyzerError::EvalError {
            expr: "x".to_string(),
            message: "boom".to_string(),
        })];
        let engine = engine_with(MockConnector::with_replies(replies).failing_close());
        let years = YearPair::new(1965, 2005).unwrap();

        let err = engine.analyze(years).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::EvalError { .. }));
    }

    #[tokio::test]
    async fn test_close_failure_after_success_keeps_the_report() {
        let engine = engine_with(MockConnector::with_replies(happy_replies()).failing_close());
        let years = YearPair::new(1965, 2005).unwrap();

        let report = engine.analyze(years).await.unwrap();
        assert_eq!(report.summary_lines.len(), 2);
    }

    #[tokio::test]
    async fn test_quit_never_opens_a_session() {
        let engine = engine_with(MockConnector::with_replies(happy_replies()));
        let mut console = Vec::new();

        let outcome = run_analysis(&b"q\n"[..], &mut console, None, &engine)
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert_eq!(engine.connector.connects.load(Ordering::SeqCst), 0);

        let console = String::from_utf8(console).unwrap();
        assert!(console.starts_with("Welcome to the House of Representatives Polarization Analyzer!"));
        assert!(console.contains("Exiting program..."));
        assert!(!console.contains("Calculating regression"));
    }

    #[tokio::test]
    async fn test_interactive_run_prints_summary_then_sentence() {
        let engine = engine_with(MockConnector::with_replies(happy_replies()));
        let mut console = Vec::new();

        let outcome = run_analysis(&b"1965\n2005\n"[..], &mut console, None, &engine)
            .await
            .unwrap();

        assert!(outcome.is_some());
        let console = String::from_utf8(console).unwrap();
        assert!(console.contains("Type 'q' at any point to exit the program.\n"));
        assert!(console.contains("Calculating regression. Please wait...\n"));

        let summary_at = console.find("Call:\nResiduals:\n").unwrap();
        let sentence_at = console
            .find("This regression finds that the difference in polarization was very significant,\nwith increased polarization in 2005 compared to 1965.\n")
            .unwrap();
        assert!(summary_at < sentence_at);
    }

    #[tokio::test]
    async fn test_preset_years_skip_the_collector() {
        let engine = engine_with(MockConnector::with_replies(happy_replies()));
        let mut console = Vec::new();
        let years = YearPair::new(1965, 2005).unwrap();

        let outcome = run_analysis(&b""[..], &mut console, Some(years), &engine)
            .await
            .unwrap();

        assert!(outcome.is_some());
        let console = String::from_utf8(console).unwrap();
        assert!(console.starts_with("Calculating regression. Please wait...\n"));
        assert!(!console.contains("Welcome"));
        assert!(!console.contains("Enter the first year: "));
    }
}
