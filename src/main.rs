use clap::Parser;
use polarization_analyzer::config::toml_config::FileConfig;
use polarization_analyzer::utils::error::ErrorSeverity;
use polarization_analyzer::utils::{logger, validation::Validate};
use polarization_analyzer::{run_analysis, AnalysisConfig, AnalysisEngine, CliConfig, HttpEngineClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting polarization-analyzer CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入 TOML 配置（若有指定）
    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match FileConfig::from_file(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => None,
    };

    let config = AnalysisConfig::resolve(&cli, file_config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 年份旗標同樣在啟動時檢查
    let preset_years = match cli.preset_years() {
        Ok(years) => years,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let execution_id = cli
        .execution_id
        .clone()
        .unwrap_or_else(|| format!("run_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S")));

    // 建立引擎客戶端與分析協調者
    let client = HttpEngineClient::from_config(&config);
    let engine = AnalysisEngine::new(client, config, execution_id);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    match run_analysis(stdin.lock(), &mut stdout, preset_years, &engine).await {
        Ok(Some(_)) => {
            tracing::info!("✅ Analysis completed successfully!");
        }
        Ok(None) => {
            tracing::info!("Run ended before analysis (user quit)");
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
