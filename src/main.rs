use clap::Parser;
use inframax_site::core::ConfigProvider;
use inframax_site::utils::error::ErrorSeverity;
use inframax_site::utils::{logger, validation::Validate};
use inframax_site::{CliConfig, GeminiClient, LocalStorage, SiteEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting inframax-site");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    // 載入並驗證配置
    let config = match args.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let storage = LocalStorage::new(config.output_path().to_string());
    let generator = GeminiClient::from_config(&config)?;
    let engine = SiteEngine::new(storage, config, generator);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No request will be sent");
        let request = engine.generation_request();
        println!("{}", request.prompt);
        println!();
        println!("{}", serde_json::to_string_pretty(&request.response_schema)?);
        return Ok(());
    }

    match engine.run().await {
        Ok(output) => {
            if !output.generation_succeeded {
                tracing::warn!("Page rendered with fallback copy");
            }
            tracing::info!("✅ Site rendered successfully!");
            tracing::info!("📁 Output saved to: {}", output.output_path);
            println!("✅ Site rendered successfully!");
            println!("📁 Output saved to: {}", output.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Site rendering failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

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
