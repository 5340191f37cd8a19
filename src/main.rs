use clap::Parser;
use demo_scrub::utils::{logger, validation::Validate};
use demo_scrub::{
    CliConfig, LocalStorage, ReportFormat, RuleFile, ScrubEngine, ScrubError, ScrubOptions,
    ScrubReport, Scrubber,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting demo-scrub");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    // 只輸出內建規則，不處理檔案
    if config.print_rules {
        match RuleFile::builtin().to_toml_string() {
            Ok(rendered) => print!("{}", rendered),
            Err(e) => fail(&e),
        }
        return Ok(());
    }

    // 載入規則：--rules 指定的檔案，否則使用內建規則
    let scrubber = match load_scrubber(&config) {
        Ok(scrubber) => {
            tracing::debug!("{} rule(s) loaded", scrubber.rules().len());
            scrubber
        }
        Err(e) => fail(&e),
    };

    // 創建存儲和清理引擎
    let options = ScrubOptions {
        dry_run: config.dry_run,
        strict: config.strict,
        backup: config.backup,
    };
    let engine = ScrubEngine::with_options(LocalStorage::current_dir(), scrubber, options);

    // 執行並依格式輸出報告
    match engine.run(&config.path).await {
        Ok(report) => match config.report {
            ReportFormat::Text => print_text_report(&report),
            ReportFormat::Json => match report.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => fail(&e),
            },
        },
        Err(e) => fail(&e),
    }

    Ok(())
}

fn load_scrubber(config: &CliConfig) -> demo_scrub::Result<Scrubber> {
    match &config.rules {
        Some(path) => {
            tracing::info!("Loading rules from {}", path);
            let rule_file = RuleFile::from_file(path)?;
            rule_file.validate()?;
            Scrubber::from_provider(&rule_file)
        }
        None => Scrubber::builtin(),
    }
}

fn print_text_report(report: &ScrubReport) {
    for outcome in &report.outcomes {
        println!(
            "{} block removed: {} replacement(s)",
            outcome.label, outcome.match_count
        );
    }
    // 長度統計以字元計算
    println!("Original length: {} chars", report.original_len);
    println!("New length: {} chars", report.new_len);
    println!("Removed: {} chars", report.removed());
    if let Some(backup) = &report.backup_path {
        println!("Backup: {}", backup);
    }
    if report.dry_run {
        println!("Dry run, nothing written.");
    } else {
        println!("Done!");
    }
}

/// 記錄錯誤、輸出使用者友善訊息，並依嚴重程度退出
fn fail(e: &ScrubError) -> ! {
    tracing::error!(
        "❌ demo-scrub failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
