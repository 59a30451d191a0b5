use anyhow::Context;
use clap::Parser;
use result_extractor::config::{AnalyzeArgs, Command, FetchArgs};
use result_extractor::utils::error::{AppError, ErrorSeverity};
use result_extractor::utils::validation::{validate_file_extensions, Validate};
use result_extractor::utils::logger;
use result_extractor::{
    AnalyzeController, CliConfig, FormInput, HttpAnalysisClient, HttpRetrievalClient, LocalStorage,
    RetrievalController, RetrievalStatus, Table, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting result-extractor");
    tracing::debug!("CLI config: {:?}", cli);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?
        }
        None => TomlConfig::default(),
    };

    let output_override = match &cli.command {
        Command::Fetch(args) => args.output_path.clone(),
        Command::Analyze(_) => None,
    };
    config.apply_overrides(
        cli.retrieval_endpoint.clone(),
        cli.analysis_endpoint.clone(),
        output_override,
    );

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with(e);
    }

    let outcome = match cli.command {
        Command::Fetch(args) => run_fetch(&config, args).await,
        Command::Analyze(args) => run_analyze(&config, args).await,
    };

    if let Err(e) = outcome {
        exit_with(e);
    }

    Ok(())
}

async fn run_fetch(config: &TomlConfig, args: FetchArgs) -> result_extractor::Result<()> {
    let storage = LocalStorage::new(config.output.output_path.clone());
    let service = HttpRetrievalClient::from_config(config)?;
    let mut controller = RetrievalController::from_config(storage, service, config);

    let input = FormInput::new(args.institute_code, args.roll_start, args.roll_end, args.semester);
    let status = controller.submit(input).await?;

    println!("{}", status.heading());
    println!("{}", status.message());

    if status == RetrievalStatus::Failed {
        std::process::exit(2);
    }

    if let Some(path) = controller.download().await? {
        println!("📁 Output saved to: {}", path);
    }
    Ok(())
}

async fn run_analyze(config: &TomlConfig, args: AnalyzeArgs) -> result_extractor::Result<()> {
    validate_file_extensions("file", std::slice::from_ref(&args.file), &["csv"])?;

    let service = HttpAnalysisClient::from_config(config)?;
    let mut controller = AnalyzeController::new(service);
    controller.load_csv_file(&args.file).await?;
    controller.set_prompt(args.prompt);

    if !controller.can_analyze() {
        tracing::warn!("Nothing to analyze: the prompt is empty");
        return Ok(());
    }

    let Some(result) = controller.analyze().await else {
        return Ok(());
    };

    let table = Table::from_result(result);
    println!("🧠 Analysis Result:");
    print!("{}", table.render_text());

    if let Some(html_path) = args.html {
        tokio::fs::write(&html_path, table.render_html()).await?;
        println!("📁 HTML table saved to: {}", html_path);
    }
    Ok(())
}

fn exit_with(e: AppError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
