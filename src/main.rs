use anyhow::Context;
use clap::Parser;
use headline_light::core::ConfigProvider;
use headline_light::utils::error::{ErrorSeverity, PipelineError};
use headline_light::utils::{logger, validation::Validate};
use headline_light::{
    CliConfig, EtlEngine, GNewsClient, LocalStorage, NewsPipeline, ScorerContext, ScorerRegistry,
    TomlConfig,
};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct RunOptions {
    monitor: bool,
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loaded before parsing so `.env` values feed the clap `env` fallbacks.
    let dotenv = dotenvy::dotenv();
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting headline-light");
    if let Ok(path) = &dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = execute(cli).await {
        let exit_code = match e.downcast_ref::<PipelineError>() {
            Some(pipeline_error) => {
                tracing::error!(
                    "❌ Run failed: {:#} (Category: {:?}, Severity: {:?})",
                    e,
                    pipeline_error.category(),
                    pipeline_error.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", pipeline_error.recovery_suggestion());

                eprintln!("❌ {}", pipeline_error.user_friendly_message());
                eprintln!("💡 {}", pipeline_error.recovery_suggestion());
                exit_code(pipeline_error.severity())
            }
            None => {
                tracing::error!("❌ Run failed: {:#}", e);
                eprintln!("❌ {:#}", e);
                1
            }
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    }
}

async fn execute(cli: CliConfig) -> anyhow::Result<()> {
    let options = RunOptions {
        monitor: cli.monitor,
        dry_run: cli.dry_run,
    };

    match cli.config.clone() {
        Some(path) => {
            let config = TomlConfig::from_file(&path)
                .with_context(|| format!("failed to load configuration file {}", path))?;
            tracing::info!(path = %path, "Loaded TOML configuration");

            let options = RunOptions {
                monitor: options.monitor || config.monitoring_enabled(),
                ..options
            };
            run(config, options).await?;
        }
        None => run(cli, options).await?,
    }

    Ok(())
}

async fn run<C>(config: C, options: RunOptions) -> headline_light::Result<()>
where
    C: ConfigProvider + Validate + 'static,
{
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }

    // One client for the whole process, shared by the fetch client and the scorer.
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds()))
        .build()?;

    let context = ScorerContext {
        client: client.clone(),
        api_key: config.scorer_api_key().to_string(),
        endpoint: config.scorer_endpoint().to_string(),
    };
    let scorer = ScorerRegistry::with_builtin().resolve(config.scorer_identifier(), &context)?;

    if options.dry_run {
        let thresholds = config.thresholds();
        println!("✅ Configuration is valid");
        println!("   scorer:      {}", scorer.name());
        println!("   query:       {} ({})", config.query(), config.lang());
        println!(
            "   thresholds:  green ≤ {}, yellow ≤ {}",
            thresholds.green_max, thresholds.yellow_max
        );
        println!("   per bin:     {}", config.per_bin());
        println!(
            "   output:      {} [{}]",
            config.output_path(),
            config.output_formats().join(", ")
        );
        return Ok(());
    }

    if options.monitor {
        tracing::info!("🔍 Process monitoring enabled");
    }

    let source = GNewsClient::from_config(client, &config);
    let storage = LocalStorage::new(config.output_path());
    let pipeline = NewsPipeline::new(source, scorer, storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, options.monitor);

    let report = engine.run().await?;

    println!("✅ Run completed");
    println!(
        "   fetched {} · skipped {} · degraded {}",
        report.fetched, report.skipped, report.degraded
    );
    println!(
        "   green {} · yellow {} · red {}",
        report.bins.green, report.bins.yellow, report.bins.red
    );
    println!("   sampled ids: {:?}", report.sampled_ids);
    for file in &report.output_files {
        println!("📁 {}", file);
    }

    Ok(())
}
