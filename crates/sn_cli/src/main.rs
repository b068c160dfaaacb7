use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use sn_core::{ArticleStore, PipelineMetrics, SchedulerFault, TranslationProvider};
use sn_enrich::{GoogleTranslateProvider, MicrosoftTranslatorProvider, OpenAiTranslatorProvider, Translator};
use sn_pipeline::{CycleRunner, CycleScheduler, TelegramSink};
use sn_scrapers::HttpFetcher;
use sn_web::AppState;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod config;
mod logging;

use config::Settings;

const WATCHDOG_PERIOD: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(author, version, about = "Cybersecurity news collector and Telegram publisher", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Commands {
    /// Run the scheduler and the HTTP API until interrupted (default)
    Run,
    /// Run a single cycle and print its report
    Once,
    /// Apply the retention sweep and exit
    Cleanup,
}

fn translation_providers(settings: &Settings) -> Result<Vec<Arc<dyn TranslationProvider>>> {
    let client = reqwest::Client::builder()
        .timeout(settings.request_timeout())
        .build()
        .context("failed to build translation HTTP client")?;
    let source = settings.translation_source_language.as_str();
    let target = settings.translation_target_language.as_str();

    let mut providers: Vec<Arc<dyn TranslationProvider>> =
        vec![Arc::new(GoogleTranslateProvider::new(client.clone(), source, target))];
    if let Some(key) = settings.microsoft_translator_key.clone() {
        providers.push(Arc::new(
            MicrosoftTranslatorProvider::new(client.clone(), key, source, target)
                .with_region(settings.microsoft_translator_region.clone()),
        ));
    }
    if let Some(key) = settings.openai_api_key.clone() {
        providers.push(Arc::new(OpenAiTranslatorProvider::new(client, key, source, target)));
    }

    let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
    info!("🌍 Translators initialized: {}", names.join(", "));
    Ok(providers)
}

fn build_runner(
    settings: &Settings,
    store: Arc<dyn ArticleStore>,
    metrics: Arc<PipelineMetrics>,
) -> Result<CycleRunner> {
    let pages = HttpFetcher::new(
        settings.request_timeout(),
        settings.proxy_url.as_deref(),
        settings.retry_policy(),
    )?;
    let strategies = sn_scrapers::default_strategies(Arc::new(pages), settings.fetch_config());
    let names: Vec<&str> = strategies.iter().map(|s| s.name()).collect();
    info!("🦗 Fetch strategies: {}", names.join(" -> "));

    let translator = Translator::new(
        translation_providers(settings)?,
        settings.translator_config(),
        metrics.clone(),
    );
    let sink = TelegramSink::new(settings.bot_token()?, settings.request_timeout())?;

    Ok(CycleRunner::new(
        strategies,
        Arc::new(translator),
        store,
        Arc::new(sink),
        settings.delivery_gate()?,
        metrics,
    )
    .with_admin(settings.admin())
    .with_config(settings.pipeline_config()))
}

/// Restarts the scheduler whenever one of its job loops dies on its own.
async fn watchdog(scheduler: CycleScheduler, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(WATCHDOG_PERIOD);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if let Err(SchedulerFault::LoopExited(job)) = scheduler.health().await {
            error!(job = %job, "Scheduler job loop exited unexpectedly");
            scheduler.restart().await;
        }
    }
}

async fn run(settings: Settings, store: Arc<dyn ArticleStore>, metrics: Arc<PipelineMetrics>) -> Result<()> {
    let runner = Arc::new(build_runner(&settings, store, metrics.clone())?);
    let scheduler = CycleScheduler::new(runner.clone(), settings.scheduler_config()?, metrics.clone());

    let shutdown = CancellationToken::new();
    let state = AppState {
        scheduler: scheduler.clone(),
        metrics: metrics.clone(),
        store: runner.store().clone(),
        translator: runner.translator().clone(),
        api_key: settings.resolve_parse_api_key(),
        environment: settings.environment.clone(),
        quiet_window: Some(settings.quiet_window()?),
    };
    let mut server = {
        let token = shutdown.clone();
        let port = settings.port;
        tokio::spawn(async move { sn_web::serve(port, state, async move { token.cancelled().await }).await })
    };

    scheduler.start().await;
    runner.notify_admin("✅ Security news bot started").await;
    let guard = tokio::spawn(watchdog(scheduler.clone(), shutdown.clone()));

    let early_exit = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("🛑 Shutdown requested");
            None
        }
        served = &mut server => Some(served),
    };

    shutdown.cancel();
    scheduler.stop().await;
    let _ = guard.await;
    let served = match early_exit {
        Some(served) => served,
        None => server.await,
    };
    match served {
        Ok(Err(e)) => error!(error = %e, "API server failed"),
        Err(e) => error!(error = %e, "API server task panicked"),
        Ok(Ok(())) => {}
    }
    metrics.report();
    info!("👋 Bye");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = cli.settings;
    logging::init_logging(&settings.log_level, settings.log_format);

    info!("💾 Opening storage at {}", settings.database_url);
    let store = sn_storage::create_storage(&settings.database_url).await?;
    let metrics = Arc::new(PipelineMetrics::new());

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(settings, store, metrics).await?,
        Commands::Once => {
            let runner = build_runner(&settings, store.clone(), metrics.clone())?;
            let outcome = runner.run_cycle().await;
            store.close().await;
            let report = outcome?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            metrics.report();
        }
        Commands::Cleanup => {
            let cutoff = Utc::now() - chrono::Duration::days(settings.pipeline_config().retention_days);
            let deleted = store.delete_ingested_before(cutoff).await?;
            store.close().await;
            info!("🧹 Deleted {} articles ingested before {}", deleted, cutoff.format("%Y-%m-%d"));
        }
    }
    Ok(())
}
