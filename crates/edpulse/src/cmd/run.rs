//! Run command - the daily metrics batch
//!
//! Stages execute strictly in sequence; the first failure aborts the
//! run with a stage-naming error and a non-zero exit. Stages that
//! already completed keep their persisted outputs - there is no
//! rollback, and re-running the same date is safe at the history layer
//! (appends dedup by date).

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use edpulse_config::{Config, PlatformContext, RunDates};
use edpulse_extract::{
    extract_app_sessions, extract_dial_scans, extract_downloads, extract_plays,
    fetch_tenant_info, ContentSnapshot,
};
use edpulse_query::{DruidClient, TemplateParams};
use edpulse_report::schema::{ORG_COLUMNS, OVERALL_COLUMNS};
use edpulse_report::{aggregate, append_history, DailyInputs};
use edpulse_store::{
    pull_file, BlobStore, DataStore, HttpBlobStore, NullBlobStore,
};
use edpulse_telemetry::{RunMetric, TelemetryReporter};

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Execution date in DD/MM/YYYY form; the analysed day is the one before
    #[arg(short, long)]
    pub execution_date: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "configs/edpulse.toml")]
    pub config: PathBuf,
}

/// Run the daily metrics batch
pub async fn run(args: RunArgs) -> Result<()> {
    let started = Instant::now();

    let config = Config::from_file(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;
    let dates = RunDates::parse(&args.execution_date)?;
    let partition = dates.partition();

    info!(
        execution = %dates.execution,
        analysis = %partition,
        "daily metrics run starting"
    );

    let store = DataStore::new(&config.store.base_dir);
    store.ensure_layout().context("failed to create store layout")?;

    let blob: Box<dyn BlobStore> = match &config.store.blob {
        Some(blob_config) => {
            Box::new(HttpBlobStore::new(blob_config).context("failed to create blob store")?)
        }
        None => Box::new(NullBlobStore),
    };

    let context = load_platform_context(&store, blob.as_ref())
        .await
        .context("failed to load platform context")?;

    let snapshot = ContentSnapshot::load(&store, blob.as_ref(), &partition)
        .await
        .context("content snapshot stage failed")?;
    info!(stage = "content-snapshot", "complete");

    fetch_tenant_info(
        &config.services.org_search,
        config.services.timeout_secs,
        &store,
        blob.as_ref(),
        &partition,
    )
    .await
    .context("tenant info stage failed")?;
    info!(stage = "tenant-info", "complete");

    let druid = DruidClient::new(&config.services.druid_host, config.services.timeout_secs)
        .context("failed to create query client")?;
    let params = TemplateParams::new(&context, &dates);

    extract_app_sessions(&druid, &params, &store, blob.as_ref(), &partition)
        .await
        .context("app sessions stage failed")?;
    extract_plays(&druid, &params, &snapshot, &store, blob.as_ref(), &partition)
        .await
        .context("plays stage failed")?;
    info!(stage = "app-and-plays", "complete");

    extract_dial_scans(&druid, &params, &store, blob.as_ref(), &partition)
        .await
        .context("dial scans stage failed")?;
    info!(stage = "dial-scans", "complete");

    extract_downloads(&druid, &params, &snapshot, &store, blob.as_ref(), &partition)
        .await
        .context("downloads stage failed")?;
    info!(stage = "downloads", "complete");

    let inputs = DailyInputs::load(&store, &partition)?;
    let metrics = aggregate(&inputs, &context, &dates.dashboard_date());

    append_history(
        &store,
        blob.as_ref(),
        "overall",
        &OVERALL_COLUMNS,
        metrics.overall.to_record(),
    )
    .await?;

    for org in &metrics.orgs {
        if org.is_empty() {
            continue;
        }
        append_history(
            &store,
            blob.as_ref(),
            &org.slug,
            &ORG_COLUMNS,
            org.to_record(),
        )
        .await?;
    }
    info!(stage = "daily-metrics", orgs = metrics.orgs.len(), "complete");

    let reporter = TelemetryReporter::new(
        config.services.telemetry.clone(),
        config.services.timeout_secs,
    )
    .context("failed to create telemetry reporter")?;
    reporter
        .emit_best_effort(
            "Consumption Metrics",
            vec![
                RunMetric::count("timeTakenSecs", started.elapsed().as_secs() as i64),
                RunMetric::text("date", dates.execution.format("%Y-%m-%d").to_string()),
            ],
        )
        .await;

    info!(
        elapsed_secs = started.elapsed().as_secs(),
        "daily metrics run finished"
    );
    Ok(())
}

/// Load the platform context document
///
/// The published blob copy wins; a pre-existing local file serves as
/// fallback when blob storage has no copy (local development).
async fn load_platform_context(
    store: &DataStore,
    blob: &dyn BlobStore,
) -> Result<PlatformContext> {
    let path = store.platform_context();
    match pull_file(blob, store, &path).await {
        Ok(()) => {}
        Err(err) if err.is_not_found() && path.exists() => {
            info!("platform context not in blob storage, using local copy");
        }
        Err(err) => return Err(err.into()),
    }

    let bytes = std::fs::read(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(PlatformContext::from_json(&bytes)?)
}
