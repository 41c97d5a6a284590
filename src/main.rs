use clap::Parser;
use reelsort::{
    BatchSummary, Cli, Commands, DryRunMover, ManifestSource, Mover, NativeMover,
    OrganizerConfig, QualityCatalog, QualityMatcher, ReleaseSource, Runner, SnapshotStore,
    TracingBus,
};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Organize { config, dry_run } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            if let Err(e) = run_once(&config, dry_run, &shutdown) {
                tracing::error!("Error: {e}");
                process::exit(1);
            }
        }
        Commands::Daemon {
            config,
            dry_run,
            interval,
        } => {
            if let Err(e) = run_daemon(&config, dry_run, interval) {
                tracing::error!("Error: {e}");
                process::exit(1);
            }
        }
    }
}

fn run_once(
    config_path: &Path,
    dry_run: bool,
    shutdown: &Arc<AtomicBool>,
) -> anyhow::Result<BatchSummary> {
    tracing::info!("Loading configuration from: {}", config_path.display());
    let config = OrganizerConfig::from_file(config_path)?;

    let source = ManifestSource::new(config.manifest_path());
    let groups = source.groups()?;
    if groups.is_empty() {
        tracing::info!("No release groups pending");
        return Ok(BatchSummary::default());
    }
    tracing::info!("{} release groups pending", groups.len());

    let store = SnapshotStore::from_file(&config.snapshot_path())?;
    let matcher = QualityMatcher::new(QualityCatalog::new());
    let bus = TracingBus;

    let mover: Box<dyn Mover> = if dry_run {
        tracing::info!("Dry-run mode: no files will be moved");
        Box::new(DryRunMover)
    } else {
        Box::new(NativeMover)
    };

    let runner = Runner::new(&matcher, &store, &bus, mover.as_ref());
    let summary = runner.run_batch(&groups, &config, shutdown);

    tracing::info!(
        "Run complete: {} renamed, {} unmatched, {} superseded, {} skipped",
        summary.groups_renamed,
        summary.groups_unmatched,
        summary.groups_superseded,
        summary.groups_skipped
    );

    Ok(summary)
}

fn run_daemon(config_path: &Path, dry_run: bool, interval: Option<u64>) -> anyhow::Result<()> {
    // The interval flag wins; otherwise take it from the config file.
    let interval_minutes = match interval {
        Some(minutes) => minutes,
        None => OrganizerConfig::from_file(config_path)?.run_every_minutes,
    };

    tracing::info!(
        "Starting daemon mode (every {interval_minutes} min, config: {})",
        config_path.display()
    );

    let running = Arc::new(AtomicBool::new(true));
    let shutdown = Arc::new(AtomicBool::new(false));

    {
        let running = running.clone();
        let shutdown = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            tracing::info!("Received interrupt signal, shutting down gracefully...");
            running.store(false, Ordering::SeqCst);
            shutdown.store(true, Ordering::SeqCst);
        }) {
            tracing::warn!("Failed to set Ctrl-C handler: {e}");
        }
    }

    let mut run_number = 1u64;

    while running.load(Ordering::SeqCst) {
        tracing::info!("===== Organizer run #{run_number} =====");

        match run_once(config_path, dry_run, &shutdown) {
            Ok(_) => tracing::info!("Run completed successfully"),
            Err(e) => {
                // Keep the daemon alive; the next run may succeed.
                tracing::error!("Run failed: {e}");
            }
        }

        if !running.load(Ordering::SeqCst) {
            break;
        }

        tracing::info!("Sleeping for {interval_minutes} minutes until next run...");

        // Sleep in one-second chunks so shutdown stays responsive.
        for _ in 0..interval_minutes * 60 {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            std::thread::sleep(Duration::from_secs(1));
        }

        run_number += 1;
    }

    tracing::info!("Daemon stopped gracefully");
    Ok(())
}
