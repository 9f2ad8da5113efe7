use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::UnixListener;
use tracing::{error, info};

use supervisor_exporter::discovery::discover_endpoints;
use supervisor_exporter::runner::{CommandRunner, ShellRunner};
use supervisor_exporter::scheduler::{self, CycleConfig};
use supervisor_exporter::server::build_router;
use supervisor_exporter::snapshot::SnapshotStore;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(name = "supervisor_exporter", about = "supervisord metrics exporter", version)]
struct Args {
    /// Unix socket path to listen on for telemetry access.
    #[arg(
        long = "unix-sock",
        default_value = "/dev/shm/supervisor_exporter.sock",
        env = "SUPERVISOR_EXPORTER_SOCK"
    )]
    unix_sock: PathBuf,

    /// Path under which to expose metrics.
    #[arg(
        long,
        default_value = "/metrics",
        env = "SUPERVISOR_EXPORTER_TELEMETRY_PATH"
    )]
    telemetry_path: String,

    /// Collection interval in seconds.
    #[arg(long, default_value = "120", env = "SUPERVISOR_EXPORTER_INTERVAL")]
    interval: u64,

    /// Path to the supervisorctl binary.
    #[arg(
        long,
        default_value = "/usr/local/supervisor/bin/supervisorctl",
        env = "SUPERVISOR_EXPORTER_SUPERVISORCTL"
    )]
    supervisorctl: String,

    /// Supervisor process name to look for in the listening-socket table.
    #[arg(
        long,
        default_value = "supervisord",
        env = "SUPERVISOR_EXPORTER_PROCESS_NAME"
    )]
    process_name: String,
}

// ============================================================
// Main
// ============================================================

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "supervisor_exporter=info".parse().unwrap()),
        )
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(async_main(args));
}

async fn async_main(args: Args) {
    let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner::new());

    // Discovery runs once; the endpoint set is fixed for the process lifetime.
    let endpoints = discover_endpoints(runner.as_ref(), &args.process_name);
    if endpoints.is_empty() {
        error!(
            process_name = %args.process_name,
            "no supervisor endpoints discovered, refusing to serve"
        );
        process::exit(1);
    }
    info!(endpoints = endpoints.len(), "discovered supervisor endpoints");

    let store = Arc::new(SnapshotStore::new());
    let config = Arc::new(CycleConfig {
        supervisorctl: args.supervisorctl.clone(),
        endpoints: endpoints.into_iter().collect(),
    });

    // First cycle completes before the listener binds, so scrapes never see
    // an empty document.
    scheduler::run_startup_cycle(&store, runner.clone(), config.clone()).await;

    let interval = Duration::from_secs(args.interval);
    {
        let store = store.clone();
        let runner = runner.clone();
        let config = config.clone();
        tokio::spawn(async move {
            scheduler::tick_loop(store, runner, config, interval).await;
        });
    }

    let app = build_router(store, &args.telemetry_path);

    // A previous run may have left its socket file behind.
    if let Err(e) = std::fs::remove_file(&args.unix_sock)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        error!(path = %args.unix_sock.display(), error = %e, "failed to remove stale socket");
        process::exit(1);
    }

    let listener = UnixListener::bind(&args.unix_sock).expect("failed to bind unix socket");
    info!(path = %args.unix_sock.display(), metrics_path = %args.telemetry_path, "listening");

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
