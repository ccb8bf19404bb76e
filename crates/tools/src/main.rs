use std::sync::Arc;

use clap::Parser;
use persistence::{
    DirectoryRemote, FileSnapshotStore, LocalSnapshotStore, RemoteSnapshots, SyncWorker,
    load_initial,
};
use tokio::sync::mpsc;
use tools::{Args, CliError, Config, run_command};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use visits::Session;

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn real_main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_args(&args)?;

    let local: Arc<dyn LocalSnapshotStore> = Arc::new(FileSnapshotStore::in_dir(&config.data_dir));
    let remote: Option<Arc<dyn RemoteSnapshots>> = config
        .remote_dir
        .as_ref()
        .map(|dir| Arc::new(DirectoryRemote::new(dir)) as Arc<dyn RemoteSnapshots>);

    let snapshot = load_initial(local.as_ref(), remote.as_deref(), &config.user).await;
    let (tx, rx) = mpsc::unbounded_channel();
    let worker = SyncWorker::spawn(local, remote, config.user.clone(), rx, config.debounce);
    let mut session = Session::from_snapshot(snapshot).with_change_sink(tx.clone());

    let result = run_command(&args.command, &mut session, &config);
    if let Ok(outcome) = &result {
        for line in &outcome.lines {
            println!("{line}");
        }
        if outcome.push_sync && tx.send(session.snapshot()).is_err() {
            warn!("sync worker is gone; snapshot not saved");
        }
    }

    // Closing the channel lets the worker flush its pending remote write.
    drop(session);
    drop(tx);
    let stats = worker.join().await;
    info!(
        local_writes = stats.local_writes,
        remote_writes = stats.remote_writes,
        remote_failures = stats.remote_failures,
        "done"
    );
    if stats.local_failures > 0 {
        warn!(failures = stats.local_failures, "local snapshot could not be saved");
    }

    result.map(|_| ())
}
