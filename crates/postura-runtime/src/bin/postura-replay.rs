//! Replay a recorded keypoint stream through the posture engine
//!
//! Usage: postura-replay [config.json] < frames.ndjson > statuses.ndjson

use postura_core::PosturaResult;
use postura_runtime::{init_logging, replay, LogNotifier, SessionConfig};
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("replay failed: {e}");
        eprintln!("postura-replay: {e}");
        std::process::exit(1);
    }
}

async fn run() -> PosturaResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    init_logging(&config)?;

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    let mut notifier = LogNotifier;

    let report = replay(config.engine, stdin, stdout, &mut notifier).await?;
    info!(
        lines = report.lines,
        skipped = report.skipped,
        alerts = report.stats.alerts_raised,
        "replay complete"
    );
    Ok(())
}
