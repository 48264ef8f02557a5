//! Frame replay - newline-delimited JSON in, status records out
//!
//! Input, one record per line:
//! `{"t": 1200, "keypoints": [null, {"x": 0.5, "y": 0.4, "visibility": 0.9}, ...]}`
//!
//! Timestamps come from the records, not from a clock, so a replay is
//! deterministic. Malformed lines are logged and skipped.

use postura_core::{Frame, MonoTime, PosturaError, PosturaResult};
use postura_engine::{AlertNotifier, EngineConfig, EngineStats, PostureEngine, StatusRecord};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// One recorded frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayRecord {
    /// Capture time in milliseconds
    pub t: MonoTime,
    pub keypoints: Frame,
}

/// Output line for one processed record
#[derive(Clone, Debug, Serialize)]
pub struct ReplayOutput<'a> {
    pub t: MonoTime,
    #[serde(flatten)]
    pub status: &'a StatusRecord,
}

#[derive(Clone, Debug, Default)]
pub struct ReplayReport {
    pub lines: usize,
    pub skipped: usize,
    pub stats: EngineStats,
}

/// Parse one input line; blank lines yield `Ok(None)`
pub fn parse_record(line: &str, line_no: usize) -> PosturaResult<Option<ReplayRecord>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| PosturaError::MalformedRecord {
            line: line_no,
            reason: e.to_string(),
        })
}

/// Run a recording through a fresh engine
pub async fn replay<R, W, N>(
    config: EngineConfig,
    reader: R,
    mut writer: W,
    notifier: &mut N,
) -> PosturaResult<ReplayReport>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    N: AlertNotifier + ?Sized,
{
    let mut engine = PostureEngine::with_config(config)?;
    let mut report = ReplayReport::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        report.lines += 1;

        let record = match parse_record(&line, report.lines) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e) => {
                warn!("{e}");
                report.skipped += 1;
                continue;
            }
        };

        let status = engine.process(&record.keypoints, record.t);
        engine.dispatch(notifier);

        let out = ReplayOutput {
            t: record.t,
            status: &status,
        };
        let mut json =
            serde_json::to_vec(&out).map_err(|e| PosturaError::Serialization(e.to_string()))?;
        json.push(b'\n');
        writer.write_all(&json).await?;
    }

    writer.flush().await?;
    engine.shutdown();
    report.stats = engine.stats().clone();
    debug!(lines = report.lines, skipped = report.skipped, "replay finished");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingNotifier;

    fn line(t: u64, ear_dx: f64) -> String {
        let mut keypoints = vec![serde_json::Value::Null; 13];
        keypoints[7] = serde_json::json!({ "x": 0.46 + ear_dx, "y": 0.4, "visibility": 0.9 });
        keypoints[8] = serde_json::json!({ "x": 0.54 + ear_dx, "y": 0.4, "visibility": 0.9 });
        keypoints[11] = serde_json::json!({ "x": 0.35, "y": 0.6 });
        keypoints[12] = serde_json::json!({ "x": 0.65, "y": 0.6 });
        serde_json::json!({ "t": t, "keypoints": keypoints }).to_string()
    }

    #[test]
    fn test_parse_record() {
        let record = parse_record(&line(1200, 0.0), 1).unwrap().unwrap();
        assert_eq!(record.t, MonoTime::from_millis(1200));
        assert_eq!(record.keypoints.len(), 13);

        assert!(parse_record("   ", 2).unwrap().is_none());
        assert!(matches!(
            parse_record("{\"t\": 5}", 3),
            Err(PosturaError::MalformedRecord { line: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_replay_emits_one_status_per_record() {
        // 0.2 * tan(30°) ear offset: 150° neck angle
        let slouch = 0.2 * 30f64.to_radians().tan();
        let mut input = String::new();
        for t in (0..=11_000).step_by(1_000) {
            input.push_str(&line(t, slouch));
            input.push('\n');
        }
        input.push_str("garbage\n\n");
        input.push_str(&line(12_000, 0.0));
        input.push('\n');

        let mut output = Vec::new();
        let mut notifier = RecordingNotifier::new();
        let report = replay(
            EngineConfig::default(),
            input.as_bytes(),
            &mut output,
            &mut notifier,
        )
        .await
        .unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.stats.frames, 13);
        assert_eq!(notifier.raised(), 1);
        assert_eq!(notifier.hidden(), 1);

        let statuses: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(statuses.len(), 13);
        assert_eq!(statuses[0]["quality"], "poor");
        assert_eq!(statuses[0]["seconds_remaining"], 10);
        assert_eq!(statuses[10]["title"], "Poor Posture Alert!");
        assert_eq!(statuses[10]["t"], 10_000);
        assert_eq!(statuses[12]["quality"], "good");
        assert_eq!(statuses[12]["timer"]["visible"], false);
    }
}
