use std::collections::HashMap;
use std::time::Instant;

use crate::shared::constants::PROGRESS_INTERVAL;

/// Which frame loop a progress report belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Render,
    Fallback,
}

/// Observability hook for the overlay pipeline.
///
/// Reports are side effects only; a dropped report never changes the
/// outcome of a run.
pub trait ProgressReporter: Send {
    /// Frame-level progress; `total` is 0 when the frame count is unknown.
    fn progress(&mut self, phase: Phase, current: usize, total: usize);

    /// Record how long a named stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards every event. Used by tests.
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {
    fn progress(&mut self, _phase: Phase, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Reports through the `log` facade, once every `interval` frames, and
/// keeps per-stage timings for a closing summary.
pub struct LogProgressReporter {
    interval: usize,
    timings: HashMap<String, Vec<f64>>,
    start_time: Instant,
    reports: usize,
}

impl LogProgressReporter {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
            timings: HashMap::new(),
            start_time: Instant::now(),
            reports: 0,
        }
    }

    /// Number of progress lines emitted so far.
    pub fn reports(&self) -> usize {
        self.reports
    }

    /// Returns the formatted summary, or `None` if no timing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!("Run summary ({:.1}s total):", elapsed_ms / 1000.0)];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len() as f64;
            lines.push(format!(
                "  {stage:10}: {n:6} x avg {avg_ms:7.1}ms  total {total_ms:8.0}ms",
                n = durations.len()
            ));
        }

        Some(lines.join("\n"))
    }
}

impl Default for LogProgressReporter {
    fn default() -> Self {
        Self::new(PROGRESS_INTERVAL)
    }
}

impl ProgressReporter for LogProgressReporter {
    fn progress(&mut self, phase: Phase, current: usize, total: usize) {
        if current == 0 || current % self.interval != 0 {
            return;
        }
        self.reports += 1;
        log::info!("{}", progress_line(phase, current, total));
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

fn progress_line(phase: Phase, current: usize, total: usize) -> String {
    let label = match phase {
        Phase::Render => "Progress",
        Phase::Fallback => "Fallback progress",
    };
    if total > 0 {
        let pct = current as f64 / total as f64 * 100.0;
        format!("{label}: {pct:.1}% ({current}/{total})")
    } else {
        format!("{label}: {current} frames")
    }
}
