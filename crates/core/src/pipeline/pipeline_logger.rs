use std::time::Instant;

/// Cross-cutting logger for pipeline stage events.
///
/// Decouples the use cases from specific output mechanisms (stdout, log
/// crate, a host's request tracing) so each caller can observe stage
/// progress without changing the orchestration code.
pub trait PipelineLogger: Send {
    /// A named stage is about to run.
    fn stage_started(&mut self, stage: &str);

    /// A named stage returned, successfully or not, after `duration_ms`.
    fn stage_finished(&mut self, stage: &str, duration_ms: f64, succeeded: bool);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn stage_started(&mut self, _stage: &str) {}
    fn stage_finished(&mut self, _stage: &str, _duration_ms: f64, _succeeded: bool) {}
    fn info(&mut self, _message: &str) {}
}

#[derive(Debug, Clone, PartialEq)]
struct StageRecord {
    stage: String,
    duration_ms: f64,
    succeeded: bool,
}

/// CLI-oriented logger that forwards events to the `log` crate and keeps
/// per-stage timings for a summary report at the end of the run.
pub struct StdoutPipelineLogger {
    stages: Vec<StageRecord>,
    start_time: Instant,
    messages: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            start_time: Instant::now(),
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if no stage ran.
    pub fn summary_string(&self) -> Option<String> {
        if self.stages.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = Vec::new();
        lines.push(format!(
            "Pipeline summary ({} stages, {:.1}s total):",
            self.stages.len(),
            elapsed_ms / 1000.0
        ));

        for record in &self.stages {
            let pct = if elapsed_ms > 0.0 {
                record.duration_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            let status = if record.succeeded { "ok" } else { "FAILED" };
            lines.push(format!(
                "  {:14}: {:8.0}ms  ({pct:4.1}%)  {status}",
                record.stage, record.duration_ms
            ));
        }

        Some(lines.join("\n"))
    }

    /// Recorded duration of a stage, if it ran.
    pub fn duration_of(&self, stage: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| r.duration_ms)
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn stage_started(&mut self, stage: &str) {
        log::info!("{stage}...");
    }

    fn stage_finished(&mut self, stage: &str, duration_ms: f64, succeeded: bool) {
        if succeeded {
            log::info!("{stage} done in {duration_ms:.0}ms");
        } else {
            log::warn!("{stage} failed after {duration_ms:.0}ms");
        }
        self.stages.push(StageRecord {
            stage: stage.to_string(),
            duration_ms,
            succeeded,
        });
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
