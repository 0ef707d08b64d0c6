/// Receives progress reports from a render and may cancel it.
///
/// `amount_complete` returning `false` asks the renderer to stop at its next
/// checkpoint; the render then reports [`crate::RenderOutcome::Cancelled`].
pub trait ProgressCallback {
    fn task(&mut self, _description: &str) {}

    fn error(&mut self, _message: &str) {}

    fn amount_complete(&mut self, current: u32, total: u32) -> bool;
}

/// Ignores reports and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn amount_complete(&mut self, _current: u32, _total: u32) -> bool {
        true
    }
}

/// Logs tasks, errors and whole-percent progress steps through `tracing`.
#[derive(Clone, Debug, Default)]
pub struct TracingProgress {
    last_percent: Option<u32>,
}

impl ProgressCallback for TracingProgress {
    fn task(&mut self, description: &str) {
        tracing::info!(task = description, "render task");
    }

    fn error(&mut self, message: &str) {
        tracing::error!(message, "render error reported");
    }

    fn amount_complete(&mut self, current: u32, total: u32) -> bool {
        if total == 0 {
            return true;
        }
        let percent = (u64::from(current.min(total)) * 100 / u64::from(total)) as u32;
        if self.last_percent != Some(percent) {
            self.last_percent = Some(percent);
            tracing::debug!(percent, "render progress");
        }
        true
    }
}

/// Maps a nested stage's `0..=total` progress onto `start..=end` of the parent's
/// scale, so nested renders report one monotonic overall figure.
pub struct SubProgress<'a> {
    parent: &'a mut dyn ProgressCallback,
    start: u32,
    end: u32,
    total: u32,
}

impl<'a> SubProgress<'a> {
    pub fn new(parent: &'a mut dyn ProgressCallback, start: u32, end: u32, total: u32) -> Self {
        let total = total.max(1);
        let end = end.min(total);
        let start = start.min(end);
        Self {
            parent,
            start,
            end,
            total,
        }
    }
}

impl ProgressCallback for SubProgress<'_> {
    fn task(&mut self, description: &str) {
        self.parent.task(description);
    }

    fn error(&mut self, message: &str) {
        self.parent.error(message);
    }

    fn amount_complete(&mut self, current: u32, total: u32) -> bool {
        let span = u64::from(self.end - self.start);
        let done = if total == 0 {
            0
        } else {
            span * u64::from(current.min(total)) / u64::from(total)
        };
        self.parent
            .amount_complete(self.start + done as u32, self.total)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/progress.rs"]
mod tests;
