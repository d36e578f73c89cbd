use super::tally::ProgressReport;

/// Reporting gate for the progress presentation.
///
/// An update goes out when forced, when the increment grows, or when the
/// message text changes. The increment shown to the host never drops below
/// the last one pushed.
#[derive(Debug, Default)]
pub struct ProgressThrottle {
    prev_increment: f64,
    prev_message: String,
}

impl ProgressThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the report to push, or `None` if the update is suppressed.
    pub fn offer(
        &mut self,
        report: &ProgressReport,
        force: bool,
    ) -> Option<ProgressReport> {
        let grew = report.increment > self.prev_increment;
        let message_changed = report.message != self.prev_message;
        if !force && !grew && !message_changed {
            return None;
        }

        let increment = report.increment.max(self.prev_increment);
        self.prev_increment = increment;
        self.prev_message.clone_from(&report.message);
        Some(ProgressReport {
            message: report.message.clone(),
            increment,
        })
    }

    /// Forget the baseline, used when a presentation is (re)started.
    pub fn reset(&mut self) {
        self.prev_increment = 0.0;
        self.prev_message.clear();
    }

    pub fn last_increment(&self) -> f64 {
        self.prev_increment
    }
}

#[cfg(test)]
#[path = "../../tests/src/progress/throttle_tests.rs"]
mod tests;
