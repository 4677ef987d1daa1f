use qsa_core::labels;
use serde::Serialize;

/// Routing counters, updated only by [`crate::TaskScheduler::route_task`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub total_tasks: u64,
    pub qwen_success: u64,
    pub claude_fallback: u64,
    pub errors: u64,
}

impl SchedulerStats {
    /// Count a successful result under its executor's bucket, if any.
    pub(crate) fn record_success(&mut self, executor: &str) {
        if executor.contains(labels::QWEN) {
            self.qwen_success += 1;
        } else if executor == labels::CLAUDE {
            self.claude_fallback += 1;
        }
    }

    /// Share of tasks routed to Qwen, in percent. Zero tasks yields `0.0`.
    pub fn qwen_percentage(&self) -> f64 {
        self.qwen_success as f64 / self.total_tasks.max(1) as f64 * 100.0
    }

    pub fn status_report(&self) -> String {
        format!(
            "Qwen Integration Status:\n\
             - Total tasks processed: {}\n\
             - Routed to Qwen: {} ({:.1}%)\n\
             - Fallback to Claude: {}\n\
             - Errors: {}\n",
            self.total_tasks,
            self.qwen_success,
            self.qwen_percentage(),
            self.claude_fallback,
            self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let report = SchedulerStats::default().status_report();
        assert_eq!(
            report,
            "Qwen Integration Status:\n\
             - Total tasks processed: 0\n\
             - Routed to Qwen: 0 (0.0%)\n\
             - Fallback to Claude: 0\n\
             - Errors: 0\n"
        );
    }

    #[test]
    fn test_percentage_rounding() {
        let stats = SchedulerStats {
            total_tasks: 3,
            qwen_success: 1,
            claude_fallback: 2,
            errors: 0,
        };
        assert!(stats.status_report().contains("- Routed to Qwen: 1 (33.3%)"));
    }

    #[test]
    fn test_classification() {
        let mut stats = SchedulerStats::default();
        stats.record_success("qwen-cli");
        stats.record_success("qwen-api");
        stats.record_success("claude");
        stats.record_success("custom");
        assert_eq!(stats.qwen_success, 2);
        assert_eq!(stats.claude_fallback, 1);
    }

    #[test]
    fn test_claude_match_is_exact() {
        let mut stats = SchedulerStats::default();
        stats.record_success("claude-code");
        assert_eq!(stats.claude_fallback, 0);
    }

    #[test]
    fn test_serializes_counters() {
        let stats = SchedulerStats {
            total_tasks: 4,
            qwen_success: 1,
            claude_fallback: 2,
            errors: 1,
        };
        let value = serde_json::to_value(stats).unwrap();
        assert_eq!(value["total_tasks"], 4);
        assert_eq!(value["errors"], 1);
    }
}
