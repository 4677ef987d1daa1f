//! Scheduler: ordered executor fallback, routing statistics, and the
//! string-in/string-out request entry point.

pub mod compat;
pub mod scheduler;
pub mod stats;

pub use compat::{FAILURE_PREFIX, build_executors, process_user_request, process_user_request_with};
pub use scheduler::TaskScheduler;
pub use stats::SchedulerStats;
