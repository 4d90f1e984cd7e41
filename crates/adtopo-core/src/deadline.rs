//! Wall-clock budget for a full traversal.
//!
//! Directory calls block and can hang on unreachable servers, so the builder
//! checks the deadline between traversal steps and aborts with a Timeout
//! error once the budget is spent. No per-call cancellation is attempted; a
//! hung call is only detected at the next step boundary.

use std::time::{Duration, Instant};

use adtopo_error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct TraversalDeadline {
    start: Instant,
    budget: Option<Duration>,
}

impl TraversalDeadline {
    /// Start the clock with the given budget.
    pub fn new(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget: Some(budget),
        }
    }

    /// A deadline that never expires.
    pub fn unbounded() -> Self {
        Self {
            start: Instant::now(),
            budget: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Fail with a Timeout error if the budget is spent.
    pub fn check(&self, stage: &'static str) -> Result<()> {
        if let Some(budget) = self.budget
            && self.start.elapsed() > budget
        {
            return Err(Error::timeout(format!(
                "traversal exceeded {:.1}s budget",
                budget.as_secs_f64()
            ))
            .with_operation("builder::build")
            .with_context("stage", stage));
        }
        Ok(())
    }
}
