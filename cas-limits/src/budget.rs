//! Bounds on the work done by the asymptotic algorithms.
//!
//! Comparing two expressions needs a limit, and computing a limit compares expressions, so the
//! recursion between the two has no structural bound. Every limit request and every leading-term
//! step enters the [`Budget`], which refuses once either the nesting depth or the total number of
//! steps would exceed its [`BudgetConfig`].

use crate::limit::Unsupported;
use std::cell::Cell;
use tracing::warn;

/// The default maximum nesting depth of limit requests and leading-term steps.
pub const DEFAULT_MAX_DEPTH: usize = 48;

/// The default maximum number of limit requests and leading-term steps.
pub const DEFAULT_MAX_STEPS: usize = 20_000;

/// Limits on the work done by a single [`Asymptotics`](crate::Asymptotics) context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetConfig {
    /// Maximum nesting depth.
    pub max_depth: usize,

    /// Maximum number of steps, counted over the lifetime of the context.
    pub max_steps: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Tracks the work done so far against a [`BudgetConfig`].
#[derive(Debug, Default)]
pub struct Budget {
    config: BudgetConfig,
    depth: Cell<usize>,
    steps: Cell<usize>,
}

impl Budget {
    pub fn new(config: BudgetConfig) -> Self {
        Self {
            config,
            depth: Cell::new(0),
            steps: Cell::new(0),
        }
    }

    pub fn config(&self) -> &BudgetConfig {
        &self.config
    }

    /// The current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// The number of steps taken so far.
    pub fn steps(&self) -> usize {
        self.steps.get()
    }

    /// Charges one step and enters one level of nesting. The level is left when the returned
    /// guard is dropped.
    pub fn enter(&self) -> Result<BudgetGuard<'_>, Unsupported> {
        let depth = self.depth.get() + 1;
        let steps = self.steps.get() + 1;
        if depth > self.config.max_depth || steps > self.config.max_steps {
            warn!(depth, steps, "asymptotic budget exhausted");
            return Err(Unsupported::BudgetExhausted);
        }

        self.depth.set(depth);
        self.steps.set(steps);
        Ok(BudgetGuard { budget: self })
    }
}

/// One level of nesting in a [`Budget`].
#[derive(Debug)]
pub struct BudgetGuard<'a> {
    budget: &'a Budget,
}

impl Drop for BudgetGuard<'_> {
    fn drop(&mut self) {
        self.budget.depth.set(self.budget.depth.get() - 1);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn guards_track_depth() {
        let budget = Budget::default();
        {
            let _outer = budget.enter().unwrap();
            let _inner = budget.enter().unwrap();
            assert_eq!(budget.depth(), 2);
        }
        assert_eq!(budget.depth(), 0);
        assert_eq!(budget.steps(), 2);
    }

    #[test]
    fn depth_limit() {
        let budget = Budget::new(BudgetConfig { max_depth: 2, ..Default::default() });
        let _a = budget.enter().unwrap();
        let _b = budget.enter().unwrap();
        assert_eq!(budget.enter().unwrap_err(), Unsupported::BudgetExhausted);

        // a refused request does not count
        assert_eq!(budget.depth(), 2);
        assert_eq!(budget.steps(), 2);
    }

    #[test]
    fn step_limit() {
        let budget = Budget::new(BudgetConfig { max_steps: 3, ..Default::default() });
        for _ in 0..3 {
            budget.enter().unwrap();
        }
        assert!(budget.enter().is_err());
    }
}
