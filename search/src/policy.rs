//! Search policy types.

use brickwork_kernel::real::MAX_LEVEL_MAGNITUDE;

use crate::error::SearchError;

/// Budget, phase split and resource caps for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Clock ticks the search may run for (milliseconds with the wall
    /// clock, iterations with the iteration clock).
    pub budget: u64,
    /// Share of the budget, in percent, spent sorting by the certified
    /// lower bound before switching to the derivative heuristic.
    pub global_phase_percent: u8,
    /// Finest output level a certified evaluation may use.
    pub finest_output_level: i32,
    /// Stop once this many distinct boxes have been created.
    pub max_history: Option<usize>,
}

impl SearchPolicy {
    /// A default policy with the given budget.
    #[must_use]
    pub fn with_budget(budget: u64) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    /// Check that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] when the phase split exceeds
    /// 100%, the finest output level is outside the engine's range, or the
    /// history cap is zero.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.global_phase_percent > 100 {
            return Err(SearchError::InvalidPolicy {
                detail: format!(
                    "global_phase_percent must be at most 100, got {}",
                    self.global_phase_percent
                ),
            });
        }
        if i64::from(self.finest_output_level).abs() >= MAX_LEVEL_MAGNITUDE {
            return Err(SearchError::InvalidPolicy {
                detail: format!(
                    "finest_output_level {} is outside ±{MAX_LEVEL_MAGNITUDE}",
                    self.finest_output_level
                ),
            });
        }
        if self.max_history == Some(0) {
            return Err(SearchError::InvalidPolicy {
                detail: "max_history must allow at least the root box".into(),
            });
        }
        Ok(())
    }

    /// True while `elapsed` is inside the global phase.
    #[must_use]
    pub fn in_global_phase(&self, elapsed: u64) -> bool {
        u128::from(elapsed) * 100 < u128::from(self.budget) * u128::from(self.global_phase_percent)
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            budget: 1000,
            global_phase_percent: 80,
            finest_output_level: -1024,
            max_history: None,
        }
    }
}
