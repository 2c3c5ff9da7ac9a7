//! `SearchTrace`: per-iteration audit log of a search.
//!
//! The ordered list of [`IterationEvent`] entries is the decision surface:
//! which box was branched, what happened to each child, which boxes were
//! eclipsed and the frontier order that resulted. Two runs driven by the
//! same logical clock produce byte-identical canonical bytes.

use crate::hash::{canonical_hash, ContentHash, DOMAIN_SEARCH_TRACE};

/// The complete audit trail of one search.
#[derive(Debug, Clone)]
pub struct SearchTrace {
    pub iterations: Vec<IterationEvent>,
    pub metadata: TraceMetadata,
}

/// One pop-branch-sort-prune cycle.
#[derive(Debug, Clone)]
pub struct IterationEvent {
    /// Zero-based iteration number.
    pub iteration: u64,
    /// Fingerprint of the branched box.
    pub branched: String,
    /// Dimension the box was split along.
    pub dimension: usize,
    pub children: Vec<ChildRecord>,
    /// Fingerprints of boxes removed by the eclipse test, in frontier order.
    pub eclipsed: Vec<String>,
    /// Ordering used for this iteration's sort.
    pub phase: Phase,
    /// Digest of the frontier order after pruning.
    pub frontier_digest: String,
    pub frontier_len: u64,
    pub history_len: u64,
}

/// A child produced by branching and what the frontier did with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRecord {
    pub fingerprint: String,
    pub outcome: ChildOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOutcome {
    /// New box; added to frontier and history.
    Admitted,
    /// Identical box already created earlier.
    DuplicateSuppressed,
}

/// Which ordering drives the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Certified lower bound first.
    Global,
    /// Derivative heuristic first.
    Local,
}

/// Why the search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The clock reached the policy budget.
    BudgetExhausted,
    /// No live box remained.
    FrontierExhausted,
    /// History reached the policy cap.
    HistoryLimitReached { limit: u64 },
}

/// Aggregate counters and policy echo.
#[derive(Debug, Clone)]
pub struct TraceMetadata {
    pub root_fingerprint: String,
    pub dimension_count: u64,

    // Counters
    pub total_iterations: u64,
    pub total_children_generated: u64,
    pub total_duplicates_suppressed: u64,
    pub total_eclipsed: u64,
    pub frontier_high_water: u64,
    pub history_len: u64,
    pub termination_reason: TerminationReason,
    /// First iteration sorted with the local order, if the switch happened.
    pub phase_switch_iteration: Option<u64>,

    // Policy echo
    pub budget: u64,
    pub global_phase_percent: u8,
    pub finest_output_level: i32,
    pub max_history: Option<u64>,
}

// ---------------------------------------------------------------------------
// Canonical JSON serialization
// ---------------------------------------------------------------------------

impl SearchTrace {
    /// Serialize to canonical JSON bytes (sorted keys, compact separators).
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.to_json_value())
    }

    /// Content hash of the canonical bytes.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, serde_json::Error> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(DOMAIN_SEARCH_TRACE, &bytes))
    }

    fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "iterations": self.iterations.iter().map(iteration_to_json).collect::<Vec<_>>(),
            "metadata": metadata_to_json(&self.metadata),
        })
    }
}

fn iteration_to_json(e: &IterationEvent) -> serde_json::Value {
    serde_json::json!({
        "branched": e.branched,
        "children": e.children.iter().map(child_to_json).collect::<Vec<_>>(),
        "dimension": e.dimension,
        "eclipsed": e.eclipsed,
        "frontier_digest": e.frontier_digest,
        "frontier_len": e.frontier_len,
        "history_len": e.history_len,
        "iteration": e.iteration,
        "phase": phase_str(e.phase),
    })
}

fn child_to_json(c: &ChildRecord) -> serde_json::Value {
    serde_json::json!({
        "fingerprint": c.fingerprint,
        "outcome": outcome_str(c.outcome),
    })
}

fn outcome_str(o: ChildOutcome) -> &'static str {
    match o {
        ChildOutcome::Admitted => "admitted",
        ChildOutcome::DuplicateSuppressed => "duplicate_suppressed",
    }
}

fn phase_str(p: Phase) -> &'static str {
    match p {
        Phase::Global => "global",
        Phase::Local => "local",
    }
}

fn metadata_to_json(m: &TraceMetadata) -> serde_json::Value {
    serde_json::json!({
        "budget": m.budget,
        "dimension_count": m.dimension_count,
        "finest_output_level": m.finest_output_level,
        "frontier_high_water": m.frontier_high_water,
        "global_phase_percent": m.global_phase_percent,
        "history_len": m.history_len,
        "max_history": m.max_history,
        "phase_switch_iteration": m.phase_switch_iteration,
        "root_fingerprint": m.root_fingerprint,
        "termination_reason": termination_reason_to_json(&m.termination_reason),
        "total_children_generated": m.total_children_generated,
        "total_duplicates_suppressed": m.total_duplicates_suppressed,
        "total_eclipsed": m.total_eclipsed,
        "total_iterations": m.total_iterations,
    })
}

fn termination_reason_to_json(r: &TerminationReason) -> serde_json::Value {
    match r {
        TerminationReason::BudgetExhausted => serde_json::json!({"type": "budget_exhausted"}),
        TerminationReason::FrontierExhausted => serde_json::json!({"type": "frontier_exhausted"}),
        TerminationReason::HistoryLimitReached { limit } => {
            serde_json::json!({"limit": limit, "type": "history_limit_reached"})
        }
    }
}
