//! Search entry point and branch-and-bound loop.
//!
//! Each iteration pops the head of the frontier, splits it along its
//! steepest dimension, admits the children that were never seen before,
//! reads the clock, re-sorts and drops eclipsed boxes. The first share of
//! the budget sorts by certified lower bound; when that share is spent the
//! frontier hull is recorded as the global result and the remaining time
//! sorts by the derivative heuristic to sharpen a local estimate.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use brickwork_kernel::real::MAX_LEVEL_MAGNITUDE;
use brickwork_kernel::{
    AbortSignal, ApplyOptions, CertifiedOutput, DyadicInterval, FunctionModulus, Real,
};
use tracing::{debug, info, warn};

use crate::candidate::{Objective, SearchCandidate};
use crate::clock::{Clock, WallClock};
use crate::error::SearchError;
use crate::frontier::Frontier;
use crate::order::{compare_lower_bound, compare_upper_bound, global_order, local_order};
use crate::policy::SearchPolicy;
use crate::trace::{
    ChildOutcome, ChildRecord, IterationEvent, Phase, SearchTrace, TerminationReason,
    TraceMetadata,
};

/// Fractional digits shown for the local estimate.
const LOCAL_DIGITS: usize = 10;

/// A configured minimization problem. Construction validates everything;
/// [`SearchEngine::search`] can then be run any number of times.
#[derive(Debug)]
pub struct SearchEngine {
    objective: Rc<Objective>,
    initials: Rc<[DyadicInterval]>,
    inputs: Vec<DyadicInterval>,
    policy: SearchPolicy,
}

impl SearchEngine {
    /// Minimize `function` over `[-2^(p-1), 2^(p-1)]^n` where `p` is
    /// `starting_level` and `n` is `dimension_count`.
    ///
    /// # Errors
    ///
    /// See [`SearchEngine::with_domain`].
    pub fn new(
        function: FunctionModulus,
        derivatives: Vec<FunctionModulus>,
        dimension_count: usize,
        starting_level: i32,
        policy: SearchPolicy,
    ) -> Result<Self, SearchError> {
        let initials = vec![DyadicInterval::new(0, starting_level); dimension_count];
        Self::with_domain(function, derivatives, initials.clone(), initials, policy)
    }

    /// Minimize `function` over the box `initials`, starting from `inputs`.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidPolicy`] if the policy does not validate.
    /// - [`SearchError::NoDimensions`] for an empty domain.
    /// - [`SearchError::DomainMismatch`] if `inputs` and `initials` differ in
    ///   length, or an input is coarser than its initial interval or does
    ///   not overlap it. A start may straddle the domain edge, as the boxes
    ///   branching keeps do.
    /// - [`SearchError::DegenerateDomain`] for a level the engine cannot
    ///   refine.
    /// - [`SearchError::DerivativeCountMismatch`] unless there is one
    ///   derivative per dimension.
    /// - [`SearchError::ArityExceedsDimensions`] if any function reads a
    ///   variable past the domain.
    pub fn with_domain(
        function: FunctionModulus,
        derivatives: Vec<FunctionModulus>,
        initials: Vec<DyadicInterval>,
        inputs: Vec<DyadicInterval>,
        policy: SearchPolicy,
    ) -> Result<Self, SearchError> {
        policy.validate()?;

        let dimension_count = initials.len();
        if dimension_count == 0 {
            return Err(SearchError::NoDimensions);
        }
        if inputs.len() != dimension_count {
            return Err(SearchError::DomainMismatch {
                detail: format!(
                    "{} starting intervals for {dimension_count} dimensions",
                    inputs.len()
                ),
            });
        }
        for (dimension, (input, initial)) in inputs.iter().zip(&initials).enumerate() {
            for level in [initial.level(), input.level()] {
                if i64::from(level).abs() >= MAX_LEVEL_MAGNITUDE {
                    return Err(SearchError::DegenerateDomain { dimension, level });
                }
            }
            if !input.overlaps(initial) {
                return Err(SearchError::DomainMismatch {
                    detail: format!("dimension {dimension}: {input} does not meet {initial}"),
                });
            }
        }

        if derivatives.len() != dimension_count {
            return Err(SearchError::DerivativeCountMismatch {
                expected: dimension_count,
                actual: derivatives.len(),
            });
        }
        for f in std::iter::once(&function).chain(&derivatives) {
            if f.arity() > dimension_count {
                return Err(SearchError::ArityExceedsDimensions {
                    arity: f.arity(),
                    dimension_count,
                });
            }
        }

        let options = ApplyOptions {
            finest_level: policy.finest_output_level,
            abort: AbortSignal::new(),
        };
        Ok(Self {
            objective: Rc::new(Objective::new(function, derivatives, options)),
            initials: initials.into(),
            inputs,
            policy,
        })
    }

    /// Handle that aborts a running search from another thread.
    #[must_use]
    pub fn abort_signal(&self) -> AbortSignal {
        self.objective.options.abort.clone()
    }

    #[must_use]
    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    #[must_use]
    pub fn dimension_count(&self) -> usize {
        self.initials.len()
    }

    /// Run to completion with a wall clock measured in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Evaluation`] if evaluating a box fails or the
    /// search is aborted.
    pub fn search(&self) -> Result<SearchOutcome, SearchError> {
        self.search_with_clock(&mut WallClock::start())
    }

    /// Run to completion, reading `clock` once per iteration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Evaluation`] if evaluating a box fails or the
    /// search is aborted.
    #[allow(clippy::too_many_lines)]
    pub fn search_with_clock<C: Clock + ?Sized>(
        &self,
        clock: &mut C,
    ) -> Result<SearchOutcome, SearchError> {
        let root = SearchCandidate::new(
            Rc::clone(&self.initials),
            self.inputs.clone(),
            &self.objective,
        )?;
        let root_fingerprint = root.fingerprint().as_str().to_owned();
        let dimension_count = root.dimension_count();

        let mut frontier = Frontier::new(root.clone());
        let mut last_branched = root;
        let mut iterations: Vec<IterationEvent> = Vec::new();
        let mut global: Option<GlobalBound> = None;
        let mut phase_switch_iteration: Option<u64> = None;
        let mut total_children_generated: u64 = 0;
        let mut total_duplicates_suppressed: u64 = 0;
        let mut total_eclipsed: u64 = 0;
        let mut elapsed: u64 = 0;
        let mut iteration: u64 = 0;

        let termination = loop {
            if elapsed >= self.policy.budget {
                break TerminationReason::BudgetExhausted;
            }
            let Some(branched) = frontier.pop_first() else {
                break TerminationReason::FrontierExhausted;
            };

            let dimension = if dimension_count > 1 {
                branched.steepest_dimension()
            } else {
                0
            };
            let children = branched.branch_along_dimension(dimension)?;
            let mut records = Vec::with_capacity(children.len());
            for child in children {
                let fingerprint = child.fingerprint().as_str().to_owned();
                let outcome = if frontier.admit(child) {
                    ChildOutcome::Admitted
                } else {
                    total_duplicates_suppressed += 1;
                    ChildOutcome::DuplicateSuppressed
                };
                records.push(ChildRecord {
                    fingerprint,
                    outcome,
                });
            }
            total_children_generated += records.len() as u64;

            elapsed = clock.elapsed();
            let phase = if self.policy.in_global_phase(elapsed) {
                frontier.sort_by(global_order);
                Phase::Global
            } else {
                if global.is_none() {
                    let bound = snapshot(&frontier, &branched);
                    info!(
                        iteration,
                        elapsed,
                        frontier = frontier.len(),
                        "switching to local phase; global bound {bound}"
                    );
                    global = Some(bound);
                    phase_switch_iteration = Some(iteration);
                }
                frontier.sort_by(local_order);
                Phase::Local
            };

            let eclipsed: Vec<String> = frontier
                .prune_eclipsed()
                .iter()
                .map(|c| c.fingerprint().as_str().to_owned())
                .collect();
            total_eclipsed += eclipsed.len() as u64;

            debug!(
                iteration,
                ?phase,
                dimension,
                eclipsed = eclipsed.len(),
                frontier = frontier.len(),
                history = frontier.history_len(),
                "search iteration"
            );
            iterations.push(IterationEvent {
                iteration,
                branched: branched.fingerprint().as_str().to_owned(),
                dimension,
                children: records,
                eclipsed,
                phase,
                frontier_digest: frontier.order_digest().as_str().to_owned(),
                frontier_len: frontier.len() as u64,
                history_len: frontier.history_len() as u64,
            });
            last_branched = branched;
            iteration += 1;

            if frontier.is_empty() {
                break TerminationReason::FrontierExhausted;
            }
            if let Some(limit) = self.policy.max_history {
                if frontier.history_len() >= limit {
                    warn!(
                        limit,
                        iteration, "history limit reached; stopping search early"
                    );
                    break TerminationReason::HistoryLimitReached {
                        limit: limit as u64,
                    };
                }
            }
        };

        let global = match global {
            Some(bound) => bound,
            None => snapshot(&frontier, &last_branched),
        };
        let current = frontier.first().unwrap_or(&last_branched);
        let local = LocalEstimate {
            inputs: current.inputs().to_vec(),
            output: current.output().clone(),
        };
        info!(
            iterations = iteration,
            ?termination,
            history = frontier.history_len(),
            "search finished"
        );

        let trace = SearchTrace {
            iterations,
            metadata: TraceMetadata {
                root_fingerprint,
                dimension_count: dimension_count as u64,
                total_iterations: iteration,
                total_children_generated,
                total_duplicates_suppressed,
                total_eclipsed,
                frontier_high_water: frontier.high_water() as u64,
                history_len: frontier.history_len() as u64,
                termination_reason: termination,
                phase_switch_iteration,
                budget: self.policy.budget,
                global_phase_percent: self.policy.global_phase_percent,
                finest_output_level: self.policy.finest_output_level,
                max_history: self.policy.max_history.map(|m| m as u64),
            },
        };
        Ok(SearchOutcome {
            global,
            local,
            trace,
        })
    }
}

/// Hull of the frontier, or of `fallback` when the frontier is empty.
fn snapshot(frontier: &Frontier, fallback: &SearchCandidate) -> GlobalBound {
    let boxes: Vec<&SearchCandidate> = frontier.iter().collect();
    match boxes.split_first() {
        Some((first, rest)) => GlobalBound::covering(first, rest),
        None => GlobalBound::covering(fallback, &[]),
    }
}

/// Smallest interval spanning a set of dyadic intervals, kept as the two
/// intervals that carry its edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hull {
    lower: DyadicInterval,
    upper: DyadicInterval,
}

impl Hull {
    fn covering<'a, I>(first: (&'a DyadicInterval, &'a DyadicInterval), rest: I) -> Self
    where
        I: IntoIterator<Item = (&'a DyadicInterval, &'a DyadicInterval)>,
    {
        let (mut lower, mut upper) = first;
        for (low, high) in rest {
            if compare_lower_bound(low, lower) == Ordering::Less {
                lower = low;
            }
            if compare_upper_bound(upper, high) == Ordering::Less {
                upper = high;
            }
        }
        Self {
            lower: lower.clone(),
            upper: upper.clone(),
        }
    }

    /// The interval whose lower edge is the hull's lower edge.
    #[must_use]
    pub fn lower(&self) -> &DyadicInterval {
        &self.lower
    }

    /// The interval whose upper edge is the hull's upper edge.
    #[must_use]
    pub fn upper(&self) -> &DyadicInterval {
        &self.upper
    }

    #[must_use]
    pub fn lower_edge(&self) -> Real {
        self.lower.lower_edge()
    }

    #[must_use]
    pub fn upper_edge(&self) -> Real {
        self.upper.upper_edge()
    }
}

impl fmt::Display for Hull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}]",
            self.lower.lower_edge_decimal(),
            self.upper.upper_edge_decimal()
        )
    }
}

/// Certified enclosure of the global minimum: per-dimension hulls of the
/// frontier inputs and the hull of their certified outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalBound {
    pub inputs: Vec<Hull>,
    pub output: Hull,
}

impl GlobalBound {
    fn covering(first: &SearchCandidate, rest: &[&SearchCandidate]) -> Self {
        let inputs = (0..first.dimension_count())
            .map(|i| {
                Hull::covering(
                    (&first.inputs()[i], &first.inputs()[i]),
                    rest.iter().map(|c| (&c.inputs()[i], &c.inputs()[i])),
                )
            })
            .collect();
        let output = Hull::covering(
            (first.output().lower(), first.output().upper()),
            rest.iter().map(|c| (c.output().lower(), c.output().upper())),
        );
        Self { inputs, output }
    }
}

impl fmt::Display for GlobalBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f(")?;
        for (i, hull) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{hull}")?;
        }
        write!(f, ") ==> {}", self.output)
    }
}

/// The box at the head of the frontier when the search stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEstimate {
    inputs: Vec<DyadicInterval>,
    output: CertifiedOutput,
}

impl LocalEstimate {
    #[must_use]
    pub fn inputs(&self) -> &[DyadicInterval] {
        &self.inputs
    }

    #[must_use]
    pub fn output(&self) -> &CertifiedOutput {
        &self.output
    }

    /// Box centre.
    #[must_use]
    pub fn point(&self) -> Vec<Real> {
        self.inputs.iter().map(DyadicInterval::midpoint).collect()
    }

    /// Centre of the certified output.
    #[must_use]
    pub fn value(&self) -> Real {
        self.output.centre().midpoint()
    }
}

impl fmt::Display for LocalEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f(")?;
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", truncated_midpoint(input))?;
        }
        write!(f, ") ==> {}", truncated_midpoint(self.output.centre()))
    }
}

fn truncated_midpoint(interval: &DyadicInterval) -> String {
    let exact = interval.midpoint_decimal();
    match exact.split_once('.') {
        Some((whole, fraction)) if fraction.len() > LOCAL_DIGITS => {
            format!("{whole}.{}", &fraction[..LOCAL_DIGITS])
        }
        _ => exact,
    }
}

/// Result of one search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub global: GlobalBound,
    pub local: LocalEstimate,
    pub trace: SearchTrace,
}

impl SearchOutcome {
    /// `f([lo,hi], ...) ==> [lo,hi]` with exact decimal edges.
    #[must_use]
    pub fn global_description(&self) -> String {
        self.global.to_string()
    }

    /// `f(x, ...) ==> v` at the local estimate.
    #[must_use]
    pub fn local_description(&self) -> String {
        self.local.to_string()
    }

    #[must_use]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.trace.metadata.termination_reason
    }
}
