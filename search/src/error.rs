//! Typed search errors.
//!
//! Configuration failures are raised by the engine constructors before any
//! box is evaluated. Evaluation failures abort a running search; budget,
//! frontier and history terminations are not errors and are reported through
//! [`crate::trace::TerminationReason`].

use brickwork_kernel::EvalError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// The domain has no dimensions.
    #[error("a search needs at least one dimension")]
    NoDimensions,
    /// Inputs and initials disagree in length or containment.
    #[error("domain mismatch: {detail}")]
    DomainMismatch { detail: String },
    /// One derivative function is required per dimension.
    #[error("expected {expected} derivative functions, got {actual}")]
    DerivativeCountMismatch { expected: usize, actual: usize },
    /// A function projects a variable beyond the domain.
    #[error("function reads {arity} variables but the domain has {dimension_count}")]
    ArityExceedsDimensions { arity: usize, dimension_count: usize },
    /// A starting interval sits at a level the engine cannot refine.
    #[error("dimension {dimension} starts at level {level}, which cannot be refined")]
    DegenerateDomain { dimension: usize, level: i32 },
    #[error("invalid search policy: {detail}")]
    InvalidPolicy { detail: String },
    /// Precision overflow, abort, or a malformed function while evaluating a
    /// box.
    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvalError),
}
