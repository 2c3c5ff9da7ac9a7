//! Search candidates ("boxes").
//!
//! A candidate is one node of the branch-and-bound tree: a box of dyadic
//! inputs, the certified output of the objective over that box, and one
//! uncertified derivative estimate per dimension used only for steering.

use std::rc::Rc;

use brickwork_kernel::{
    ApplyOptions, CertifiedOutput, DyadicInterval, EvalError, FunctionModulus, Real,
};

use crate::hash::{canonical_hash, ContentHash, DOMAIN_CANDIDATE};

/// The function being minimized, its partial derivatives and the options
/// every evaluation runs with. Shared by every candidate of one search.
#[derive(Debug)]
pub struct Objective {
    pub function: FunctionModulus,
    pub derivatives: Vec<FunctionModulus>,
    pub options: ApplyOptions,
}

impl Objective {
    #[must_use]
    pub fn new(
        function: FunctionModulus,
        derivatives: Vec<FunctionModulus>,
        options: ApplyOptions,
    ) -> Self {
        Self {
            function,
            derivatives,
            options,
        }
    }
}

/// An immutable search box with its certified output.
///
/// All evaluation happens in [`SearchCandidate::new`]; accessors are `O(1)`.
#[derive(Debug, Clone)]
pub struct SearchCandidate {
    initials: Rc<[DyadicInterval]>,
    inputs: Vec<DyadicInterval>,
    output: CertifiedOutput,
    derivatives: Vec<f64>,
    identity: Vec<u8>,
    fingerprint: ContentHash,
    objective: Rc<Objective>,
}

impl SearchCandidate {
    /// Evaluate `objective` over `inputs`.
    ///
    /// # Errors
    ///
    /// Propagates [`EvalError`] from the certified evaluation or from a
    /// derivative evaluation.
    pub fn new(
        initials: Rc<[DyadicInterval]>,
        inputs: Vec<DyadicInterval>,
        objective: &Rc<Objective>,
    ) -> Result<Self, EvalError> {
        let output = objective.function.apply(&inputs, &objective.options)?;

        let centres: Vec<Real> = inputs.iter().map(DyadicInterval::midpoint).collect();
        let derivatives = objective
            .derivatives
            .iter()
            .map(|d| -> Result<f64, EvalError> {
                objective.options.abort.check()?;
                Ok(d.evaluate(&centres)?.to_f64()?)
            })
            .collect::<Result<Vec<f64>, _>>()?;

        let identity = box_identity_bytes(&inputs);
        let fingerprint = canonical_hash(DOMAIN_CANDIDATE, &identity);

        Ok(Self {
            initials,
            inputs,
            output,
            derivatives,
            identity,
            fingerprint,
            objective: Rc::clone(objective),
        })
    }

    /// The fixed domain box of the whole search.
    #[must_use]
    pub fn initials(&self) -> &[DyadicInterval] {
        &self.initials
    }

    #[must_use]
    pub fn inputs(&self) -> &[DyadicInterval] {
        &self.inputs
    }

    #[must_use]
    pub fn output(&self) -> &CertifiedOutput {
        &self.output
    }

    /// Derivative estimates at the box centre, one per dimension.
    #[must_use]
    pub fn derivatives(&self) -> &[f64] {
        &self.derivatives
    }

    #[must_use]
    pub fn dimension_count(&self) -> usize {
        self.inputs.len()
    }

    /// `Σ |derivative|`.
    #[must_use]
    pub fn derivative_score(&self) -> f64 {
        self.derivatives.iter().map(|d| d.abs()).sum()
    }

    /// Index of the largest `|derivative|`; the first one wins ties.
    #[must_use]
    pub fn steepest_dimension(&self) -> usize {
        let mut best = 0;
        let mut best_magnitude = f64::NEG_INFINITY;
        for (i, d) in self.derivatives.iter().enumerate() {
            if d.abs() > best_magnitude {
                best = i;
                best_magnitude = d.abs();
            }
        }
        best
    }

    /// Split along one dimension, keeping the children that still meet the
    /// initial domain on that dimension.
    ///
    /// Near a domain edge this yields two children instead of three.
    ///
    /// # Errors
    ///
    /// Propagates [`EvalError`] from evaluating a child.
    pub fn branch_along_dimension(&self, dimension: usize) -> Result<Vec<Self>, EvalError> {
        let Some(interval) = self.inputs.get(dimension) else {
            return Ok(Vec::new());
        };
        let bound = &self.initials[dimension];
        interval
            .branch()
            .into_iter()
            .filter(|child| child.overlaps(bound))
            .map(|child| {
                let mut inputs = self.inputs.clone();
                inputs[dimension] = child;
                Self::new(Rc::clone(&self.initials), inputs, &self.objective)
            })
            .collect()
    }

    /// Split along every dimension at once.
    ///
    /// # Errors
    ///
    /// Propagates [`EvalError`] from evaluating a child.
    pub fn branch_all(&self) -> Result<Vec<Self>, EvalError> {
        let mut boxes = vec![self.clone()];
        for dimension in 0..self.dimension_count() {
            let mut next = Vec::with_capacity(boxes.len() * 3);
            for candidate in &boxes {
                next.extend(candidate.branch_along_dimension(dimension)?);
            }
            boxes = next;
        }
        Ok(boxes)
    }

    /// Exact code-and-level equality on every dimension.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.inputs.len() == other.inputs.len()
            && self
                .inputs
                .iter()
                .zip(&other.inputs)
                .all(|(a, b)| a.same_as(b))
    }

    /// Canonical bytes of the input box; equal iff [`Self::same_as`].
    #[must_use]
    pub fn identity_bytes(&self) -> &[u8] {
        &self.identity
    }

    #[must_use]
    pub fn fingerprint(&self) -> &ContentHash {
        &self.fingerprint
    }
}

fn box_identity_bytes(inputs: &[DyadicInterval]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&u32::try_from(inputs.len()).unwrap_or(u32::MAX).to_be_bytes());
    for interval in inputs {
        bytes.extend_from_slice(&interval.identity_bytes());
    }
    bytes
}
