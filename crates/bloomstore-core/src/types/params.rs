//! Creation parameters for a filter

/// Parameters for creating a named filter, with a fluent builder API.
///
/// `expected_insertions` is the planned upper bound on distinct
/// elements and `false_probability` the target false-positive rate at
/// or below that insertion count. Exceeding the expected count later
/// is allowed; it degrades the real false-positive rate gradually
/// instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Planned upper bound on distinct insertions (`n`)
    pub expected_insertions: u64,
    /// Target false-positive probability (`p`), open interval (0, 1)
    pub false_probability: f64,
    /// Explicit hash seed; derived from the filter name when `None`
    pub seed: Option<u64>,
    /// Destructively replace an existing filter of the same name
    pub reset: bool,
}

impl FilterParams {
    /// Parameters for `n` expected insertions at false-positive rate `p`.
    pub fn new(expected_insertions: u64, false_probability: f64) -> Self {
        Self {
            expected_insertions,
            false_probability,
            seed: None,
            reset: false,
        }
    }

    /// Use an explicit hash seed instead of the name-derived default.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Request destructive re-initialization: an existing filter (live
    /// or persisted) under the same name is discarded and replaced.
    /// Without this, creating over an existing name fails with
    /// `AlreadyExists`.
    pub fn reset(mut self) -> Self {
        self.reset = true;
        self
    }
}
