//! The dataset and its fitted similarity space, built once per process.
//!
//! [`Corpus::build`] constructs an instance explicitly (what the binary
//! and the tests use). [`Corpus::shared`] memoizes one instance for the
//! whole process: the first caller's build wins, completes before any
//! reader sees it, and is never mutated afterwards. Rebuilding means
//! constructing a fresh `Corpus`, never patching an existing one.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::dataset::Dataset;
use crate::matcher::{Match, SimilarityMatcher};

static SHARED: OnceLock<Arc<Corpus>> = OnceLock::new();

/// Loaded dataset plus its similarity space.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    dataset: Dataset,
    matcher: Option<SimilarityMatcher>,
}

impl Corpus {
    /// Fit a similarity space over `dataset`. An empty dataset gets no
    /// space at all.
    pub fn build(dataset: Dataset, threshold: f64) -> Self {
        let matcher = SimilarityMatcher::fit(&dataset, threshold);
        Self { dataset, matcher }
    }

    /// Load the dataset at `path` and fit it. Never fails.
    pub fn load(path: &Path, threshold: f64) -> Self {
        Self::build(Dataset::load(path), threshold)
    }

    /// Process-wide corpus, loaded from `path` on first call.
    ///
    /// Later calls return the same instance and ignore their arguments.
    pub fn shared(path: &Path, threshold: f64) -> Arc<Corpus> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::load(path, threshold))))
    }

    /// The underlying dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Whether a similarity space exists (the dataset is non-empty).
    pub fn has_matcher(&self) -> bool {
        self.matcher.is_some()
    }

    /// Best stored answer for `message`. Always `None` without a dataset.
    pub fn best_match(&self, message: &str) -> Option<Match<'_>> {
        self.matcher.as_ref()?.best_match(message)
    }
}
