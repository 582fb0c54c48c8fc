//! TF-IDF similarity matching against stored questions.
//!
//! # Pipeline
//!
//! ```text
//! fit:   questions → tokenize → vocabulary + smoothed idf → L2-normalized vectors
//! query: message → lowercase → tokenize → project (unknown terms dropped)
//!        → cosine vs every question → first maximum → threshold gate
//! ```
//!
//! Tokens are maximal runs of word characters (alphanumeric or `_`) at
//! least two characters long. Term weight is raw count times
//! `ln((1 + n) / (1 + df)) + 1`.

use std::collections::HashMap;
use tracing::{debug, trace};

use crate::dataset::Dataset;

/// Default acceptance threshold; a match must score strictly above it.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Sparse vector as `(term index, weight)` pairs sorted by term index.
pub type SparseVector = Vec<(usize, f64)>;

/// Split lowercased text into terms.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut len = 0usize;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            current.push(c);
            len += 1;
        } else {
            if len >= 2 {
                tokens.push(std::mem::take(&mut current));
            }
            current.clear();
            len = 0;
        }
    }
    if len >= 2 {
        tokens.push(current);
    }
    tokens
}

/// Vocabulary and inverse document frequencies learned from a corpus.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and idf from `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();

        for doc in documents {
            let mut seen: Vec<usize> = Vec::new();
            for token in tokenize(doc.as_ref()) {
                let next = vocabulary.len();
                let idx = *vocabulary.entry(token).or_insert(next);
                if idx == doc_freq.len() {
                    doc_freq.push(0);
                }
                if !seen.contains(&idx) {
                    seen.push(idx);
                    doc_freq[idx] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// Number of distinct terms learned at fit time.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Project `text` into the fitted space. Terms unseen at fit time
    /// are ignored; text with no known terms yields an empty vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();
        vector.sort_unstable_by_key(|&(idx, _)| idx);
        l2_normalize(&mut vector);
        vector
    }
}

fn l2_normalize(vector: &mut SparseVector) {
    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm < 1e-12 {
        return;
    }
    for (_, w) in vector.iter_mut() {
        *w /= norm;
    }
}

/// Cosine similarity of two L2-normalized sparse vectors, clamped to `[0, 1]`.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot.clamp(0.0, 1.0)
}

/// A stored answer that cleared the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    /// Position of the matched pair in the dataset.
    pub index: usize,
    /// The stored answer.
    pub answer: &'a str,
    /// Cosine similarity between the message and the stored question.
    pub score: f64,
}

/// Fitted vector space over a dataset's questions.
///
/// Read-only after construction; safe to share across threads.
#[derive(Debug, Clone)]
pub struct SimilarityMatcher {
    vectorizer: TfidfVectorizer,
    question_vectors: Vec<SparseVector>,
    answers: Vec<String>,
    threshold: f64,
}

impl SimilarityMatcher {
    /// Fit over `dataset`. Returns `None` for an empty dataset, which
    /// never gets a vector space.
    pub fn fit(dataset: &Dataset, threshold: f64) -> Option<Self> {
        if dataset.is_empty() {
            return None;
        }

        let questions = dataset.questions();
        let vectorizer = TfidfVectorizer::fit(&questions);
        let question_vectors = questions.iter().map(|q| vectorizer.transform(q)).collect();
        let answers = dataset.answers().into_iter().map(str::to_owned).collect();

        debug!(
            questions = questions.len(),
            terms = vectorizer.vocabulary_len(),
            "similarity space fitted"
        );

        Some(Self {
            vectorizer,
            question_vectors,
            answers,
            threshold,
        })
    }

    /// Acceptance threshold in use.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Similarity of `message` to every stored question, in dataset order.
    pub fn scores(&self, message: &str) -> Vec<f64> {
        let query = self.vectorizer.transform(&message.to_lowercase());
        self.question_vectors
            .iter()
            .map(|q| cosine_similarity(&query, q))
            .collect()
    }

    /// Best stored answer for `message`, if it scores strictly above the
    /// threshold. Ties go to the earliest pair in the dataset.
    pub fn best_match(&self, message: &str) -> Option<Match<'_>> {
        let mut best: Option<(usize, f64)> = None;
        for (index, score) in self.scores(message).into_iter().enumerate() {
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((index, score));
            }
        }

        let (index, score) = best?;
        trace!(index, score, "best similarity");
        if score > self.threshold {
            Some(Match {
                index,
                answer: &self.answers[index],
                score,
            })
        } else {
            None
        }
    }
}
