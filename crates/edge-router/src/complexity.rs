//! Prompt complexity scoring.

/// Maps prompt text to a score in [0, 1]. Pure and infallible.
pub trait ComplexityEstimator: Send + Sync {
    fn estimate(&self, prompt: &str) -> f64;
}

impl<F> ComplexityEstimator for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn estimate(&self, prompt: &str) -> f64 {
        self(prompt)
    }
}

/// Step function over the whitespace-delimited word count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordCountEstimator {
    /// (medium_from, complex_from) in words.
    pub thresholds: (usize, usize),
    /// (simple, medium, complex) scores.
    pub scores: (f64, f64, f64),
}

impl Default for WordCountEstimator {
    fn default() -> Self {
        Self { thresholds: (50, 200), scores: (0.2, 0.5, 0.8) }
    }
}

impl WordCountEstimator {
    pub fn word_count(prompt: &str) -> usize {
        prompt.split_whitespace().count()
    }
}

impl ComplexityEstimator for WordCountEstimator {
    fn estimate(&self, prompt: &str) -> f64 {
        let words = Self::word_count(prompt);
        if words < self.thresholds.0 {
            self.scores.0
        } else if words < self.thresholds.1 {
            self.scores.1
        } else {
            self.scores.2
        }
    }
}
