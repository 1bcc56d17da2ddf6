// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! TF-IDF text vectorizer
//!
//! Fitted over a training corpus and serialized alongside the classifier;
//! transforming text through any other vectorizer than the one the model
//! was trained with produces garbage, which is why the loader treats the
//! pair as a unit.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Vectorizer, error::TrainingError};

/// TF-IDF vectorizer with a capped vocabulary and L2-normalized output.
///
/// Construction goes through [`TfidfVectorizer::fit`], so a value of this
/// type is always fitted; there is no unfitted state to misuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    max_features: usize,
}

/// Lowercased alphanumeric tokens of length two or more.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= 2)
        .map(str::to_string)
        .collect()
}

impl TfidfVectorizer {
    /// Fit a vectorizer over `documents`, keeping at most `max_features`
    /// terms (the most frequent across the corpus, ties broken
    /// alphabetically).
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::EmptyCorpus`] for an empty document list and
    /// [`TrainingError::EmptyVocabulary`] when tokenization yields no terms.
    pub fn fit(documents: &[&str], max_features: usize) -> Result<Self, TrainingError> {
        if documents.is_empty() {
            return Err(TrainingError::EmptyCorpus);
        }

        let mut term_counts: HashMap<String, u64> = HashMap::new();
        let mut document_frequency: HashMap<String, u64> = HashMap::new();

        for document in documents {
            let tokens = tokenize(document);
            for token in &tokens {
                *term_counts.entry(token.clone()).or_insert(0) += 1;
            }

            let mut seen: Vec<&String> = tokens.iter().collect();
            seen.sort();
            seen.dedup();
            for token in seen {
                *document_frequency.entry(token.clone()).or_insert(0) += 1;
            }
        }

        if term_counts.is_empty() {
            return Err(TrainingError::EmptyVocabulary);
        }

        // Most frequent terms first, alphabetical within a tie, so the
        // selected vocabulary is deterministic across fits.
        let mut terms: Vec<(String, u64)> = term_counts.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(max_features);

        // Indices are assigned in alphabetical order of the final vocabulary.
        let mut selected: Vec<String> = terms.into_iter().map(|(term, _)| term).collect();
        selected.sort();

        let document_count = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(selected.len());
        let mut idf = Vec::with_capacity(selected.len());

        for (index, term) in selected.into_iter().enumerate() {
            let df = document_frequency.get(&term).copied().unwrap_or(0) as f64;
            idf.push(((1.0 + document_count) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Ok(Self {
            vocabulary,
            idf,
            max_features,
        })
    }

    /// Number of features this vectorizer emits.
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Maximum vocabulary size this vectorizer was fit with.
    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Structural checks applied when an artifact is decoded from storage.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.vocabulary.is_empty() {
            return Err("vectorizer vocabulary is empty".to_string());
        }
        if self.vocabulary.len() != self.idf.len() {
            return Err(format!(
                "vocabulary has {} terms but {} IDF weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }
        for (term, &index) in &self.vocabulary {
            if index >= self.idf.len() {
                return Err(format!("term '{term}' maps to out-of-range index {index}"));
            }
        }
        if self.idf.iter().any(|weight| !weight.is_finite()) {
            return Err("IDF weights contain non-finite values".to_string());
        }
        Ok(())
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> Vec<f64> {
        let mut features = vec![0.0; self.idf.len()];

        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                features[index] += self.idf[index];
            }
        }

        let norm = features.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCS: [&str; 3] = [
        "This is real news",
        "This is fake news",
        "Another real story",
    ];

    #[test]
    fn fit_builds_vocabulary() {
        let vectorizer = TfidfVectorizer::fit(&DOCS, 100).unwrap();

        // "is", "this", "news", "real", "fake", "another", "story"
        assert_eq!(vectorizer.dimension(), 7);
        assert!(vectorizer.validate().is_ok());
    }

    #[test]
    fn fit_empty_corpus_fails() {
        assert!(matches!(
            TfidfVectorizer::fit(&[], 100),
            Err(TrainingError::EmptyCorpus)
        ));
    }

    #[test]
    fn fit_no_tokens_fails() {
        assert!(matches!(
            TfidfVectorizer::fit(&["a ! ?", "-"], 100),
            Err(TrainingError::EmptyVocabulary)
        ));
    }

    #[test]
    fn max_features_caps_vocabulary() {
        let vectorizer = TfidfVectorizer::fit(&DOCS, 3).unwrap();
        assert_eq!(vectorizer.dimension(), 3);
    }

    #[test]
    fn transform_is_l2_normalized() {
        let vectorizer = TfidfVectorizer::fit(&DOCS, 100).unwrap();
        let features = vectorizer.transform("real news about a real story");

        let norm = features.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn transform_unknown_tokens_is_zero_vector() {
        let vectorizer = TfidfVectorizer::fit(&DOCS, 100).unwrap();
        let features = vectorizer.transform("zebra quagga okapi");

        assert!(features.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn rare_terms_outweigh_common_ones() {
        let vectorizer = TfidfVectorizer::fit(&DOCS, 100).unwrap();

        // "fake" appears in one document, "is" in two; with a single-token
        // input each feature is the term's IDF before normalization.
        let fake = vectorizer.transform("fake");
        let is = vectorizer.transform("is");

        let fake_weight: f64 = fake.iter().sum();
        let is_weight: f64 = is.iter().sum();
        assert!(fake_weight > 0.0);
        assert!(is_weight > 0.0);
        // Normalized single-token vectors are unit length; compare raw IDF.
        let fake_idf = vectorizer.idf[*vectorizer.vocabulary.get("fake").unwrap()];
        let is_idf = vectorizer.idf[*vectorizer.vocabulary.get("is").unwrap()];
        assert!(fake_idf > is_idf);
    }
}
