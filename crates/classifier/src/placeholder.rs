// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Synthesized placeholder model
//!
//! When neither object storage nor the local filesystem yields a usable
//! model, the service falls back to a tiny model trained in-process on a
//! fixed built-in corpus. Its predictions are not meaningful; it exists so
//! the API stays up and the degraded state stays observable through load
//! provenance.

use tracing::debug;

use crate::{
    Vectorizer, error::TrainingError, model::LogisticRegression, vectorizer::TfidfVectorizer,
};

/// Built-in training corpus for the placeholder model.
const CORPUS: [&str; 3] = [
    "This is real news",
    "This is fake news",
    "Another real story",
];

/// Class indices for [`CORPUS`]: real, fake, real.
const LABELS: [usize; 3] = [0, 1, 0];

const MAX_FEATURES: usize = 100;
const EPOCHS: usize = 500;
const LEARNING_RATE: f64 = 0.5;

/// Train the placeholder (model, vectorizer) pair.
///
/// This has no external dependency and is the terminal tier of the loader's
/// fallback chain.
///
/// # Errors
///
/// Fails only if the built-in corpus cannot be fit, which indicates a
/// programming error rather than an environmental one.
pub fn synthesize() -> Result<(LogisticRegression, TfidfVectorizer), TrainingError> {
    let vectorizer = TfidfVectorizer::fit(&CORPUS, MAX_FEATURES)?;

    let samples: Vec<Vec<f64>> = CORPUS.iter().map(|text| vectorizer.transform(text)).collect();
    let model = LogisticRegression::fit(&samples, &LABELS, EPOCHS, LEARNING_RATE)?;

    debug!(
        features = vectorizer.dimension(),
        "synthesized placeholder model"
    );

    Ok((model, vectorizer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Classifier, Label, Vectorizer};

    #[test]
    fn synthesize_always_succeeds() {
        assert!(synthesize().is_ok());
    }

    #[test]
    fn placeholder_fits_its_own_corpus() {
        let (model, vectorizer) = synthesize().unwrap();

        for (text, &label) in CORPUS.iter().zip(&LABELS) {
            let features = vectorizer.transform(text);
            assert_eq!(model.predict(&features), label, "misclassified {text:?}");
        }
    }

    #[test]
    fn real_news_classified_as_real() {
        let (model, vectorizer) = synthesize().unwrap();

        let features = vectorizer.transform("This is real news");
        let [p_real, p_fake] = model.predict_probabilities(&features);

        assert_eq!(Label::from_class_index(model.predict(&features)), Label::Real);
        assert!(p_real > p_fake);
    }
}
