// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prediction engine
//!
//! Pairs a classifier with the vectorizer it was trained against and turns
//! raw text into labeled predictions. The engine is cheap to construct and
//! is built per request from a model-state snapshot, so an in-flight
//! prediction keeps using the pair it started with even while a reload
//! swaps in a new one.

use crate::{
    Classifier, Vectorizer,
    error::PredictionError,
    types::{BatchItem, BatchItemError, ClassProbabilities, Label, Prediction},
};

/// Largest number of items accepted by a single batch prediction.
pub const MAX_BATCH_SIZE: usize = 100;

/// Prediction engine over any (classifier, vectorizer) pair
#[derive(Debug)]
pub struct PredictionEngine<C, V> {
    model: C,
    vectorizer: V,
}

impl<C: Classifier, V: Vectorizer> PredictionEngine<C, V> {
    /// Pair a classifier with its vectorizer.
    pub fn new(model: C, vectorizer: V) -> Self {
        Self { model, vectorizer }
    }

    /// Predict the label for a single text.
    ///
    /// Probabilities are trusted to arrive normalized from the model; the
    /// engine does not re-normalize.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::EmptyText`] for empty or whitespace-only
    /// input.
    pub fn predict(&self, text: &str) -> Result<Prediction, PredictionError> {
        if text.trim().is_empty() {
            return Err(PredictionError::EmptyText);
        }

        let features = self.vectorizer.transform(text);
        let [p_real, p_fake] = self.model.predict_probabilities(&features);
        let probabilities = ClassProbabilities {
            real: p_real,
            fake: p_fake,
        };

        Ok(Prediction {
            prediction: Label::from_class_index(self.model.predict(&features)),
            confidence: probabilities.max(),
            probabilities,
        })
    }

    /// Predict labels for a batch of texts, preserving input order.
    ///
    /// Blank items become structured per-item error entries instead of
    /// failing the whole batch.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::BatchTooLarge`] when the batch exceeds
    /// [`MAX_BATCH_SIZE`]; the batch is then rejected wholesale.
    pub fn predict_batch(&self, texts: &[String]) -> Result<Vec<BatchItem>, PredictionError> {
        if texts.len() > MAX_BATCH_SIZE {
            return Err(PredictionError::BatchTooLarge { len: texts.len() });
        }

        Ok(texts
            .iter()
            .map(|text| match self.predict(text) {
                Ok(prediction) => BatchItem::Prediction(prediction),
                Err(e) => BatchItem::Error(BatchItemError::new(e.to_string())),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder;

    fn engine() -> PredictionEngine<crate::LogisticRegression, crate::TfidfVectorizer> {
        let (model, vectorizer) = placeholder::synthesize().unwrap();
        PredictionEngine::new(model, vectorizer)
    }

    #[test]
    fn probabilities_sum_to_one_and_confidence_is_max() {
        let engine = engine();

        for text in ["This is real news", "fake story", "completely unrelated"] {
            let result = engine.predict(text).unwrap();
            let sum = result.probabilities.real + result.probabilities.fake;
            assert!((sum - 1.0).abs() < 1e-6, "probabilities for {text:?}");
            assert_eq!(result.confidence, result.probabilities.max());
        }
    }

    #[test]
    fn label_tracks_argmax_in_both_directions() {
        let engine = engine();

        let real = engine.predict("This is real news").unwrap();
        assert_eq!(real.prediction, Label::Real);
        assert!(real.probabilities.real > real.probabilities.fake);

        let fake = engine.predict("This is fake news").unwrap();
        assert_eq!(fake.prediction, Label::Fake);
        assert!(fake.probabilities.fake > fake.probabilities.real);
    }

    #[test]
    fn empty_text_is_rejected() {
        let engine = engine();

        assert!(matches!(
            engine.predict(""),
            Err(PredictionError::EmptyText)
        ));
        assert!(matches!(
            engine.predict("   \t\n"),
            Err(PredictionError::EmptyText)
        ));
    }

    #[test]
    fn oversized_batch_is_rejected_wholesale() {
        let engine = engine();
        let texts: Vec<String> = (0..101).map(|i| format!("news item {i}")).collect();

        assert!(matches!(
            engine.predict_batch(&texts),
            Err(PredictionError::BatchTooLarge { len: 101 })
        ));
    }

    #[test]
    fn batch_at_limit_is_accepted() {
        let engine = engine();
        let texts: Vec<String> = (0..100).map(|i| format!("news item {i}")).collect();

        assert_eq!(engine.predict_batch(&texts).unwrap().len(), 100);
    }

    #[test]
    fn blank_batch_item_becomes_error_entry_in_order() {
        let engine = engine();
        let texts: Vec<String> = [
            "This is real news",
            "This is fake news",
            "   ",
            "Another real story",
            "one more fake story",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        let results = engine.predict_batch(&texts).unwrap();

        assert_eq!(results.len(), 5);
        assert!(!results[0].is_error());
        assert!(!results[1].is_error());
        assert!(results[2].is_error());
        assert!(!results[3].is_error());
        assert!(!results[4].is_error());
    }
}
