// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Binary logistic-regression classifier

use serde::{Deserialize, Serialize};

use crate::{Classifier, error::TrainingError};

/// Binary logistic-regression model over dense feature vectors.
///
/// Remote and local artifacts arrive pre-trained; [`LogisticRegression::fit`]
/// exists for the synthesized placeholder and for tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    bias: f64,
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LogisticRegression {
    /// Human-readable model-type tag recorded in load provenance.
    pub const MODEL_TYPE: &'static str = "LogisticRegression";

    /// Train by full-batch gradient descent.
    ///
    /// `labels` holds class indices (0 = real, 1 = fake), one per sample.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::EmptyCorpus`] for an empty training set and
    /// [`TrainingError::LabelMismatch`] when samples and labels disagree in
    /// length.
    pub fn fit(
        samples: &[Vec<f64>],
        labels: &[usize],
        epochs: usize,
        learning_rate: f64,
    ) -> Result<Self, TrainingError> {
        if samples.is_empty() {
            return Err(TrainingError::EmptyCorpus);
        }
        if samples.len() != labels.len() {
            return Err(TrainingError::LabelMismatch {
                samples: samples.len(),
                labels: labels.len(),
            });
        }

        let dimension = samples[0].len();
        let sample_count = samples.len() as f64;
        let mut weights = vec![0.0; dimension];
        let mut bias = 0.0;

        for _ in 0..epochs {
            let mut weight_gradient = vec![0.0; dimension];
            let mut bias_gradient = 0.0;

            for (features, &label) in samples.iter().zip(labels) {
                let z = dot(&weights, features) + bias;
                let residual = sigmoid(z) - if label == 1 { 1.0 } else { 0.0 };

                for (gradient, &value) in weight_gradient.iter_mut().zip(features) {
                    *gradient += residual * value;
                }
                bias_gradient += residual;
            }

            for (weight, gradient) in weights.iter_mut().zip(&weight_gradient) {
                *weight -= learning_rate * gradient / sample_count;
            }
            bias -= learning_rate * bias_gradient / sample_count;
        }

        Ok(Self { weights, bias })
    }

    /// Number of features this model was trained on.
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Structural checks applied when an artifact is decoded from storage.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.weights.is_empty() {
            return Err("model has no weights".to_string());
        }
        if self.weights.iter().any(|weight| !weight.is_finite()) || !self.bias.is_finite() {
            return Err("model weights contain non-finite values".to_string());
        }
        Ok(())
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &[f64]) -> usize {
        let [_, p_fake] = self.predict_probabilities(features);
        usize::from(p_fake >= 0.5)
    }

    fn predict_probabilities(&self, features: &[f64]) -> [f64; 2] {
        let p_fake = sigmoid(dot(&self.weights, features) + self.bias);
        [1.0 - p_fake, p_fake]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_samples() -> (Vec<Vec<f64>>, Vec<usize>) {
        // One feature that is high exactly for the fake class.
        let samples = vec![
            vec![0.1, 0.9],
            vec![0.9, 0.1],
            vec![0.2, 0.8],
            vec![0.8, 0.2],
        ];
        let labels = vec![1, 0, 1, 0];
        (samples, labels)
    }

    #[test]
    fn fit_separates_classes() {
        let (samples, labels) = separable_samples();
        let model = LogisticRegression::fit(&samples, &labels, 500, 0.5).unwrap();

        for (features, &label) in samples.iter().zip(&labels) {
            assert_eq!(model.predict(features), label);
        }
    }

    #[test]
    fn probabilities_sum_to_one() {
        let (samples, labels) = separable_samples();
        let model = LogisticRegression::fit(&samples, &labels, 100, 0.5).unwrap();

        let [p_real, p_fake] = model.predict_probabilities(&[0.3, 0.7]);
        assert!((p_real + p_fake - 1.0).abs() < 1e-6);
    }

    #[test]
    fn fit_empty_set_fails() {
        assert!(matches!(
            LogisticRegression::fit(&[], &[], 10, 0.1),
            Err(TrainingError::EmptyCorpus)
        ));
    }

    #[test]
    fn fit_label_mismatch_fails() {
        let samples = vec![vec![1.0], vec![0.0]];
        assert!(matches!(
            LogisticRegression::fit(&samples, &[1], 10, 0.1),
            Err(TrainingError::LabelMismatch {
                samples: 2,
                labels: 1
            })
        ));
    }

    #[test]
    fn predict_matches_argmax() {
        let (samples, labels) = separable_samples();
        let model = LogisticRegression::fit(&samples, &labels, 500, 0.5).unwrap();

        for features in &samples {
            let [p_real, p_fake] = model.predict_probabilities(features);
            let argmax = usize::from(p_fake > p_real);
            assert_eq!(model.predict(features), argmax);
        }
    }
}
