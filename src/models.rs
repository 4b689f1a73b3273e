use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PredictError;
use crate::labels::ClassLabelTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_class: String,
    pub confidence: f32,
    pub all_probs: Vec<f32>,
    pub classes: Vec<String>,
    pub predict_time_ms: f64,
}

impl PredictionResult {
    /// Picks the highest-scoring class. The probability vector must be as wide
    /// as the label table and hold only finite values.
    pub fn rank(
        probs: Vec<f32>,
        labels: &ClassLabelTable,
        elapsed: Duration,
    ) -> Result<Self, PredictError> {
        if probs.len() != labels.len() {
            return Err(PredictError::Inference(format!(
                "model returned {} scores for {} classes",
                probs.len(),
                labels.len()
            )));
        }

        if let Some(index) = probs.iter().position(|p| !p.is_finite()) {
            return Err(PredictError::Inference(format!(
                "model returned non-finite score {} at index {index}",
                probs[index]
            )));
        }

        // First maximum wins on ties.
        let (index, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, p)| match best {
                Some((_, top)) if p.total_cmp(&top).is_le() => best,
                _ => Some((i, p)),
            })
            .ok_or_else(|| PredictError::Inference("model returned no scores".into()))?;

        let predicted_class = labels
            .name(index)
            .ok_or_else(|| PredictError::Inference(format!("no label for index {index}")))?
            .to_string();

        Ok(Self {
            predicted_class,
            confidence,
            all_probs: probs,
            classes: labels.names().to_vec(),
            predict_time_ms: elapsed.as_secs_f64() * 1000.0,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub message: String,
}
