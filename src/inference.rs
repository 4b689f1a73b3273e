use std::time::Instant;

use crate::error::PredictError;
use crate::models::PredictionResult;
use crate::preprocess::Preprocessor;
use crate::provider::ModelProvider;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Decode, score and rank a single upload.
pub struct InferenceService {
    provider: ModelProvider,
    preprocessor: Preprocessor,
    max_upload_bytes: usize,
}

impl InferenceService {
    pub fn new(
        provider: ModelProvider,
        preprocessor: Preprocessor,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            provider,
            preprocessor,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Blocking; callers on an async runtime should run this off the reactor.
    pub fn classify(&self, bytes: &[u8]) -> Result<PredictionResult, PredictError> {
        let tensor = self.preprocessor.preprocess(bytes)?;

        let started = Instant::now();
        let probs = self
            .provider
            .predict(&tensor)
            .map_err(|e| PredictError::Inference(format!("{e:#}")))?;
        let elapsed = started.elapsed();

        let result = PredictionResult::rank(probs, self.provider.labels(), elapsed)?;

        tracing::info!(
            predicted_class = %result.predicted_class,
            confidence = result.confidence,
            predict_time_ms = result.predict_time_ms,
            "Prediction"
        );

        Ok(result)
    }
}

/// Accepts any declared `image/*` type.
pub fn validate_content_type(content_type: Option<&str>) -> Result<(), PredictError> {
    match content_type {
        Some(mime) if mime.trim().to_ascii_lowercase().starts_with("image/") => Ok(()),
        _ => Err(PredictError::InvalidContentType),
    }
}
