use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use ndarray::Array4;
use tract_onnx::prelude::*;

use crate::error::ModelError;
use crate::labels::ClassLabelTable;
use crate::preprocess::{CHANNELS, INPUT_SIZE};

/// Scores a single preprocessed NHWC image tensor.
///
/// Implementations must be safe to call from several workers at once.
pub trait Classifier: Send + Sync {
    fn predict(&self, input: &Array4<f32>) -> anyhow::Result<Vec<f32>>;
}

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// ONNX network executed with tract. `run` builds fresh state per call so the
/// plan is shared without locking.
pub struct OnnxClassifier {
    plan: OnnxPlan,
}

impl OnnxClassifier {
    pub fn load(path: &Path, side: usize) -> Result<Self, ModelError> {
        let metadata = fs::metadata(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            size_mb = metadata.len() as f64 / (1024.0 * 1024.0),
            "Model file found"
        );

        let load_err = |e: TractError| ModelError::Load {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        };

        let started = Instant::now();
        let model = tract_onnx::onnx().model_for_path(path).map_err(load_err)?;
        let classifier = Self::from_model(model, side).map_err(load_err)?;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            input_shape = ?[1, side, side, CHANNELS],
            "Model loaded"
        );

        Ok(classifier)
    }

    /// Pins the input to `(1, side, side, 3)` f32 and optimizes the graph.
    fn from_model(model: InferenceModel, side: usize) -> TractResult<Self> {
        let plan = model
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, side, side, CHANNELS)),
            )?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self { plan })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: &Array4<f32>) -> anyhow::Result<Vec<f32>> {
        let data = input
            .as_slice()
            .context("input tensor is not in standard layout")?;
        let tensor = Tensor::from_shape(input.shape(), data)?;

        let outputs = self.plan.run(tvec!(tensor.into()))?;
        let probs = outputs
            .first()
            .context("model returned no outputs")?
            .to_array_view::<f32>()?;

        Ok(probs.iter().copied().collect())
    }
}

/// The loaded network and its label table, shared read-only by every request.
pub struct ModelProvider {
    classifier: Box<dyn Classifier>,
    labels: ClassLabelTable,
}

impl ModelProvider {
    pub fn load(model_path: &Path, labels_path: &Path) -> Result<Self, ModelError> {
        let labels = ClassLabelTable::load(labels_path)?;
        tracing::info!(classes = ?labels.names(), "Class indices loaded");

        let classifier = OnnxClassifier::load(model_path, INPUT_SIZE as usize)?;
        Self::new(Box::new(classifier), labels)
    }

    /// Runs one warm-up inference on an all-zero input to check that the
    /// output width matches the label table.
    pub fn new(
        classifier: Box<dyn Classifier>,
        labels: ClassLabelTable,
    ) -> Result<Self, ModelError> {
        let side = INPUT_SIZE as usize;
        let zeros = Array4::<f32>::zeros((1, side, side, CHANNELS));

        let started = Instant::now();
        let output = classifier
            .predict(&zeros)
            .map_err(|e| ModelError::WarmUp(format!("{e:#}")))?;

        if output.len() != labels.len() {
            return Err(ModelError::OutputWidth {
                expected: labels.len(),
                actual: output.len(),
            });
        }

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            outputs = output.len(),
            "Model ready"
        );

        Ok(Self { classifier, labels })
    }

    pub fn predict(&self, input: &Array4<f32>) -> anyhow::Result<Vec<f32>> {
        self.classifier.predict(input)
    }

    pub fn labels(&self) -> &ClassLabelTable {
        &self.labels
    }
}
