//! HTTP service classifying brain MRI scans into tumor types with a
//! pre-trained ONNX network.

pub mod config;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod labels;
pub mod logging;
pub mod models;
pub mod preprocess;
pub mod provider;
pub mod server;

pub use error::{ModelError, PredictError};
pub use inference::InferenceService;
pub use labels::ClassLabelTable;
pub use models::PredictionResult;
pub use preprocess::{Normalization, Preprocessor, ResizeFilter};
pub use provider::{Classifier, ModelProvider, OnnxClassifier};
