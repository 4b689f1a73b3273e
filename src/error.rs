use std::path::PathBuf;

use actix_multipart::MultipartError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// Failures while loading the model or its label table. Any of these aborts startup.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("label file {path} is not a JSON object of class name to index: {source}")]
    LabelFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid class indices: {0}")]
    LabelIndices(String),
    #[error("failed to load model {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("warm-up inference failed: {0}")]
    WarmUp(String),
    #[error("model produces {actual} outputs but the label table has {expected} classes")]
    OutputWidth { expected: usize, actual: usize },
}

/// Per-request failures of the predict pipeline.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Please upload an image (JPG/PNG)")]
    InvalidContentType,
    #[error("Uploaded file is not a valid image. Please upload a proper image file.")]
    InvalidImage,
    #[error("Missing form field 'file'")]
    MissingFile,
    #[error("Uploaded file exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },
    /// Carries the rendered message only; `MultipartError` is not `Send` and
    /// this type crosses the blocking pool.
    #[error("Malformed multipart body: {0}")]
    Multipart(String),
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl From<MultipartError> for PredictError {
    fn from(err: MultipartError) -> Self {
        PredictError::Multipart(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        match self {
            PredictError::InvalidContentType
            | PredictError::InvalidImage
            | PredictError::Multipart(_) => StatusCode::BAD_REQUEST,
            PredictError::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            PredictError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            PredictError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}
