use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::inference::DEFAULT_MAX_UPLOAD_BYTES;
use crate::preprocess::{Normalization, ResizeFilter};

/// Local frontend dev servers allowed when no origin is configured.
pub const DEV_ORIGINS: &[&str] = &[
    "http://localhost:8080",
    "http://127.0.0.1:8080",
    "http://localhost:8081",
    "http://127.0.0.1:8081",
    "http://localhost:8082",
    "http://127.0.0.1:8082",
    "http://localhost:8083",
    "http://127.0.0.1:8083",
    "http://localhost:8084",
    "http://127.0.0.1:8084",
    "http://localhost:8085",
    "http://127.0.0.1:8085",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    #[value(alias = "prod")]
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Brain MRI tumor classification API
#[derive(Parser, Debug, Clone)]
#[command(name = "tumor-classifier", version)]
pub struct ServerConfig {
    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// HTTP worker threads (defaults to the number of CPUs)
    #[arg(long, env = "WORKERS")]
    pub workers: Option<usize>,

    /// Serialized ONNX network
    #[arg(long, env = "MODEL_PATH", default_value = "model/brain_tumor_model.onnx")]
    pub model_path: PathBuf,

    /// JSON object mapping class name to output index
    #[arg(
        long,
        env = "CLASS_INDEX_PATH",
        default_value = "model/tumor_class_indices.json"
    )]
    pub labels_path: PathBuf,

    /// CORS origin, repeatable or comma separated; `*` allows any
    #[arg(long = "allowed-origin", env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Largest accepted upload in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    #[arg(long, env = "RESIZE_FILTER", value_enum, default_value_t = ResizeFilter::CatmullRom)]
    pub resize_filter: ResizeFilter,

    #[arg(long, env = "NORMALIZATION", value_enum, default_value_t = Normalization::Unit)]
    pub normalization: Normalization,

    #[arg(long, env = "ENVIRONMENT", value_enum, default_value_t = Environment::Development)]
    pub environment: Environment,
}

impl ServerConfig {
    pub fn origins(&self) -> Vec<String> {
        if self.allowed_origins.is_empty() {
            DEV_ORIGINS.iter().map(|o| o.to_string()).collect()
        } else {
            self.allowed_origins.clone()
        }
    }
}
