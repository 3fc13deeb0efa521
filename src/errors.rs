// ABOUTME: Error types for the slidecraft application
// ABOUTME: Provides structured error handling for each stage of the deck pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to fetch remote resource: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid resource path: {0}")]
    InvalidResourcePath(String),

    #[error("Image decoding error: {0}")]
    ImageError(String),

    #[error("Content map error: {0}")]
    ContentMapError(String),

    #[error("Template error: {0}")]
    TemplateError(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Chart rendering error: {0}")]
    ChartError(String),

    #[error("Table rendering error: {0}")]
    TableError(String),

    #[error("PPTX generation error: {0}")]
    PptxError(String),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Generator error: {0}")]
    GeneratorError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::UnknownError(err.to_string())
    }
}

impl From<zip::result::ZipError> for DeckError {
    fn from(err: zip::result::ZipError) -> Self {
        DeckError::PptxError(format!("ZIP operation failed: {}", err))
    }
}

impl From<image::ImageError> for DeckError {
    fn from(err: image::ImageError) -> Self {
        DeckError::ImageError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
