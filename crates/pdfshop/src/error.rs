use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfshopError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Unsupported compression quality: {0}")]
    InvalidQuality(String),

    #[error("Unsupported archive format: {0}")]
    InvalidArchiveFormat(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Input directory '{0}' does not exist or is not a directory")]
    BadInputRoot(PathBuf),

    #[error("Directory scan failed for '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Required tool '{tool}' is not available: {reason}")]
    ToolUnavailable { tool: PathBuf, reason: String },

    #[error("Batch aborted: output directory '{0}' is not empty")]
    Aborted(PathBuf),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to inspect output directory '{path}': {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete '{path}': {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to write archive '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan folder '{path}': {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive tool '{0}' not found")]
    ToolMissing(String),

    #[error("Archive tool exited with status {status}: {stderr}")]
    ToolFailed { status: i32, stderr: String },
}

pub type Result<T> = std::result::Result<T, PdfshopError>;
