use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The conversion a batch applies to every matched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ExtractText,
    Compress,
    Decompress,
}

impl Action {
    /// Extension (without the dot) of the files a batch selects.
    pub fn input_extension(&self) -> &'static str {
        "pdf"
    }

    /// Extension the mirrored destination path gets for this action.
    pub fn output_extension(&self) -> &'static str {
        match self {
            Action::ExtractText => "txt",
            Action::Compress | Action::Decompress => "pdf",
        }
    }

    /// Flag used to probe the tool for existence before a batch starts.
    /// qpdf answers `--help`; pdftotext and gs answer `-v`.
    pub fn probe_flag(&self) -> &'static str {
        match self {
            Action::ExtractText | Action::Compress => "-v",
            Action::Decompress => "--help",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "extract_text" => Ok(Action::ExtractText),
            "compress" => Ok(Action::Compress),
            "decompress" => Ok(Action::Decompress),
            other => Err(ConfigError::UnknownAction(other.to_string())),
        }
    }
}

/// Compression quality preset passed to the compressor as `-dPDFSETTINGS=/<quality>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Screen,
    Ebook,
    Prepress,
    Default,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Screen => "screen",
            Quality::Ebook => "ebook",
            Quality::Prepress => "prepress",
            Quality::Default => "default",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "screen" => Ok(Quality::Screen),
            "ebook" => Ok(Quality::Ebook),
            "prepress" => Ok(Quality::Prepress),
            "default" => Ok(Quality::Default),
            other => Err(ConfigError::InvalidQuality(other.to_string())),
        }
    }
}

/// How the finished output root is packed, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    None,
    Zip,
    TarGz,
    SevenZip,
}

impl ArchiveFormat {
    /// Extension appended to the output root's basename for the archive file.
    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::None => "",
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::SevenZip => "7z",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "none" => Ok(ArchiveFormat::None),
            "zip" => Ok(ArchiveFormat::Zip),
            "tar.gz" => Ok(ArchiveFormat::TarGz),
            "7z" => Ok(ArchiveFormat::SevenZip),
            other => Err(ConfigError::InvalidArchiveFormat(other.to_string())),
        }
    }
}

/// What to do when the output root already contains entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputPolicy {
    /// Existing files may be silently replaced by matching destination writes.
    Overwrite,
    /// Delete regular files directly inside the output root before running.
    Clear,
    /// Refuse to start the batch.
    Abort,
}

/// Everything a batch needs. Immutable once the batch starts.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub action: Action,
    pub tool_path: PathBuf,
    pub quality: Quality,
    pub extra_flags: Vec<String>,
    pub archive_format: ArchiveFormat,
    pub output_policy: OutputPolicy,
    /// Optional cap on a single tool invocation. Disabled by default: a stuck
    /// external tool blocks the batch, matching the historical behavior.
    pub tool_timeout: Option<Duration>,
}

impl JobRequest {
    pub fn new<P, Q, R>(input_root: P, output_root: Q, action: Action, tool_path: R) -> Self
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        R: AsRef<Path>,
    {
        Self {
            input_root: input_root.as_ref().to_path_buf(),
            output_root: output_root.as_ref().to_path_buf(),
            action,
            tool_path: tool_path.as_ref().to_path_buf(),
            quality: Quality::Ebook,
            extra_flags: Vec::new(),
            archive_format: ArchiveFormat::None,
            output_policy: OutputPolicy::Overwrite,
            tool_timeout: None,
        }
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_extra_flags(mut self, flags: Vec<String>) -> Self {
        self.extra_flags = flags;
        self
    }

    pub fn with_archive_format(mut self, format: ArchiveFormat) -> Self {
        self.archive_format = format;
        self
    }

    pub fn with_output_policy(mut self, policy: OutputPolicy) -> Self {
        self.output_policy = policy;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = Some(timeout);
        self
    }
}
