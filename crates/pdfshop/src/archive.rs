use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;

use flate2::write::GzEncoder;
use flate2::Compression;
use log::{info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::ArchiveFormat;
use crate::error::ArchiveError;

/// External tool used for 7z archives, resolved from PATH.
const SEVEN_ZIP_PROGRAM: &str = "7z";

/// Default archive location: alongside the folder, named after its basename
/// with the format's extension.
pub fn default_archive_path(folder: &Path, format: ArchiveFormat) -> PathBuf {
    let mut file_name = folder
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    file_name.push(".");
    file_name.push(format.extension());

    folder
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(file_name)
}

/// Packs `folder` into `dest`. For zip and tar.gz, entry names are paths
/// relative to `folder`, preserving the mirrored tree exactly; the external
/// 7z tool prefixes entries with the folder's basename instead. On failure a
/// partially written archive file is left in place for inspection.
pub fn archive(folder: &Path, dest: &Path, format: ArchiveFormat) -> Result<(), ArchiveError> {
    let _span = tracing::info_span!("archive", format = ?format, dest = %dest.display()).entered();

    match format {
        ArchiveFormat::None => Ok(()),
        ArchiveFormat::Zip => write_zip(folder, dest),
        ArchiveFormat::TarGz => write_tar_gz(folder, dest),
        ArchiveFormat::SevenZip => run_seven_zip(folder, dest),
    }?;

    if format != ArchiveFormat::None {
        info!("Archived {} to {}", folder.display(), dest.display());
    }
    Ok(())
}

/// Files under `folder` paired with their archive entry names, in a stable
/// order.
fn collect_entries(folder: &Path) -> Result<Vec<(PathBuf, PathBuf)>, ArchiveError> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(folder).sort_by_file_name() {
        let entry = entry.map_err(|e| ArchiveError::Scan {
            path: folder.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(folder) else {
            continue;
        };
        entries.push((entry.path().to_path_buf(), relative.to_path_buf()));
    }
    Ok(entries)
}

fn write_zip(folder: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let file = File::create(dest).map_err(|e| ArchiveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, relative) in collect_entries(folder)? {
        // Zip entry names always use forward slashes.
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        zip.start_file(name, options)?;

        let mut source = File::open(&path).map_err(|e| ArchiveError::Write {
            path: path.clone(),
            source: e,
        })?;
        std::io::copy(&mut source, &mut zip).map_err(|e| ArchiveError::Write {
            path: dest.to_path_buf(),
            source: e,
        })?;
    }

    zip.finish()?;
    Ok(())
}

fn write_tar_gz(folder: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let file = File::create(dest).map_err(|e| ArchiveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (path, relative) in collect_entries(folder)? {
        builder
            .append_path_with_name(&path, &relative)
            .map_err(|e| ArchiveError::Write {
                path: dest.to_path_buf(),
                source: e,
            })?;
    }

    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .map_err(|e| ArchiveError::Write {
            path: dest.to_path_buf(),
            source: e,
        })?;
    Ok(())
}

/// Unlike the zip and tar.gz writers, `7z a` stores entries prefixed with
/// the folder's basename (`output/x.txt`, not `x.txt`).
fn run_seven_zip(folder: &Path, dest: &Path) -> Result<(), ArchiveError> {
    let output = Command::new(SEVEN_ZIP_PROGRAM)
        .args(["a", "-t7z"])
        .arg(dest)
        .arg(folder)
        .output();

    match output {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ArchiveError::ToolMissing(SEVEN_ZIP_PROGRAM.to_string()))
        }
        Err(e) => Err(ArchiveError::Write {
            path: dest.to_path_buf(),
            source: e,
        }),
        Ok(output) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!("7z failed for {}: {}", dest.display(), stderr);
            Err(ArchiveError::ToolFailed {
                status: output.status.code().unwrap_or(-1),
                stderr,
            })
        }
        Ok(_) => Ok(()),
    }
}
