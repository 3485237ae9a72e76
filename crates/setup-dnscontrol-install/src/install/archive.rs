//! Archive formats and safe extraction.
//!
//! Entries are unpacked into a fresh staging directory. tar entries go
//! through `unpack_in` and zip entries through `enclosed_name`, so an entry
//! like `../../etc/passwd` can never land outside of it.

use setup_dnscontrol_core::{Result, SetupError, TOOL_NAME};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Release archive formats, inferred from the artifact URI suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    /// Infers the format from the URI (or file name) suffix.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for any other suffix.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let lower = uri.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Ok(ArchiveFormat::TarGz)
        } else if lower.ends_with(".zip") {
            Ok(ArchiveFormat::Zip)
        } else {
            Err(SetupError::UnsupportedFormat {
                uri: uri.to_string(),
            })
        }
    }

    /// Name of the binary entry shipped in archives of this format.
    pub fn binary_entry(self) -> String {
        match self {
            ArchiveFormat::TarGz => TOOL_NAME.to_string(),
            ArchiveFormat::Zip => format!("{TOOL_NAME}.exe"),
        }
    }

    fn label(self) -> &'static str {
        match self {
            ArchiveFormat::TarGz => "tar.gz",
            ArchiveFormat::Zip => "zip",
        }
    }
}

/// Extracts `archive` into a new staging directory under `parent`.
///
/// The returned `TempDir` removes the staging tree when dropped.
///
/// # Errors
///
/// Returns `ExtractionFailed` for corrupt archives and `Io` for local
/// filesystem failures.
pub fn extract(archive: &Path, format: ArchiveFormat, parent: &Path) -> Result<TempDir> {
    let staging = tempfile::Builder::new()
        .prefix(".extract-")
        .tempdir_in(parent)
        .map_err(|e| SetupError::io("create extraction staging directory", e))?;

    let file = fs::File::open(archive)
        .map_err(|e| SetupError::io(format!("open archive {}", archive.display()), e))?;

    match format {
        ArchiveFormat::TarGz => extract_tar_gz(file, staging.path())?,
        ArchiveFormat::Zip => extract_zip(file, staging.path())?,
    }

    Ok(staging)
}

fn extraction_failed(format: ArchiveFormat, err: impl std::fmt::Display) -> SetupError {
    SetupError::ExtractionFailed {
        archive_type: format.label().to_string(),
        reason: err.to_string(),
    }
}

fn extract_tar_gz(file: fs::File, dest: &Path) -> Result<()> {
    let format = ArchiveFormat::TarGz;
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));

    for entry in archive
        .entries()
        .map_err(|e| extraction_failed(format, e))?
    {
        let mut entry = entry.map_err(|e| extraction_failed(format, e))?;
        entry
            .unpack_in(dest)
            .map_err(|e| extraction_failed(format, e))?;
    }

    Ok(())
}

fn extract_zip(file: fs::File, dest: &Path) -> Result<()> {
    let format = ArchiveFormat::Zip;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| extraction_failed(format, e))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| extraction_failed(format, e))?;

        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let outpath = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)
                .map_err(|e| SetupError::io(format!("create {}", outpath.display()), e))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SetupError::io(format!("create {}", parent.display()), e))?;
        }

        let mut outfile = fs::File::create(&outpath)
            .map_err(|e| SetupError::io(format!("create {}", outpath.display()), e))?;
        io::copy(&mut entry, &mut outfile)
            .map_err(|e| extraction_failed(format, format!("{}: {e}", outpath.display())))?;
    }

    Ok(())
}

/// Finds `binary_name` in an extracted tree, preferring the root.
///
/// # Errors
///
/// Returns `BinaryNotInArchive` when no regular file has that name.
pub fn find_binary(dir: &Path, binary_name: &str) -> Result<PathBuf> {
    let at_root = dir.join(binary_name);
    if at_root.is_file() {
        return Ok(at_root);
    }

    let wanted = OsStr::new(binary_name);
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            SetupError::io(format!("walk directory {}", dir.display()), io::Error::other(e))
        })?;

        if entry.file_type().is_file() && entry.file_name() == wanted {
            return Ok(entry.into_path());
        }
    }

    Err(SetupError::BinaryNotInArchive {
        binary_name: binary_name.to_string(),
    })
}
