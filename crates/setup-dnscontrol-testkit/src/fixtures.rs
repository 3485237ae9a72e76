//! In-memory release archives
//!
//! Real dnscontrol releases ship `dnscontrol` at the root of a `.tar.gz`
//! (Linux, macOS) or `dnscontrol.exe` at the root of a `.zip` (Windows).
//! These builders produce the same shapes around a small shell script so the
//! verification step can actually execute the installed binary.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::{Cursor, Write};

/// A `/bin/sh` script standing in for dnscontrol.
///
/// `dnscontrol version` prints a version line and exits with
/// `exit_code`; any other invocation exits 0.
pub fn stub_binary(exit_code: i32) -> Vec<u8> {
    format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"version\" ]; then\n\
         \techo 'dnscontrol 3.16.0 (stub)'\n\
         \texit {exit_code}\n\
         fi\n\
         exit 0\n"
    )
    .into_bytes()
}

/// Builds a `.tar.gz` holding a single file at `entry_path`.
///
/// The entry is stored with mode 0644 on purpose: the installer has to set
/// the execute bits itself.
///
/// # Panics
///
/// Panics if the archive cannot be written (in-memory, so only on bugs).
pub fn tar_gz_with_entry(entry_path: &str, contents: &[u8]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let mut header = tar::Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_cksum();

    builder
        .append_data(&mut header, entry_path, contents)
        .expect("Failed to append tar entry");

    let encoder = builder.into_inner().expect("Failed to finish tar archive");
    encoder.finish().expect("Failed to finish gzip stream")
}

/// Builds a `.zip` holding a single file at `entry_path`.
///
/// # Panics
///
/// Panics if the archive cannot be written (in-memory, so only on bugs).
pub fn zip_with_entry(entry_path: &str, contents: &[u8]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));

    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    zip.start_file(entry_path, options)
        .expect("Failed to start zip entry");
    zip.write_all(contents).expect("Failed to write zip entry");

    zip.finish().expect("Failed to finish zip archive").into_inner()
}
