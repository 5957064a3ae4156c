//! Archive extraction.
//!
//! Each archive is unpacked into `<archives>/<normalized base name>/` and the
//! original file is deleted. Unpacking goes through a hidden staging
//! directory so a failed extraction leaves neither partial output nor a
//! deleted archive behind.

use crate::error::{ExtractionReason, SortError, SortResult};
use crate::normalize::normalize;
use crate::walker::FileEntry;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Bytes read from the head of a file to confirm its format.
const SNIFF_LEN: u64 = 512;

/// Archive formats that can be unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    /// Gzip-compressed tar.
    TarGz,
}

impl ArchiveFormat {
    /// Picks the format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "zip" => Some(Self::Zip),
            "tar" => Some(Self::Tar),
            "gz" | "tgz" => Some(Self::TarGz),
            _ => None,
        }
    }

    /// Whether the leading bytes of a file carry this format's signature.
    pub fn matches_content(&self, header: &[u8]) -> bool {
        match self {
            Self::Zip => infer::archive::is_zip(header),
            Self::Tar => infer::archive::is_tar(header),
            Self::TarGz => infer::archive::is_gz(header),
        }
    }

    fn unpack(&self, archive: &Path, destination: &Path) -> Result<(), ExtractionReason> {
        let file = File::open(archive)?;
        match self {
            Self::Zip => zip::ZipArchive::new(file)?.extract(destination)?,
            Self::Tar => unpack_tar(tar::Archive::new(file), destination)?,
            Self::TarGz => unpack_tar(tar::Archive::new(GzDecoder::new(file)), destination)?,
        }
        Ok(())
    }
}

/// Unpacks entry by entry. A stream whose first header block is zeroed reads
/// as an empty archive, which is reported instead of treated as success.
fn unpack_tar<R: Read>(
    mut archive: tar::Archive<R>,
    destination: &Path,
) -> Result<(), ExtractionReason> {
    let mut unpacked = 0usize;
    for entry in archive.entries()? {
        entry?.unpack_in(destination)?;
        unpacked += 1;
    }
    if unpacked == 0 {
        return Err(ExtractionReason::Empty);
    }
    Ok(())
}

fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut header)?;
    Ok(header)
}

/// Unpacks `entry` into a subfolder of `archives_dir` and deletes the archive.
///
/// Returns the names of the extracted files.
///
/// # Errors
///
/// What an error leaves behind depends on the stage that failed:
/// - Format checks and unpacking: the archive stays in place and nothing is
///   added to `archives_dir` apart from the folder itself.
/// - Moving the unpacked files into their subfolder: files moved so far stay
///   there, the rest is discarded with the staging directory and the
///   archive is kept, so a rerun extracts it again over the partial result.
/// - Deleting the archive: its contents are fully extracted and the archive
///   remains next to them.
pub fn extract(entry: &FileEntry, archives_dir: &Path) -> SortResult<Vec<String>> {
    let fail = |reason: ExtractionReason| SortError::ExtractionFailure {
        archive: entry.path.clone(),
        reason,
    };

    let format = ArchiveFormat::from_extension(&entry.extension)
        .ok_or_else(|| fail(ExtractionReason::UnsupportedFormat(entry.extension.clone())))?;
    let header = read_header(&entry.path).map_err(|e| fail(e.into()))?;
    if !format.matches_content(&header) {
        return Err(fail(ExtractionReason::UnsupportedFormat(
            entry.extension.clone(),
        )));
    }

    fs::create_dir_all(archives_dir).map_err(|e| SortError::DirectoryCreationFailed {
        path: archives_dir.to_path_buf(),
        source: e,
    })?;

    let staging = tempfile::Builder::new()
        .prefix(".extract-")
        .tempdir_in(archives_dir)
        .map_err(|e| fail(e.into()))?;
    format
        .unpack(&entry.path, staging.path())
        .map_err(&fail)?;

    let extracted = file_names_under(staging.path())
        .map_err(|e| fail(ExtractionReason::Io(e.into())))?;

    let target = extraction_target(entry, archives_dir);
    merge_into(staging.path(), &target).map_err(|e| fail(e.into()))?;
    staging.close().map_err(|e| fail(e.into()))?;

    fs::remove_file(&entry.path).map_err(|e| fail(e.into()))?;

    tracing::debug!(
        "Extracted {} file(s) from {} into {}",
        extracted.len(),
        entry.path.display(),
        target.display()
    );
    Ok(extracted)
}

/// Moves everything under `from` into `to`, merging directories that
/// already exist. Same-named files are overwritten.
fn merge_into(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::create_dir_all(to)?;
    for child in fs::read_dir(from)? {
        let child = child?;
        let dest = to.join(child.file_name());
        if child.file_type()?.is_dir() && dest.is_dir() {
            merge_into(&child.path(), &dest)?;
        } else {
            fs::rename(child.path(), &dest)?;
        }
    }
    Ok(())
}

fn file_names_under(dir: &Path) -> Result<Vec<String>, walkdir::Error> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Lists the names of all files under the archives folder, recursively.
///
/// A missing folder yields an empty list.
pub fn collect_archived_files(archives_dir: &Path) -> SortResult<Vec<String>> {
    if !archives_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names =
        file_names_under(archives_dir).map_err(|source| SortError::WalkFailure { source })?;
    names.sort();
    Ok(names)
}

/// Where `entry` would be unpacked inside `archives_dir`.
pub fn extraction_target(entry: &FileEntry, archives_dir: &Path) -> PathBuf {
    archives_dir.join(normalize(&entry.base_name))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use zip::write::SimpleFileOptions;

    /// Writes a zip archive holding `files` (name, content).
    pub fn write_zip(path: &Path, files: &[(&str, &str)]) {
        let file = File::create(path).expect("Failed to create zip");
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in files {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("Failed to start zip entry");
            writer
                .write_all(content.as_bytes())
                .expect("Failed to write zip entry");
        }
        writer.finish().expect("Failed to finish zip");
    }

    /// Writes a tar archive holding `files`, gzip-compressed when `gzip` is set.
    pub fn write_tar(path: &Path, files: &[(&str, &str)], gzip: bool) {
        let file = File::create(path).expect("Failed to create tar");
        if gzip {
            let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            let encoder = append_all(tar::Builder::new(encoder), files);
            encoder.finish().expect("Failed to finish gzip");
        } else {
            append_all(tar::Builder::new(file), files);
        }
    }

    fn append_all<W: Write>(mut builder: tar::Builder<W>, files: &[(&str, &str)]) -> W {
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .expect("Failed to append tar entry");
        }
        builder.into_inner().expect("Failed to finish tar")
    }
}
