//! Broken image report: one `<image-url>,<article-title>` record per image
//! that could not be rehosted.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use blogarc_core::BrokenImageLink;
use thiserror::Error;

pub(crate) const DEFAULT_REPORT_PATH: &str = "blogger_broken_image_links.csv";

#[derive(Debug, Error)]
pub(crate) enum ReportError {
    #[error("report file {} already exists; move it away or pass --report", .0.display())]
    AlreadyExists(PathBuf),

    #[error("failed to write report {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fails if `path` already exists. Runs before the crawl starts.
pub(crate) fn ensure_absent(path: &Path) -> Result<(), ReportError> {
    match path.try_exists() {
        Ok(false) => Ok(()),
        Ok(true) => Err(ReportError::AlreadyExists(path.to_path_buf())),
        Err(source) => Err(ReportError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes every link to a new file at `path`. The file is created even when
/// `links` is empty.
///
/// # Errors
///
/// [`ReportError::AlreadyExists`] if the file appeared since the run started,
/// [`ReportError::Io`] for any other I/O failure.
pub(crate) fn write_report(path: &Path, links: &[BrokenImageLink]) -> Result<(), ReportError> {
    let io_error = |source: std::io::Error| {
        if source.kind() == std::io::ErrorKind::AlreadyExists {
            ReportError::AlreadyExists(path.to_path_buf())
        } else {
            ReportError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    };

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    for link in links {
        writeln!(writer, "{}", link.to_csv_line()).map_err(io_error)?;
    }
    writer.flush().map_err(io_error)?;

    tracing::info!(path = %path.display(), lines = links.len(), "broken image report written");
    Ok(())
}
