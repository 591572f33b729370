//! CSV report writer
//!
//! The report has a fixed header `h1,meta_des,title,URL` followed by one
//! row per record. The file is created before the crawl starts so an
//! unwritable destination aborts the run before any request is made.

use crate::state::ResolvedRecord;
use crate::ScrapeError;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Column names of the report, in order
pub const REPORT_HEADER: [&str; 4] = ["h1", "meta_des", "title", "URL"];

/// An opened report destination
pub struct CsvReport {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvReport {
    /// Creates (or truncates) the report file
    pub fn create(path: &Path) -> Result<Self, ScrapeError> {
        let writer = csv::Writer::from_path(path).map_err(|source| ScrapeError::Report {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the header and every row, then flushes the file
    pub fn write(mut self, rows: &[ResolvedRecord]) -> Result<(), ScrapeError> {
        write_rows(&mut self.writer, rows).map_err(|source| ScrapeError::Report {
            path: self.path.clone(),
            source,
        })
    }
}

/// Writes the header and `rows` to any CSV writer
pub fn write_rows<W: io::Write>(
    writer: &mut csv::Writer<W>,
    rows: &[ResolvedRecord],
) -> csv::Result<()> {
    writer.write_record(REPORT_HEADER)?;
    for row in rows {
        writer.write_record([
            row.h1.as_str(),
            row.meta_description.as_str(),
            row.title.as_str(),
            row.url.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
