//! Control loop archiving
//!
//! Controllers write one CSV record per tick into the session's archive
//! directory. These archives are the input to the offline gain fitting
//! utility, which polyfits gain-versus-speed curves out of them, so the
//! column layout of a record should only change together with that tool.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::Path;
use thiserror::Error;

pub use csv::Writer;

// Internal imports
use crate::session::{get_elapsed_seconds, Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot create the archive file: {0}")]
    FileError(std::io::Error),

    #[error("Cannot serialise the record: {0}")]
    CsvError(csv::Error),

    #[error("The archiver has no initialised writer")]
    NotInitialised,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a particular path relative to the
    /// session's archive root.
    pub fn from_path<P: AsRef<Path>>(session: &Session, path: P) -> Result<Self, ArchiveError> {
        let mut session_path = session.arch_root.clone();
        session_path.push(path);

        // Create parent directories and the file if they do not exist
        if let Some(parent) = session_path.parent() {
            std::fs::create_dir_all(parent).map_err(ArchiveError::FileError)?;
        }
        File::create(session_path.clone()).map_err(ArchiveError::FileError)?;

        // Open the file in append mode
        let file = OpenOptions::new()
            .append(true)
            .open(session_path)
            .map_err(ArchiveError::FileError)?;

        let w = WriterBuilder::new().has_headers(true).from_writer(file);

        Ok(Self { writer: Some(w) })
    }

    /// Serialise a record into the archive.
    ///
    /// Records must be flat structs of scalar fields, the CSV writer does
    /// not flatten nested containers. Use [`timestamp`] for the `time_s`
    /// column.
    pub fn serialise<T: Serialize>(&mut self, record: T) -> Result<(), ArchiveError> {
        match self.writer {
            Some(ref mut w) => {
                w.serialize(record).map_err(ArchiveError::CsvError)?;
                w.flush().map_err(ArchiveError::FileError)?;
            }
            None => return Err(ArchiveError::NotInitialised),
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the timestamp value to put in a record's `time_s` column.
pub fn timestamp() -> f64 {
    get_elapsed_seconds()
}
