//! Output writers for the collected records
//!
//! Listing records go to CSV with a header row; profile records go to a
//! pretty-printed JSON array with 4-space indentation and literal non-ASCII.
//! Parent directories are created as needed.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::domain::{ListingRecord, ProfileRecord};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error writing {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Create the parent directory of `path` if it has one
pub fn ensure_parent_dir(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(io_error(path))
        }
        _ => Ok(()),
    }
}

/// Write listing records as CSV, header `pet_id,link,name,sex,age,photo_url`
pub fn write_listing_csv(path: &Path, records: &[ListingRecord]) -> Result<(), ExportError> {
    ensure_parent_dir(path)?;
    let csv_error = |source| ExportError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for record in records {
        writer.serialize(record).map_err(csv_error)?;
    }
    writer.flush().map_err(io_error(path))?;

    debug!("Wrote {} rows to {:?}", records.len(), path);
    Ok(())
}

/// Write profile records as a pretty JSON array
pub fn write_profiles_json(path: &Path, profiles: &[ProfileRecord]) -> Result<(), ExportError> {
    ensure_parent_dir(path)?;

    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);

    profiles
        .serialize(&mut serializer)
        .map_err(|source| ExportError::Json {
            path: path.display().to_string(),
            source,
        })?;
    writer.flush().map_err(io_error(path))?;

    debug!("Wrote {} profiles to {:?}", profiles.len(), path);
    Ok(())
}
