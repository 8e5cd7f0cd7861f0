//! Profile targets read from the listing CSV
//!
//! The file must have `pet_id` and `link` header columns; other columns are
//! ignored. Rows with an empty `pet_id` or `link` are skipped with a warning.

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::domain::ProfileTarget;

const REQUIRED_COLUMNS: [&str; 2] = ["pet_id", "link"];

#[derive(Error, Debug)]
pub enum TargetsError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV header in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no '{column}' column")]
    MissingColumn { path: String, column: &'static str },
}

#[derive(Debug, Deserialize)]
struct TargetRow {
    pet_id: Option<String>,
    link: Option<String>,
}

/// Targets in file order plus the number of rows that were skipped
#[derive(Debug, Default)]
pub struct TargetList {
    pub targets: Vec<ProfileTarget>,
    pub skipped_rows: usize,
}

/// Read targets from a CSV file
pub fn read_targets(path: &Path) -> Result<TargetList, TargetsError> {
    let file = File::open(path).map_err(|source| TargetsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_targets_from(file, &path.display().to_string())
}

/// Read targets from any CSV source; `source_name` is used in messages
pub fn read_targets_from<R: Read>(input: R, source_name: &str) -> Result<TargetList, TargetsError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers = reader.headers().map_err(|source| TargetsError::Csv {
        path: source_name.to_string(),
        source,
    })?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(TargetsError::MissingColumn {
                path: source_name.to_string(),
                column,
            });
        }
    }

    let mut list = TargetList::default();
    for (index, row) in reader.deserialize::<TargetRow>().enumerate() {
        // Line 1 is the header
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping unreadable row at line {}: {}", line, e);
                list.skipped_rows += 1;
                continue;
            }
        };

        match (non_empty(row.pet_id), non_empty(row.link)) {
            (None, _) => {
                warn!("Skipping row with missing pet_id (line {}).", line);
                list.skipped_rows += 1;
            }
            (_, None) => {
                warn!("Skipping row with missing link (line {}).", line);
                list.skipped_rows += 1;
            }
            (Some(pet_id), Some(link)) => list.targets.push(ProfileTarget { pet_id, link }),
        }
    }

    Ok(list)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_rows_and_ignores_extra_columns() {
        let csv = "pet_id,link,name,sex,age,photo_url\n\
                   1728,https://dogcat.com.ua/pet/piksel,Піксель,Хлопчик,1 місяць,https://x/1.jpg\n\
                   1727,https://dogcat.com.ua/pet/cimba,Цімба,Хлопчик,2 місяці,https://x/2.jpg\n";

        let list = read_targets_from(csv.as_bytes(), "data.csv").unwrap();
        assert_eq!(
            list.targets,
            [
                ProfileTarget::new("1728", "https://dogcat.com.ua/pet/piksel"),
                ProfileTarget::new("1727", "https://dogcat.com.ua/pet/cimba"),
            ]
        );
        assert_eq!(list.skipped_rows, 0);
    }

    #[test]
    fn test_rows_with_empty_fields_are_skipped() {
        let csv = "link,pet_id\n\
                   https://dogcat.com.ua/pet/a,1\n\
                   https://dogcat.com.ua/pet/b,\n\
                   ,3\n\
                   https://dogcat.com.ua/pet/d,4\n";

        let list = read_targets_from(csv.as_bytes(), "data.csv").unwrap();
        let ids: Vec<&str> = list.targets.iter().map(|t| t.pet_id.as_str()).collect();
        assert_eq!(ids, ["1", "4"]);
        assert_eq!(list.skipped_rows, 2);
    }

    #[test]
    fn test_short_row_is_skipped() {
        let csv = "pet_id,link\n1\n2,https://dogcat.com.ua/pet/b\n";

        let list = read_targets_from(csv.as_bytes(), "data.csv").unwrap();
        assert_eq!(list.targets, [ProfileTarget::new("2", "https://dogcat.com.ua/pet/b")]);
        assert_eq!(list.skipped_rows, 1);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "pet_id,url\n1,https://dogcat.com.ua/pet/a\n";

        let err = read_targets_from(csv.as_bytes(), "data.csv").unwrap_err();
        assert!(matches!(err, TargetsError::MissingColumn { column: "link", .. }));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_targets(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, TargetsError::Io { .. }));
    }
}
