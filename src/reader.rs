//! Record source
//!
//! Reads the raw flow rows of a capture in file order.
use crate::config::ColumnLayout;
use crate::errors::EvalError;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Identity and label fields of one flow row, as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub src_ip: String,
    pub src_port: String,
    pub dst_ip: String,
    pub dst_port: String,
    pub label: String,
}

impl RawRecord {
    /// Identity fields in encoding order.
    pub fn identity(&self) -> [&str; 4] {
        [&self.src_ip, &self.dst_ip, &self.src_port, &self.dst_port]
    }

    fn from_row(row: &StringRecord, layout: &ColumnLayout, row_number: usize) -> Result<Self, EvalError> {
        if row.len() < layout.min_fields() {
            return Err(EvalError::MalformedRecord(
                row_number,
                format!("expected at least {} fields, found {}", layout.min_fields(), row.len()),
            ));
        }
        let field = |i: usize| row.get(i).unwrap_or_default().trim().to_string();
        Ok(RawRecord {
            src_ip: field(layout.src_ip),
            src_port: field(layout.src_port),
            dst_ip: field(layout.dst_ip),
            dst_port: field(layout.dst_port),
            label: field(layout.label),
        })
    }
}

/// Read every row of a comma separated file.
///
/// * `path` - File to read.
/// * `layout` - Positions of the fields to extract.
/// * `has_headers` - Skip the first row.
pub fn read_records<P: AsRef<Path>>(
    path: P,
    layout: &ColumnLayout,
    has_headers: bool,
) -> Result<Vec<RawRecord>, EvalError> {
    let file = File::open(path.as_ref())
        .map_err(|e| EvalError::UnableToRead(format!("{}: {}", path.as_ref().display(), e)))?;
    read_records_from(file, layout, has_headers)
}

/// Read every row from any reader. Rows are numbered from 1, excluding the header.
pub fn read_records_from<R: Read>(
    reader: R,
    layout: &ColumnLayout,
    has_headers: bool,
) -> Result<Vec<RawRecord>, EvalError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(reader);
    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row.map_err(|e| EvalError::UnableToRead(e.to_string()))?;
        records.push(RawRecord::from_row(&row, layout, i + 1)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn layout() -> ColumnLayout {
        ColumnLayout {
            src_ip: 0,
            src_port: 1,
            dst_ip: 2,
            dst_port: 3,
            label: 4,
        }
    }

    #[test]
    fn test_read_rows_in_order() {
        let body = "10.0.0.1,80,10.0.0.9,443,Syn\n10.0.0.2, 81 ,10.0.0.9,443,BENIGN,extra\n";
        let records = read_records_from(body.as_bytes(), &layout(), false).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].src_ip, "10.0.0.1");
        assert_eq!(records[0].label, "Syn");
        assert_eq!(records[1].src_port, "81");
        assert_eq!(records[1].identity(), ["10.0.0.2", "10.0.0.9", "81", "443"]);
    }

    #[test]
    fn test_headers_skipped() {
        let body = "src,sport,dst,dport,label\n1.1.1.1,1,2.2.2.2,2,Syn\n";
        let records = read_records_from(body.as_bytes(), &layout(), true).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dst_ip, "2.2.2.2");
    }

    #[test]
    fn test_short_row_is_malformed() {
        let body = "1.1.1.1,1,2.2.2.2,2,Syn\n1.1.1.1,1,2.2.2.2\n";
        let res = read_records_from(body.as_bytes(), &layout(), false);
        assert!(matches!(res, Err(EvalError::MalformedRecord(2, _))));
    }

    #[test]
    fn test_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flows.csv");
        fs::write(&path, "1.1.1.1,1,2.2.2.2,2,Syn\n").unwrap();
        assert_eq!(read_records(&path, &layout(), false).unwrap().len(), 1);
        let missing = read_records(dir.path().join("missing.csv"), &layout(), false);
        assert!(matches!(missing, Err(EvalError::UnableToRead(_))));
    }
}
