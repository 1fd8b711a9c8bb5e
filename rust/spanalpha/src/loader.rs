//! Highlighter export loading.
//!
//! The export is a CSV file (optionally gzip-compressed) with a header row.
//! Columns are located by header name, so exports carrying additional columns
//! load unchanged. All columns are read as text through `arrow-csv` and the
//! numeric fields are parsed here, which lets every bad value be reported
//! with its row number and column name.

use std::{
    fs::File,
    io::{Cursor, Read},
    path::Path,
    sync::Arc,
};

use arrow_array::{Array, RecordBatch, cast::AsArray};
use arrow_csv::reader::Format;
use arrow_schema::{DataType, Field, Schema};
use flate2::read::GzDecoder;
use spanalpha_common::{Result, error::Error, try_or_ret_some_err};

use crate::record::{AnnotationRow, AnnotationSet};

pub const DOCUMENT_ID_COLUMN: &str = "article_sha256";
pub const RATER_ID_COLUMN: &str = "contributor_uuid";
pub const TOPIC_NAME_COLUMN: &str = "topic_name";
pub const START_COLUMN: &str = "start_pos";
pub const END_COLUMN: &str = "end_pos";
pub const DOCUMENT_LENGTH_COLUMN: &str = "article_text_length";
pub const CREATED_COLUMN: &str = "created";
pub const TASKRUN_COUNT_COLUMN: &str = "taskrun_count";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const BATCH_SIZE: usize = 8192;

/// Opens an export for reading, gunzipping it when the file name ends in `.gz`.
///
/// The returned reader owns the file handle; dropping it closes the file.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| Error::io(path.display().to_string(), e))?;
    let is_gzip = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
    if is_gzip {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Loads an export file and groups its rows by document.
pub fn load_path(path: impl AsRef<Path>) -> Result<AnnotationSet> {
    let path = path.as_ref();
    let input = open_input(path)?;
    let set = load_annotations(input)?;
    log::info!(
        "Loaded {} rows for {} documents from '{}'",
        set.row_count(),
        set.len(),
        path.display()
    );
    Ok(set)
}

/// Reads an export from `input` and groups its rows by document.
///
/// An input without any bytes, or with a header only, yields an empty set.
pub fn load_annotations<R: Read>(input: R) -> Result<AnnotationSet> {
    let mut set = AnnotationSet::new();
    let Some(reader) = AnnotationReader::try_new(input)? else {
        return Ok(set);
    };
    for row in reader {
        set.push_row(row?)?;
    }
    Ok(set)
}

/// Positions of the known columns within the header.
#[derive(Debug, Clone)]
struct ColumnIndices {
    document_id: usize,
    rater_id: usize,
    topic_name: usize,
    start: usize,
    end: usize,
    document_length: usize,
    created: usize,
    taskrun_count: Option<usize>,
}

impl ColumnIndices {
    fn from_header(names: &[String]) -> Result<ColumnIndices> {
        let find = |wanted: &str| names.iter().position(|name| name.trim() == wanted);
        let require = |wanted: &str| find(wanted).ok_or_else(|| Error::missing_column(wanted));
        Ok(ColumnIndices {
            document_id: require(DOCUMENT_ID_COLUMN)?,
            rater_id: require(RATER_ID_COLUMN)?,
            topic_name: require(TOPIC_NAME_COLUMN)?,
            start: require(START_COLUMN)?,
            end: require(END_COLUMN)?,
            document_length: require(DOCUMENT_LENGTH_COLUMN)?,
            created: require(CREATED_COLUMN)?,
            taskrun_count: find(TASKRUN_COUNT_COLUMN),
        })
    }

    fn read_row(
        &self,
        batch: &RecordBatch,
        idx: usize,
        row_number: usize,
    ) -> Result<AnnotationRow> {
        let text = |col: usize, name: &str| required_field(batch, col, idx, name, row_number);
        let start = parse_position(text(self.start, START_COLUMN)?, START_COLUMN, row_number)?;
        let end = parse_position(text(self.end, END_COLUMN)?, END_COLUMN, row_number)?;
        let document_length = parse_position(
            text(self.document_length, DOCUMENT_LENGTH_COLUMN)?,
            DOCUMENT_LENGTH_COLUMN,
            row_number,
        )?;
        if document_length == 0 {
            return Err(Error::malformed_row(
                row_number,
                DOCUMENT_LENGTH_COLUMN,
                "document length must be positive",
            ));
        }
        if start > end {
            return Err(Error::malformed_row(
                row_number,
                END_COLUMN,
                format!("span {start}:{end} ends before it starts"),
            ));
        }
        if end > document_length {
            return Err(Error::malformed_row(
                row_number,
                END_COLUMN,
                format!("span {start}:{end} exceeds document length {document_length}"),
            ));
        }

        let taskrun_count = match self.taskrun_count {
            Some(col) => optional_field(batch, col, idx, TASKRUN_COUNT_COLUMN, row_number)?
                .map(|value| parse_position(value, TASKRUN_COUNT_COLUMN, row_number))
                .transpose()?,
            None => None,
        };

        Ok(AnnotationRow {
            row_number,
            document_id: text(self.document_id, DOCUMENT_ID_COLUMN)?.to_string(),
            rater_id: text(self.rater_id, RATER_ID_COLUMN)?.to_string(),
            topic_name: text(self.topic_name, TOPIC_NAME_COLUMN)?.to_string(),
            start,
            end,
            document_length,
            created: text(self.created, CREATED_COLUMN)?.to_string(),
            taskrun_count,
        })
    }
}

fn optional_field<'a>(
    batch: &'a RecordBatch,
    col: usize,
    idx: usize,
    name: &str,
    row_number: usize,
) -> Result<Option<&'a str>> {
    let values = batch
        .column(col)
        .as_string_opt::<i32>()
        .ok_or_else(|| Error::malformed_row(row_number, name, "column was not read as text"))?;
    if values.is_null(idx) {
        return Ok(None);
    }
    let value = values.value(idx).trim();
    Ok((!value.is_empty()).then_some(value))
}

fn required_field<'a>(
    batch: &'a RecordBatch,
    col: usize,
    idx: usize,
    name: &str,
    row_number: usize,
) -> Result<&'a str> {
    optional_field(batch, col, idx, name, row_number)?
        .ok_or_else(|| Error::malformed_row(row_number, name, "required value is empty"))
}

fn parse_position(value: &str, name: &str, row_number: usize) -> Result<u64> {
    value.parse::<u64>().map_err(|_| {
        Error::malformed_row(
            row_number,
            name,
            format!("'{value}' is not a non-negative integer"),
        )
    })
}

/// Streams typed [`AnnotationRow`]s out of an in-memory CSV export.
pub struct AnnotationReader {
    batches: arrow_csv::Reader<Cursor<Vec<u8>>>,
    columns: ColumnIndices,
    batch: Option<RecordBatch>,
    offset: usize,
    row_number: usize,
}

impl AnnotationReader {
    /// Reads the whole input, resolves the header and prepares the row stream.
    ///
    /// Returns `None` for an input without any content.
    pub fn try_new<R: Read>(mut input: R) -> Result<Option<AnnotationReader>> {
        let mut bytes = Vec::new();
        input
            .read_to_end(&mut bytes)
            .map_err(|e| Error::io("annotation input", e))?;
        if bytes.starts_with(UTF8_BOM) {
            bytes.drain(..UTF8_BOM.len());
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let format = Format::default().with_header(true);
        let (header, _) = format
            .infer_schema(Cursor::new(&bytes[..]), Some(0))
            .map_err(|e| Error::arrow("failed to read the header row", e))?;
        let names: Vec<String> = header.fields().iter().map(|f| f.name().clone()).collect();
        let columns = ColumnIndices::from_header(&names)?;

        // Every column is read as text; numeric parsing happens per row.
        let schema = Schema::new(
            names
                .iter()
                .map(|name| Field::new(name, DataType::Utf8, true))
                .collect::<Vec<_>>(),
        );
        let batches = arrow_csv::ReaderBuilder::new(Arc::new(schema))
            .with_header(true)
            .with_batch_size(BATCH_SIZE)
            .with_truncated_rows(true)
            .build(Cursor::new(bytes))
            .map_err(|e| Error::arrow("failed to create the CSV reader", e))?;

        Ok(Some(AnnotationReader {
            batches,
            columns,
            batch: None,
            offset: 0,
            row_number: 0,
        }))
    }
}

impl Iterator for AnnotationReader {
    type Item = Result<AnnotationRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(batch) = &self.batch {
                if self.offset < batch.num_rows() {
                    let idx = self.offset;
                    self.offset += 1;
                    self.row_number += 1;
                    return Some(self.columns.read_row(batch, idx, self.row_number));
                }
            }
            let batch = try_or_ret_some_err!(self.batches.next()?.map_err(|e| {
                Error::arrow(
                    format!("failed to read the data rows following row {}", self.row_number),
                    e,
                )
            }));
            self.batch = Some(batch);
            self.offset = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use spanalpha_common::error::ErrorKind;

    use super::*;

    const HEADER: &str = "article_sha256,contributor_uuid,topic_name,start_pos,end_pos,\
                          article_text_length,created";

    fn load(text: &str) -> Result<AnnotationSet> {
        load_annotations(text.as_bytes())
    }

    #[test]
    fn test_load_groups_rows_by_document() {
        let text = format!(
            "{HEADER}\n\
             a1,u1,Claim,10,30,100,2021-01-10T02:11:00\n\
             b2,u1,Claim,0,5,50,2021-01-10T02:12:00\n\
             a1,u2,Evidence,40,60,100,2021-01-10T02:13:00\n"
        );
        let set = load(&text).unwrap();
        assert_eq!(set.len(), 2);
        let a1 = set.get("a1").unwrap();
        assert_eq!(a1.text_length(), 100);
        assert_eq!(a1.rows().len(), 2);
        assert_eq!(a1.rows()[1].topic_name, "Evidence");
        assert_eq!(a1.rows()[1].range(), 40..60);
        assert_eq!(a1.rows()[1].row_number, 3);
        assert_eq!(a1.rows()[1].taskrun_count, None);
    }

    #[test]
    fn test_columns_found_by_name() {
        let text = "created,extra,end_pos,start_pos,topic_name,contributor_uuid,\
                    article_text_length,article_sha256,taskrun_count\n\
                    2021-01-10T02:11:00,x,30,10,Claim,u1,100,a1,3\n";
        let set = load(text).unwrap();
        let row = &set.get("a1").unwrap().rows()[0];
        assert_eq!(row.range(), 10..30);
        assert_eq!(row.rater_id, "u1");
        assert_eq!(row.taskrun_count, Some(3));
    }

    #[test]
    fn test_byte_order_mark_stripped() {
        let text = format!("\u{feff}{HEADER}\na1,u1,Claim,1,2,3,2021\n");
        let set = load(&text).unwrap();
        assert_eq!(set.row_count(), 1);
    }

    #[test]
    fn test_quoted_fields() {
        let text = format!("{HEADER}\na1,u1,\"Claim, strong\",1,2,3,2021\n");
        let set = load(&text).unwrap();
        assert_eq!(set.get("a1").unwrap().rows()[0].topic_name, "Claim, strong");
    }

    #[test]
    fn test_empty_input() {
        assert!(load("").unwrap().is_empty());
        assert!(load(&format!("{HEADER}\n")).unwrap().is_empty());
    }

    #[test]
    fn test_missing_column() {
        let text = "article_sha256,contributor_uuid,topic_name,start_pos,end_pos,created\n\
                    a1,u1,Claim,1,2,2021\n";
        let err = load(text).unwrap_err();
        match err.kind() {
            ErrorKind::MissingColumn { name } => assert_eq!(name, "article_text_length"),
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_position() {
        let text = format!("{HEADER}\na1,u1,Claim,1,2,3,2021\na1,u2,Claim,x,2,3,2021\n");
        let err = load(&text).unwrap_err();
        match err.kind() {
            ErrorKind::MalformedRow {
                row,
                column,
                message,
            } => {
                assert_eq!(*row, 2);
                assert_eq!(column, START_COLUMN);
                assert!(message.contains("'x'"));
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn test_short_row_names_row_and_column() {
        let text = format!(
            "{HEADER}\n\
             a1,u1,Claim,1,2,10,2021\n\
             a1,u2,Claim,3,4,10,2021\n\
             b2,u1,Claim,0,5,20,2021\n\
             b2,u2,Evidence,5,9,20,2021\n\
             c3,u3,Claim,0,1,5,2021\n\
             a1,u9,Claim,1,2\n"
        );
        let err = load(&text).unwrap_err();
        match err.kind() {
            ErrorKind::MalformedRow { row, column, .. } => {
                assert_eq!(*row, 6);
                assert_eq!(column, DOCUMENT_LENGTH_COLUMN);
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn test_zero_length_document_rejected() {
        let text = format!("{HEADER}\na1,u1,Claim,0,0,0,2021\n");
        let err = load(&text).unwrap_err();
        match err.kind() {
            ErrorKind::MalformedRow { row, column, .. } => {
                assert_eq!(*row, 1);
                assert_eq!(column, DOCUMENT_LENGTH_COLUMN);
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn test_empty_required_field() {
        let text = format!("{HEADER}\na1,,Claim,1,2,3,2021\n");
        let err = load(&text).unwrap_err();
        match err.kind() {
            ErrorKind::MalformedRow { row, column, .. } => {
                assert_eq!(*row, 1);
                assert_eq!(column, RATER_ID_COLUMN);
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }

    #[test]
    fn test_span_outside_document() {
        let text = format!("{HEADER}\na1,u1,Claim,5,12,10,2021\n");
        let err = load(&text).unwrap_err();
        assert!(err.to_string().contains("exceeds document length 10"));

        let text = format!("{HEADER}\na1,u1,Claim,6,5,10,2021\n");
        let err = load(&text).unwrap_err();
        assert!(err.to_string().contains("ends before it starts"));
    }

    #[test]
    fn test_inconsistent_document_length() {
        let text = format!("{HEADER}\na1,u1,Claim,1,2,10,2021\na1,u2,Claim,1,2,11,2021\n");
        let err = load(&text).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InconsistentDocumentLength { .. }
        ));
    }

    #[test]
    fn test_open_input_missing_file() {
        let Err(err) = open_input(Path::new("/nonexistent/Highlighter.csv")) else {
            panic!("expected an error for a missing file");
        };
        assert!(matches!(err.kind(), ErrorKind::Io { .. }));
    }
}
