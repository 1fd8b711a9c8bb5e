//! Highlighter export fixtures.

use std::{
    io::{Seek, SeekFrom, Write},
    sync::Arc,
};

use arrow_array::{ArrayRef, RecordBatch, StringArray, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use flate2::{Compression, write::GzEncoder};

/// One export row, as the highlighter writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRow {
    pub document_id: String,
    pub rater_id: String,
    pub topic_name: String,
    pub start: u64,
    pub end: u64,
    pub document_length: u64,
    pub created: String,
    pub taskrun_count: Option<u64>,
}

/// A row with a fixed creation time and no task run count.
pub fn highlight(
    document_id: &str,
    document_length: u64,
    rater_id: &str,
    topic_name: &str,
    start: u64,
    end: u64,
) -> HighlightRow {
    HighlightRow {
        document_id: document_id.to_string(),
        rater_id: rater_id.to_string(),
        topic_name: topic_name.to_string(),
        start,
        end,
        document_length,
        created: "2021-01-01T00:00:00Z".to_string(),
        taskrun_count: None,
    }
}

impl HighlightRow {
    pub fn created(mut self, created: &str) -> Self {
        self.created = created.to_string();
        self
    }

    pub fn taskruns(mut self, count: u64) -> Self {
        self.taskrun_count = Some(count);
        self
    }
}

/// Renders `rows` as CSV with a header. The columns include one the loader
/// does not use (`quiz_task_uuid`).
pub fn to_csv(rows: &[HighlightRow]) -> anyhow::Result<Vec<u8>> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("article_sha256", DataType::Utf8, false),
        Field::new("contributor_uuid", DataType::Utf8, false),
        Field::new("quiz_task_uuid", DataType::Utf8, false),
        Field::new("topic_name", DataType::Utf8, false),
        Field::new("start_pos", DataType::UInt64, false),
        Field::new("end_pos", DataType::UInt64, false),
        Field::new("article_text_length", DataType::UInt64, false),
        Field::new("created", DataType::Utf8, false),
        Field::new("taskrun_count", DataType::UInt64, true),
    ]));
    let strings = |f: fn(&HighlightRow) -> &str| -> ArrayRef {
        Arc::new(StringArray::from_iter_values(rows.iter().map(f)))
    };
    let numbers = |f: fn(&HighlightRow) -> u64| -> ArrayRef {
        Arc::new(UInt64Array::from_iter_values(rows.iter().map(f)))
    };
    let columns: Vec<ArrayRef> = vec![
        strings(|r| r.document_id.as_str()),
        strings(|r| r.rater_id.as_str()),
        Arc::new(StringArray::from_iter_values(
            rows.iter()
                .map(|r| format!("{}-{}", r.document_id, r.rater_id)),
        )),
        strings(|r| r.topic_name.as_str()),
        numbers(|r| r.start),
        numbers(|r| r.end),
        numbers(|r| r.document_length),
        strings(|r| r.created.as_str()),
        Arc::new(UInt64Array::from(
            rows.iter().map(|r| r.taskrun_count).collect::<Vec<_>>(),
        )),
    ];
    let batch = RecordBatch::try_new(schema, columns)?;

    let mut writer = arrow_csv::WriterBuilder::new()
        .with_header(true)
        .build(Vec::new());
    writer.write(&batch)?;
    Ok(writer.into_inner())
}

/// Writes `rows` to a temporary file, gzipped when `gzip` is set. The file
/// name ends in `.csv` or `.csv.gz` accordingly.
pub fn write_highlighter_csv(
    rows: &[HighlightRow],
    gzip: bool,
) -> anyhow::Result<tempfile::NamedTempFile> {
    let data = to_csv(rows)?;
    let suffix = if gzip { ".csv.gz" } else { ".csv" };
    let mut file = tempfile::Builder::new()
        .prefix("highlights-")
        .suffix(suffix)
        .tempfile()?;
    if gzip {
        let mut encoder = GzEncoder::new(file.as_file_mut(), Compression::default());
        encoder.write_all(&data)?;
        encoder.finish()?;
    } else {
        file.write_all(&data)?;
    }
    file.flush()?;
    file.seek(SeekFrom::Start(0))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_layout() {
        let rows = vec![highlight("a", 10, "u1", "Claim", 0, 5).taskruns(3)];
        let text = String::from_utf8(to_csv(&rows).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "article_sha256,contributor_uuid,quiz_task_uuid,topic_name,start_pos,end_pos,\
             article_text_length,created,taskrun_count"
        );
        assert_eq!(
            lines.next().unwrap(),
            "a,u1,a-u1,Claim,0,5,10,2021-01-01T00:00:00Z,3"
        );
    }

    #[test]
    fn test_gzip_file_name() {
        let file = write_highlighter_csv(&[], true).unwrap();
        let name = file.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with(".csv.gz"));
    }
}
