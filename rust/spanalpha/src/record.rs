//! Typed annotation rows and their grouping by document.

use std::ops::Range;

use ahash::AHashMap;
use spanalpha_common::{Result, error::Error};

/// One rater's claim that `[start, end)` of a document belongs to a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    /// 1-based data row number in the source file.
    pub row_number: usize,
    /// Content hash of the annotated document.
    pub document_id: String,
    pub rater_id: String,
    pub topic_name: String,
    pub start: u64,
    /// Exclusive.
    pub end: u64,
    /// Total text length of the document, repeated on every row.
    pub document_length: u64,
    /// Creation timestamp as exported (ISO-8601, compared as text).
    pub created: String,
    /// Number of task runs the document was scheduled for, when exported.
    pub taskrun_count: Option<u64>,
}

impl AnnotationRow {
    pub fn range(&self) -> Range<u64> {
        self.start..self.end
    }
}

/// A source document and all annotation rows referring to it, in input order.
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    text_length: u64,
    rows: Vec<AnnotationRow>,
}

impl Document {
    pub fn new(id: impl Into<String>, text_length: u64) -> Document {
        Document {
            id: id.into(),
            text_length,
            rows: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text_length(&self) -> u64 {
        self.text_length
    }

    pub fn rows(&self) -> &[AnnotationRow] {
        &self.rows
    }

    /// Appends a row, rejecting it when it disagrees with the document length
    /// established by the first row.
    pub fn push_row(&mut self, row: AnnotationRow) -> Result<()> {
        if row.document_length != self.text_length {
            return Err(Error::inconsistent_document_length(
                &self.id,
                self.text_length,
                row.document_length,
                row.row_number,
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Distinct rater ids in order of first appearance in the input.
    pub fn raters(&self) -> Vec<&str> {
        let mut raters: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !raters.contains(&row.rater_id.as_str()) {
                raters.push(&row.rater_id);
            }
        }
        raters
    }

    pub fn rater_count(&self) -> usize {
        self.raters().len()
    }

    /// The scheduled task run count carried by the last row that has one.
    pub fn expected_taskruns(&self) -> Option<u64> {
        self.rows.iter().rev().find_map(|row| row.taskrun_count)
    }
}

/// Annotation rows grouped by document, documents kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    documents: Vec<Document>,
    index: AHashMap<String, usize>,
}

impl AnnotationSet {
    pub fn new() -> AnnotationSet {
        Default::default()
    }

    /// Adds a row to its document, creating the document on first sight.
    pub fn push_row(&mut self, row: AnnotationRow) -> Result<()> {
        let idx = match self.index.get(&row.document_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.documents.len();
                self.documents
                    .push(Document::new(&row.document_id, row.document_length));
                self.index.insert(row.document_id.clone(), idx);
                idx
            }
        };
        self.documents[idx].push_row(row)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, document_id: &str) -> Option<&Document> {
        self.index.get(document_id).map(|&idx| &self.documents[idx])
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.documents.iter().map(|doc| doc.rows.len()).sum()
    }

    pub fn rows(&self) -> impl Iterator<Item = &AnnotationRow> {
        self.documents.iter().flat_map(|doc| doc.rows.iter())
    }

    /// Keeps the documents for which `keep` returns `true` and returns the
    /// removed ones, both in their original order.
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<Document>
    where
        F: FnMut(&Document) -> bool,
    {
        let (kept, removed): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.documents).into_iter().partition(|doc| keep(doc));
        self.documents = kept;
        self.index = self
            .documents
            .iter()
            .enumerate()
            .map(|(idx, doc)| (doc.id.clone(), idx))
            .collect();
        removed
    }
}

impl FromIterator<Document> for AnnotationSet {
    fn from_iter<T: IntoIterator<Item = Document>>(iter: T) -> Self {
        let documents: Vec<Document> = iter.into_iter().collect();
        let index = documents
            .iter()
            .enumerate()
            .map(|(idx, doc)| (doc.id.clone(), idx))
            .collect();
        AnnotationSet { documents, index }
    }
}
