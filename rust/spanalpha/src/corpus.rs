//! The virtual corpus: all retained documents laid end to end.
//!
//! Every document occupies `[offset, offset + text_length)` of one global
//! coordinate space. A document-local position `p` becomes the virtual
//! position `offset + p`, which is the column index of the reliability matrix.

use std::ops::Range;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::record::Document;

/// The order in which documents are concatenated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentOrder {
    /// Order of first appearance in the export.
    #[default]
    Insertion,
    /// Ascending document id.
    #[serde(alias = "id")]
    ById,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    pub document_id: String,
    pub offset: u64,
    pub length: u64,
}

impl CorpusEntry {
    /// The virtual range occupied by the document.
    pub fn range(&self) -> Range<u64> {
        self.offset..self.offset + self.length
    }
}

/// Immutable document id → offset index.
#[derive(Debug, Clone, Default)]
pub struct VirtualCorpus {
    entries: Vec<CorpusEntry>,
    index: AHashMap<String, usize>,
    total_length: u64,
}

impl VirtualCorpus {
    pub fn build<'a, I>(documents: I, order: DocumentOrder) -> VirtualCorpus
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut documents: Vec<&Document> = documents.into_iter().collect();
        if order == DocumentOrder::ById {
            documents.sort_by(|a, b| a.id().cmp(b.id()));
        }

        let mut entries = Vec::with_capacity(documents.len());
        let mut index = AHashMap::with_capacity(documents.len());
        let mut total_length = 0u64;
        for doc in documents {
            index.insert(doc.id().to_string(), entries.len());
            entries.push(CorpusEntry {
                document_id: doc.id().to_string(),
                offset: total_length,
                length: doc.text_length(),
            });
            total_length += doc.text_length();
        }
        log::info!(
            "Document count: {}. Corpus character length: {}.",
            entries.len(),
            total_length
        );
        VirtualCorpus {
            entries,
            index,
            total_length,
        }
    }

    pub fn entry(&self, document_id: &str) -> Option<&CorpusEntry> {
        self.index.get(document_id).map(|&idx| &self.entries[idx])
    }

    pub fn offset(&self, document_id: &str) -> Option<u64> {
        self.entry(document_id).map(|entry| entry.offset)
    }

    pub fn contains(&self, document_id: &str) -> bool {
        self.index.contains_key(document_id)
    }

    /// Entries in concatenation order.
    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
