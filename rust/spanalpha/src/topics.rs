//! Topic name normalization.

use std::collections::BTreeSet;
use std::fmt;

use crate::record::AnnotationSet;

/// Small integer identifying a topic within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TopicCode(pub u32);

impl fmt::Display for TopicCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bidirectional mapping between topic names and [`TopicCode`]s.
///
/// Codes are assigned in sorted name order, so the same set of names always
/// produces the same codes regardless of row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicMap {
    names: Vec<String>,
}

impl TopicMap {
    pub fn from_names<I, S>(names: I) -> TopicMap
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        TopicMap {
            names: names.into_iter().collect(),
        }
    }

    pub fn from_annotations(set: &AnnotationSet) -> TopicMap {
        Self::from_names(set.rows().map(|row| row.topic_name.as_str()))
    }

    pub fn code(&self, name: &str) -> Option<TopicCode> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
            .map(|idx| TopicCode(idx as u32))
    }

    pub fn name(&self, code: TopicCode) -> Option<&str> {
        self.names.get(code.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TopicCode, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (TopicCode(idx as u32), name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_in_sorted_order() {
        let topics = TopicMap::from_names(["Evidence", "Claim", "Reasoning", "Claim"]);
        assert_eq!(topics.len(), 3);
        assert_eq!(topics.code("Claim"), Some(TopicCode(0)));
        assert_eq!(topics.code("Evidence"), Some(TopicCode(1)));
        assert_eq!(topics.code("Reasoning"), Some(TopicCode(2)));
        assert_eq!(topics.code("Unknown"), None);
        assert_eq!(topics.name(TopicCode(1)), Some("Evidence"));
        assert_eq!(topics.name(TopicCode(3)), None);
    }

    #[test]
    fn test_assignment_independent_of_input_order() {
        let a = TopicMap::from_names(["b", "c", "a"]);
        let b = TopicMap::from_names(["c", "a", "b", "a"]);
        assert_eq!(a, b);
        let pairs: Vec<_> = a.iter().collect();
        assert_eq!(
            pairs,
            vec![(TopicCode(0), "a"), (TopicCode(1), "b"), (TopicCode(2), "c")]
        );
    }

    #[test]
    fn test_empty() {
        let topics = TopicMap::from_names(Vec::<String>::new());
        assert!(topics.is_empty());
        assert_eq!(topics.iter().count(), 0);
    }
}
