use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn missing_column(name: impl Into<String>) -> Error {
        Error(ErrorKind::MissingColumn { name: name.into() }.into())
    }

    /// A data row that cannot be turned into an annotation record.
    ///
    /// `row` is the 1-based data row number (the header row is not counted).
    pub fn malformed_row(
        row: usize,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error(
            ErrorKind::MalformedRow {
                row,
                column: column.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn inconsistent_document_length(
        document: impl Into<String>,
        expected: u64,
        found: u64,
        row: usize,
    ) -> Error {
        Error(
            ErrorKind::InconsistentDocumentLength {
                document: document.into(),
                expected,
                found,
                row,
            }
            .into(),
        )
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }

    pub fn arrow<E>(context: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error(
            ErrorKind::Arrow {
                context: context.into(),
                source: Box::new(source),
            }
            .into(),
        )
    }

    pub fn alpha(message: impl Into<String>) -> Error {
        Error(
            ErrorKind::Alpha {
                message: message.into(),
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("required column '{name}' is missing from the header")]
    MissingColumn { name: String },

    #[error("malformed row {row}, column '{column}': {message}")]
    MalformedRow {
        row: usize,
        column: String,
        message: String,
    },

    #[error(
        "document '{document}' has inconsistent text length: \
         {expected} first seen, {found} in row {row}"
    )]
    InconsistentDocumentLength {
        document: String,
        expected: u64,
        found: u64,
        row: usize,
    },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    #[error("Arrow error: {context}: {source}")]
    Arrow {
        context: String,
        source: StdErrorBoxed,
    },

    #[error("alpha routine failed: {message}")]
    Alpha { message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_row_display() {
        let err = Error::malformed_row(7, "start_pos", "'abc' is not a non-negative integer");
        assert_eq!(
            err.to_string(),
            "malformed row 7, column 'start_pos': 'abc' is not a non-negative integer"
        );
    }

    #[test]
    fn test_inconsistent_length_display() {
        let err = Error::inconsistent_document_length("f00d", 120, 121, 4);
        let text = err.to_string();
        assert!(text.contains("f00d"));
        assert!(text.contains("120 first seen"));
        assert!(text.contains("121 in row 4"));
    }

    #[test]
    fn test_arrow_display_includes_source() {
        let err = Error::arrow(
            "failed to read data rows",
            std::io::Error::other("incorrect number of fields"),
        );
        assert_eq!(
            err.to_string(),
            "Arrow error: failed to read data rows: incorrect number of fields"
        );
    }

    #[test]
    fn test_into_kind() {
        let err = Error::missing_column("created");
        match err.into_kind() {
            ErrorKind::MissingColumn { name } => assert_eq!(name, "created"),
            other => panic!("unexpected error kind: {other:?}"),
        }
    }
}
