//! Error types for dataset reading
//!
//! Every failure of [`read_dataset`](crate::data::loader::read_dataset) is a
//! [`ReadDatasetError`]. The underlying cause (I/O, XML, missing field) is kept
//! as the error source.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Primary error type for reading a dataset directory
#[derive(Debug, Error)]
pub enum ReadDatasetError {
    /// Dataset directory does not exist
    #[error("Dataset directory not found at {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// No records were produced from the directory
    #[error("No dataset files found at {}", .path.display())]
    NoFilesFound { path: PathBuf },

    /// A matched file could not be read or is not well-formed XML
    #[error("Could not parse dataset file {}", .path.display())]
    DatasetParse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// A well-formed file is missing an expected attribute or child
    #[error("Could not fetch data from dataset file {}", .path.display())]
    DataFetch {
        path: PathBuf,
        #[source]
        source: FetchError,
    },

    /// The configured file pattern is not a valid glob
    #[error("Invalid dataset file pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Coarse classification of a [`ReadDatasetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DirectoryNotFound,
    NoFilesFound,
    DatasetParse,
    DataFetch,
    InvalidPattern,
}

impl ReadDatasetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReadDatasetError::DirectoryNotFound { .. } => ErrorKind::DirectoryNotFound,
            ReadDatasetError::NoFilesFound { .. } => ErrorKind::NoFilesFound,
            ReadDatasetError::DatasetParse { .. } => ErrorKind::DatasetParse,
            ReadDatasetError::DataFetch { .. } => ErrorKind::DataFetch,
            ReadDatasetError::InvalidPattern { .. } => ErrorKind::InvalidPattern,
        }
    }

    /// The directory or file this error is about.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ReadDatasetError::DirectoryNotFound { path }
            | ReadDatasetError::NoFilesFound { path }
            | ReadDatasetError::DatasetParse { path, .. }
            | ReadDatasetError::DataFetch { path, .. } => Some(path),
            ReadDatasetError::InvalidPattern { .. } => None,
        }
    }
}

/// Why a dataset file could not be turned into a document tree
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reading file: {0}")]
    Io(#[from] io::Error),

    #[error("unsupported character encoding '{0}'")]
    UnknownEncoding(String),

    #[error("file is not valid {encoding}")]
    Decode { encoding: &'static str },

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// A structural expectation that a parsed document did not meet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("<{element}> has no '{attribute}' attribute")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("<{element}> has no child element")]
    MissingChild { element: String },
}

/// Failure of [`parse_record`](crate::data::loader::parse_record) on an
/// in-memory document.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl RecordError {
    /// Attach the file the document came from.
    pub fn at(self, path: impl Into<PathBuf>) -> ReadDatasetError {
        let path = path.into();
        match self {
            RecordError::Xml(e) => ReadDatasetError::DatasetParse {
                path,
                source: ParseError::Xml(e),
            },
            RecordError::Fetch(source) => ReadDatasetError::DataFetch { path, source },
        }
    }
}

/// Result type alias for dataset reading
pub type Result<T> = std::result::Result<T, ReadDatasetError>;
