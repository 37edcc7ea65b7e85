//! Reader for XML short-answer scoring datasets.
//!
//! [`read_dataset`] turns a directory of question files into
//! [`DatasetRecord`]s; failures are reported as [`ReadDatasetError`].

pub mod config;
pub mod data;
pub mod error;

pub use config::LoaderConfig;
pub use data::loader::{load_dataset, parse_record, read_dataset, read_dataset_with};
pub use data::model::{Dataset, DatasetRecord, Question, ReferenceAnswer, StudentAnswers};
pub use error::{ErrorKind, FetchError, ParseError, ReadDatasetError, RecordError};
