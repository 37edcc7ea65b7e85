use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};
use glob::{MatchOptions, Pattern};
use log::{debug, info, warn};
use roxmltree::{Document, Node, ParsingOptions};

use super::model::{Dataset, DatasetRecord, ReferenceAnswer, StudentAnswers};
use crate::config::LoaderConfig;
use crate::error::{FetchError, ParseError, ReadDatasetError, RecordError, Result};

/// Shell-style matching on bare file names: `*` never crosses a separator
/// and never matches a leading dot.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read every `*.xml` file in `dataset_dir` into a [`DatasetRecord`].
///
/// Checks run in a fixed order: the directory must exist, then each matched
/// file is parsed and extracted (the first bad file aborts the whole read),
/// and only then is an empty result reported as
/// [`ReadDatasetError::NoFilesFound`].
///
/// Expected file layout:
///
/// ```xml
/// <question id="Q1">
///   <questionText>What is X?</questionText>
///   <referenceAnswers>
///     <answer id="A1">X is Y</answer>
///   </referenceAnswers>
///   <studentAnswers>
///     <answer accuracy="correct">X is Y</answer>
///     <answer accuracy="incorrect">X is Z</answer>
///   </studentAnswers>
/// </question>
/// ```
pub fn read_dataset(dataset_dir: impl AsRef<Path>) -> Result<Vec<DatasetRecord>> {
    read_dataset_with(dataset_dir, &LoaderConfig::default())
}

/// [`read_dataset`] with an explicit file pattern and ordering.
pub fn read_dataset_with(
    dataset_dir: impl AsRef<Path>,
    config: &LoaderConfig,
) -> Result<Vec<DatasetRecord>> {
    let dir = dataset_dir.as_ref();
    if !dir.exists() {
        return Err(ReadDatasetError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let files = matching_files(dir, config)?;
    let mut records = Vec::with_capacity(files.len());

    for file in &files {
        let record = read_file(file)?;
        debug!(
            "Loaded {} (question '{}', {} answers)",
            file.display(),
            record.question.id,
            record.answer_count()
        );
        records.push(record);
    }

    if records.is_empty() {
        return Err(ReadDatasetError::NoFilesFound {
            path: dir.to_path_buf(),
        });
    }

    info!("Read {} dataset files from {}", records.len(), dir.display());
    Ok(records)
}

/// Read a directory and build the class index over it.
pub fn load_dataset(dataset_dir: impl AsRef<Path>, config: &LoaderConfig) -> Result<Dataset> {
    read_dataset_with(dataset_dir, config).map(Dataset::from_records)
}

/// Parse one dataset document held in memory.
pub fn parse_record(xml: &str) -> std::result::Result<DatasetRecord, RecordError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)?;
    Ok(extract_record(doc.root_element())?)
}

// ---------------------------------------------------------------------------
// Directory enumeration
// ---------------------------------------------------------------------------

/// Entries of `dir` whose file name matches the configured pattern.
///
/// An existing path that cannot be listed (a plain file, no permission)
/// yields no entries.
fn matching_files(dir: &Path, config: &LoaderConfig) -> Result<Vec<PathBuf>> {
    let pattern =
        Pattern::new(&config.pattern).map_err(|source| ReadDatasetError::InvalidPattern {
            pattern: config.pattern.clone(),
            source,
        })?;

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {}: {e}", dir.display());
            return Ok(Vec::new());
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", dir.display());
                None
            }
        })
        .filter(|entry| pattern.matches_with(&entry.file_name().to_string_lossy(), MATCH_OPTIONS))
        .map(|entry| entry.path())
        .collect();

    if config.sorted {
        files.sort();
    }
    Ok(files)
}

fn read_file(path: &Path) -> Result<DatasetRecord> {
    let parse_error = |source| ReadDatasetError::DatasetParse {
        path: path.to_path_buf(),
        source,
    };
    let bytes = fs::read(path).map_err(|e| parse_error(ParseError::Io(e)))?;
    let text = decode_xml(&bytes).map_err(parse_error)?;
    parse_record(&text).map_err(|e| e.at(path))
}

// ---------------------------------------------------------------------------
// Character decoding
// ---------------------------------------------------------------------------

/// Decode a raw XML file to text.
///
/// Detection order: byte order mark → `encoding` in the XML declaration →
/// UTF-8. The BOM is not part of the returned text.
fn decode_xml(bytes: &[u8]) -> std::result::Result<Cow<'_, str>, ParseError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]);
    }

    let encoding = match declared_encoding(bytes) {
        Some(label) => Encoding::for_label(label).ok_or_else(|| {
            ParseError::UnknownEncoding(String::from_utf8_lossy(label).into_owned())
        })?,
        None => UTF_8,
    };
    decode_with(encoding, bytes)
}

fn decode_with<'b>(
    encoding: &'static Encoding,
    bytes: &'b [u8],
) -> std::result::Result<Cow<'b, str>, ParseError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or(ParseError::Decode {
            encoding: encoding.name(),
        })
}

/// The `encoding` pseudo-attribute of a leading `<?xml ...?>` declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&[u8]> {
    let decl = bytes.strip_prefix(b"<?xml")?;
    let end = decl.windows(2).position(|w| w == b"?>")?;
    let decl = &decl[..end];

    let at = decl.windows(8).position(|w| w == b"encoding")?;
    let rest = skip_ascii_whitespace(&decl[at + 8..]);
    let rest = skip_ascii_whitespace(rest.strip_prefix(b"=")?);
    let (&quote, rest) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let close = rest.iter().position(|&b| b == quote)?;
    Some(&rest[..close])
}

fn skip_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

// ---------------------------------------------------------------------------
// Field extraction
// ---------------------------------------------------------------------------

fn extract_record(root: Node) -> std::result::Result<DatasetRecord, FetchError> {
    let id = required_attribute(root, "id")?;
    let mut record = DatasetRecord::new(id.to_lowercase());

    // A repeated section replaces the earlier one.
    for child in root.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "questionText" => record.question.text = Some(element_text(child)),
            "referenceAnswers" => record.reference_answer = Some(reference_answer(child)?),
            "studentAnswers" => record.answers = Some(student_answers(child)?),
            _ => {}
        }
    }

    Ok(record)
}

/// Only the first answer inside `<referenceAnswers>` is used.
fn reference_answer(section: Node) -> std::result::Result<ReferenceAnswer, FetchError> {
    let first = section
        .children()
        .find(Node::is_element)
        .ok_or_else(|| FetchError::MissingChild {
            element: section.tag_name().name().to_string(),
        })?;

    Ok(ReferenceAnswer {
        id: required_attribute(first, "id")?.to_string(),
        text: element_text(first),
    })
}

fn student_answers(section: Node) -> std::result::Result<StudentAnswers, FetchError> {
    let mut answers = StudentAnswers::new();
    for answer in section.children().filter(Node::is_element) {
        let class = required_attribute(answer, "accuracy")?;
        answers.push(element_text(answer), class);
    }
    Ok(answers)
}

fn required_attribute<'a>(
    node: Node<'a, '_>,
    name: &'static str,
) -> std::result::Result<&'a str, FetchError> {
    node.attribute(name).ok_or_else(|| FetchError::MissingAttribute {
        element: node.tag_name().name().to_string(),
        attribute: name,
    })
}

/// Text before the element's first child element; empty when there is none.
/// Comments and processing instructions in that stretch are skipped.
fn element_text(node: Node) -> String {
    node.children()
        .take_while(|child| !child.is_element())
        .filter(Node::is_text)
        .filter_map(|child| child.text())
        .collect()
}
