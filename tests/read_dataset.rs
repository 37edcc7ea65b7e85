//! Integration tests for reading dataset directories
//!
//! Every test builds its own directory under a fresh temp dir.

use std::fs;
use std::path::Path;

use rusty_asag::{
    load_dataset, read_dataset, read_dataset_with, ErrorKind, LoaderConfig, ReferenceAnswer,
};
use tempfile::TempDir;

const SCENARIO: &str = r#"<question id="Q1"><questionText>What is X?</questionText><referenceAnswers><answer id="A1">X is Y</answer></referenceAnswers><studentAnswers><answer accuracy="correct">X is Y</answer><answer accuracy="incorrect">X is Z</answer></studentAnswers></question>"#;

fn question_xml(id: &str, classes: &[&str]) -> String {
    let answers: String = classes
        .iter()
        .enumerate()
        .map(|(i, c)| format!(r#"<studentAnswer id="{id}.{i}" accuracy="{c}">answer {i}</studentAnswer>"#))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<question id="{id}">
  <questionText>Question {id}?</questionText>
  <referenceAnswers><referenceAnswer id="{id}-ref">Reference {id}</referenceAnswer></referenceAnswers>
  <studentAnswers>{answers}</studentAnswers>
</question>
"#
    )
}

fn dataset_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for (name, content) in files {
        fs::write(dir.path().join(name), content).expect("write dataset file");
    }
    dir
}

#[test]
fn test_single_file_scenario() {
    let dir = dataset_dir(&[("q1.xml", SCENARIO)]);

    let records = read_dataset(dir.path()).unwrap();
    assert_eq!(records.len(), 1);

    let rec = &records[0];
    assert_eq!(rec.question.id, "q1");
    assert_eq!(rec.question.text.as_deref(), Some("What is X?"));
    assert_eq!(
        rec.reference_answer,
        Some(ReferenceAnswer {
            id: "A1".into(),
            text: "X is Y".into(),
        })
    );
    let answers = rec.answers.as_ref().unwrap();
    assert_eq!(answers.sentences(), ["X is Y", "X is Z"]);
    assert_eq!(answers.classes(), ["correct", "incorrect"]);
}

#[test]
fn test_one_record_per_xml_file() {
    let q1 = question_xml("Q1", &["correct", "incorrect"]);
    let q2 = question_xml("Q2", &["correct"]);
    let q3 = question_xml("Q3", &[]);
    let dir = dataset_dir(&[
        ("q1.xml", q1.as_str()),
        ("q2.xml", q2.as_str()),
        ("q3.xml", q3.as_str()),
        ("notes.txt", "not a dataset file"),
        ("q4.xml.bak", "<broken"),
    ]);

    let records = read_dataset(dir.path()).unwrap();
    assert_eq!(records.len(), 3);
    for rec in &records {
        let answers = rec.answers.as_ref().unwrap();
        assert_eq!(answers.sentences().len(), answers.classes().len());
    }
}

#[test]
fn test_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = read_dataset(&missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DirectoryNotFound);
    assert_eq!(err.path(), Some(missing.as_path()));
    assert!(err.to_string().contains("does-not-exist"));
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_dataset(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoFilesFound);
}

#[test]
fn test_directory_without_xml_files() {
    let dir = dataset_dir(&[("readme.md", "# data"), ("q1.json", "{}")]);
    let err = read_dataset(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoFilesFound);
}

#[test]
fn test_hidden_xml_files_are_not_matched() {
    let dir = dataset_dir(&[(".q1.xml", SCENARIO)]);
    let err = read_dataset(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoFilesFound);
}

#[test]
fn test_path_to_a_file_reports_no_files() {
    let dir = dataset_dir(&[("q1.xml", SCENARIO)]);
    let err = read_dataset(dir.path().join("q1.xml")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoFilesFound);
}

#[test]
fn test_malformed_xml() {
    let dir = dataset_dir(&[("bad.xml", r#"<question id="Q1"><questionText>unclosed"#)]);

    let err = read_dataset(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatasetParse);
    assert_eq!(err.path(), Some(dir.path().join("bad.xml").as_path()));
}

#[test]
fn test_malformed_file_aborts_whole_read() {
    let good = question_xml("Q1", &["correct"]);
    let dir = dataset_dir(&[("a.xml", good.as_str()), ("b.xml", "<question id='x'>"), ("c.xml", good.as_str())]);

    let err = read_dataset(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatasetParse);
}

#[test]
fn test_only_bad_files_report_parse_error_not_empty() {
    let dir = dataset_dir(&[("a.xml", "not xml at all")]);
    let err = read_dataset(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatasetParse);
}

#[test]
fn test_root_without_id() {
    let dir = dataset_dir(&[("q.xml", "<question><questionText>Q</questionText></question>")]);

    let err = read_dataset(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataFetch);
    let cause = std::error::Error::source(&err).unwrap();
    assert_eq!(cause.to_string(), "<question> has no 'id' attribute");
}

#[test]
fn test_empty_reference_answers() {
    let dir = dataset_dir(&[(
        "q.xml",
        r#"<question id="Q"><referenceAnswers/></question>"#,
    )]);
    let err = read_dataset(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataFetch);
}

#[test]
fn test_sorted_config_orders_by_file_name() {
    let dir = dataset_dir(&[
        ("c.xml", question_xml("C", &[]).as_str()),
        ("a.xml", question_xml("A", &[]).as_str()),
        ("b.xml", question_xml("B", &[]).as_str()),
    ]);
    let config = LoaderConfig {
        sorted: true,
        ..LoaderConfig::default()
    };

    let ids: Vec<String> = read_dataset_with(dir.path(), &config)
        .unwrap()
        .into_iter()
        .map(|r| r.question.id)
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[test]
fn test_custom_pattern() {
    let dir = dataset_dir(&[("train_q1.xml", SCENARIO), ("test_q1.xml", "<broken")]);
    let config = LoaderConfig {
        pattern: "train_*.xml".into(),
        ..LoaderConfig::default()
    };

    let records = read_dataset_with(dir.path(), &config).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_invalid_pattern() {
    let dir = dataset_dir(&[("q1.xml", SCENARIO)]);
    let config = LoaderConfig {
        pattern: "[".into(),
        ..LoaderConfig::default()
    };

    let err = read_dataset_with(dir.path(), &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPattern);
}

#[test]
fn test_load_dataset_builds_class_index() {
    let q1 = question_xml("Q1", &["correct", "incorrect", "correct"]);
    let q2 = question_xml("Q2", &["contradictory"]);
    let dir = dataset_dir(&[("q1.xml", q1.as_str()), ("q2.xml", q2.as_str())]);

    let dataset = load_dataset(dir.path(), &LoaderConfig::default()).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.answer_count(), 4);
    assert_eq!(dataset.class_counts["correct"], 2);
    assert_eq!(dataset.class_labels.len(), 3);
}

#[test]
fn test_directory_named_like_xml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("nested.xml")).unwrap();

    let err = read_dataset(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatasetParse);
}

fn assert_send_sync<T: Send + Sync>(_: &T) {}

#[test]
fn test_error_is_send_and_sync() {
    let err = read_dataset(Path::new("/definitely/not/here")).unwrap_err();
    assert_send_sync(&err);
}

#[test]
fn test_reference_answer_without_id() {
    let dir = dataset_dir(&[(
        "q.xml",
        r#"<question id="Q"><referenceAnswers><answer>X is Y</answer></referenceAnswers></question>"#,
    )]);

    let err = read_dataset(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataFetch);
    let cause = std::error::Error::source(&err).unwrap();
    assert_eq!(cause.to_string(), "<answer> has no 'id' attribute");
}

#[test]
fn test_answer_text_after_comment() {
    let dir = dataset_dir(&[(
        "q.xml",
        r#"<question id="Q"><studentAnswers><answer accuracy="correct"><!-- grader note -->X is Y</answer></studentAnswers></question>"#,
    )]);

    let records = read_dataset(dir.path()).unwrap();
    let answers = records[0].answers.as_ref().unwrap();
    assert_eq!(answers.sentences(), ["X is Y"]);
    assert_eq!(answers.classes(), ["correct"]);
}

#[test]
fn test_utf8_bom_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice(SCENARIO.as_bytes());
    fs::write(dir.path().join("q1.xml"), bytes).unwrap();

    let records = read_dataset(dir.path()).unwrap();
    assert_eq!(records[0].question.id, "q1");
    assert_eq!(records[0].answers.as_ref().unwrap().len(), 2);
}

#[test]
fn test_latin1_declared_file() {
    let dir = tempfile::tempdir().unwrap();
    let bytes: &[u8] = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<question id=\"Q1\"><questionText>Caf\xE9?</questionText><studentAnswers><answer accuracy=\"correct\">caf\xE9 cr\xE8me</answer></studentAnswers></question>";
    fs::write(dir.path().join("q1.xml"), bytes).unwrap();

    let records = read_dataset(dir.path()).unwrap();
    assert_eq!(records[0].question.text.as_deref(), Some("Caf\u{e9}?"));
    assert_eq!(records[0].answers.as_ref().unwrap().sentences(), ["caf\u{e9} cr\u{e8}me"]);
}

#[test]
fn test_undeclared_non_utf8_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("q1.xml"), b"<question id=\"Q1\">caf\xE9</question>").unwrap();

    let err = read_dataset(dir.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DatasetParse);
}
