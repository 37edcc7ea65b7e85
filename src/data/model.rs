use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

// ---------------------------------------------------------------------------
// Question / ReferenceAnswer
// ---------------------------------------------------------------------------

/// The question a dataset file is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// Root `id` attribute, lowercased.
    pub id: String,
    /// Content of `<questionText>`, if the element exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The gold answer student answers are compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceAnswer {
    pub id: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// StudentAnswers – parallel sentence / class columns
// ---------------------------------------------------------------------------

/// Student answers in document order.
///
/// `sentences[i]` is labeled `classes[i]`; both columns only grow together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentAnswers {
    sentences: Vec<String>,
    classes: Vec<String>,
}

impl StudentAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one answer and its accuracy class.
    pub fn push(&mut self, sentence: impl Into<String>, class: impl Into<String>) {
        self.sentences.push(sentence.into());
        self.classes.push(class.into());
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// `(sentence, class)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sentences
            .iter()
            .zip(&self.classes)
            .map(|(s, c)| (s.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DatasetRecord – one source file
// ---------------------------------------------------------------------------

/// Everything read from a single dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetRecord {
    pub question: Question,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_answer: Option<ReferenceAnswer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<StudentAnswers>,
}

impl DatasetRecord {
    /// A record with only a question id; the loader fills in the rest.
    pub fn new(question_id: impl Into<String>) -> Self {
        Self {
            question: Question {
                id: question_id.into(),
                text: None,
            },
            reference_answer: None,
            answers: None,
        }
    }

    /// Number of student answers (0 when there is no `studentAnswers`).
    pub fn answer_count(&self) -> usize {
        self.answers.as_ref().map_or(0, StudentAnswers::len)
    }
}

// ---------------------------------------------------------------------------
// Dataset – all records of a directory
// ---------------------------------------------------------------------------

/// The loaded records with a pre-computed accuracy class index.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Records in load order.
    pub records: Vec<DatasetRecord>,
    /// Sorted set of every accuracy class seen.
    pub class_labels: BTreeSet<String>,
    /// Accuracy class → number of student answers with that class.
    pub class_counts: BTreeMap<String, usize>,
}

impl Dataset {
    /// Build the class index from the loaded records.
    pub fn from_records(records: Vec<DatasetRecord>) -> Self {
        let mut class_counts: BTreeMap<String, usize> = BTreeMap::new();

        for answers in records.iter().filter_map(|r| r.answers.as_ref()) {
            for class in answers.classes() {
                *class_counts.entry(class.clone()).or_default() += 1;
            }
        }
        let class_labels = class_counts.keys().cloned().collect();
        Dataset {
            records,
            class_labels,
            class_counts,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of student answers across all records.
    pub fn answer_count(&self) -> usize {
        self.records.iter().map(DatasetRecord::answer_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, answers: &[(&str, &str)]) -> DatasetRecord {
        let mut rec = DatasetRecord::new(id);
        let mut sa = StudentAnswers::new();
        for (s, c) in answers {
            sa.push(*s, *c);
        }
        rec.answers = Some(sa);
        rec
    }

    #[test]
    fn push_keeps_columns_aligned() {
        let mut sa = StudentAnswers::new();
        sa.push("X is Y", "correct");
        sa.push("X is Z", "incorrect");

        assert_eq!(sa.sentences().len(), sa.classes().len());
        assert_eq!(sa.classes()[1], "incorrect");
        let pairs: Vec<_> = sa.iter().collect();
        assert_eq!(pairs, vec![("X is Y", "correct"), ("X is Z", "incorrect")]);
    }

    #[test]
    fn class_index_counts_every_answer() {
        let mut no_answers = DatasetRecord::new("q3");
        no_answers.answers = None;
        let ds = Dataset::from_records(vec![
            record("q1", &[("a", "correct"), ("b", "incorrect")]),
            record("q2", &[("c", "correct"), ("d", "contradictory")]),
            no_answers,
        ]);

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.answer_count(), 4);
        assert_eq!(ds.class_counts["correct"], 2);
        assert_eq!(ds.class_counts.values().sum::<usize>(), ds.answer_count());
        let labels: Vec<_> = ds.class_labels.iter().map(String::as_str).collect();
        assert_eq!(labels, vec!["contradictory", "correct", "incorrect"]);
    }

    #[test]
    fn absent_optionals_are_not_serialized() {
        let json = serde_json::to_value(DatasetRecord::new("q1")).unwrap();
        assert_eq!(json, serde_json::json!({ "question": { "id": "q1" } }));
    }
}
