use std::collections::BTreeSet;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Class selection: which accuracy classes are kept
// ---------------------------------------------------------------------------

/// Selected accuracy classes. An empty selection keeps nothing.
pub type ClassSelection = BTreeSet<String>;

/// Position of one student answer inside a [`Dataset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnswerRef {
    /// Index into `Dataset::records`.
    pub record: usize,
    /// Index into that record's sentences / classes.
    pub answer: usize,
}

/// Initialise a [`ClassSelection`] with every class selected.
pub fn init_class_selection(dataset: &Dataset) -> ClassSelection {
    dataset.class_labels.clone()
}

/// Return the student answers whose class is selected, in record order and
/// then document order. Records without student answers contribute nothing.
pub fn filtered_answers(dataset: &Dataset, selection: &ClassSelection) -> Vec<AnswerRef> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter_map(|(i, rec)| rec.answers.as_ref().map(|a| (i, a)))
        .flat_map(move |(record, answers)| {
            answers
                .classes()
                .iter()
                .enumerate()
                .filter(move |(_, class)| selection.contains(*class))
                .map(move |(answer, _)| AnswerRef { record, answer })
        })
        .collect()
}
