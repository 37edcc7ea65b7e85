use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::DatasetRecord;

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Write records as a pretty-printed JSON array.
///
/// ```json
/// [
///   {
///     "question": { "id": "q1", "text": "What is X?" },
///     "reference_answer": { "id": "A1", "text": "X is Y" },
///     "answers": { "sentences": ["X is Y"], "classes": ["correct"] }
///   }
/// ]
/// ```
pub fn write_json<W: Write>(records: &[DatasetRecord], mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, records).context("writing JSON")?;
    writeln!(out).context("writing JSON")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV – one row per student answer
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct AnswerRow<'a> {
    question_id: &'a str,
    question_text: Option<&'a str>,
    reference_id: Option<&'a str>,
    reference_text: Option<&'a str>,
    sentence: &'a str,
    class: &'a str,
}

/// Flatten the student answers of all records into a CSV table.
///
/// Columns: `question_id,question_text,reference_id,reference_text,sentence,class`.
/// Missing question text or reference answer leaves the cell empty.
pub fn write_answers_csv<W: Write>(records: &[DatasetRecord], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    let mut rows = 0usize;

    for rec in records {
        let Some(answers) = &rec.answers else {
            continue;
        };
        let reference = rec.reference_answer.as_ref();
        for (sentence, class) in answers.iter() {
            writer
                .serialize(AnswerRow {
                    question_id: &rec.question.id,
                    question_text: rec.question.text.as_deref(),
                    reference_id: reference.map(|r| r.id.as_str()),
                    reference_text: reference.map(|r| r.text.as_str()),
                    sentence,
                    class,
                })
                .with_context(|| format!("writing CSV row for question '{}'", rec.question.id))?;
            rows += 1;
        }
    }

    writer.flush().context("flushing CSV")?;
    log::debug!("Wrote {rows} answer rows");
    Ok(())
}
