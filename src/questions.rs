// src/questions.rs

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{
    error::LoadError,
    models::question::{Question, QuestionRow},
};

/// The immutable, ordered question set served to every session.
///
/// Built once at startup and shared read-only (behind an `Arc`) by all
/// handlers. Never empty.
#[derive(Debug, Clone)]
pub struct QuestionStore {
    questions: Vec<Question>,
}

impl QuestionStore {
    /// Opens and loads a question CSV from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::load(file)?;
        tracing::info!(
            "Loaded {} questions from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parses CSV rows with the columns
    /// `id, question, option_A, option_B, option_C, option_D, correct`.
    ///
    /// * Invalid rows (empty question, `correct` outside A-D, undecodable
    ///   records) are dropped without error.
    /// * Fails with `LoadError::NoValidQuestions` when nothing survives.
    pub fn load<R: Read>(source: R) -> Result<Self, LoadError> {
        let scan = scan_rows(source)?;
        let rows = scan.questions.len() + scan.rejected_lines.len();

        if scan.questions.is_empty() {
            return Err(LoadError::NoValidQuestions { rows });
        }

        if !scan.rejected_lines.is_empty() {
            tracing::warn!(
                "Dropped {} of {} question rows that failed validation",
                scan.rejected_lines.len(),
                rows
            );
        }

        Ok(Self {
            questions: scan.questions,
        })
    }

    /// Question at `index`, in source order.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false for a loaded store.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

/// Outcome of reading every record of a question CSV.
struct RowScan {
    questions: Vec<Question>,
    /// File line (1-based, header is line 1) where each dropped record starts.
    rejected_lines: Vec<u64>,
}

fn scan_rows<R: Read>(source: R) -> Result<RowScan, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    // Surface an unreadable header as a load failure instead of an empty set.
    let headers = reader.headers()?.clone();

    let mut scan = RowScan {
        questions: Vec::new(),
        rejected_lines: Vec::new(),
    };

    for result in reader.records() {
        let (line, question) = match result {
            Ok(record) => (
                record.position().map(|p| p.line()),
                record
                    .deserialize::<QuestionRow>(Some(&headers))
                    .ok()
                    .and_then(QuestionRow::into_question),
            ),
            // Undecodable records (e.g. invalid UTF-8) are invalid rows.
            Err(e) => (e.position().map(|p| p.line()), None),
        };

        match question {
            Some(question) => scan.questions.push(question),
            None => {
                let line = line.unwrap_or_default();
                tracing::debug!("Dropping invalid question row at line {}", line);
                scan.rejected_lines.push(line);
            }
        }
    }

    Ok(scan)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::question::OptionLabel;

    pub(crate) const HEADER: &str = "id,question,option_A,option_B,option_C,option_D,correct\n";

    pub(crate) fn store_from(body: &str) -> QuestionStore {
        QuestionStore::load(format!("{HEADER}{body}").as_bytes()).unwrap()
    }

    #[test]
    fn loads_rows_in_source_order() {
        let store = store_from(
            "1,2+2?,3,4,5,6,B\n\
             2,Capital of France?,Paris,Rome,Oslo,Bern,a\n",
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().text, "2+2?");
        assert_eq!(store.get(1).unwrap().correct_label, OptionLabel::A);
        assert!(store.get(2).is_none());
    }

    #[test]
    fn size_counts_only_valid_rows() {
        let store = store_from(
            "1,Valid one,a,b,c,d,A\n\
             2,,a,b,c,d,B\n\
             3,Bad label,a,b,c,d,E\n\
             4,  Valid two  ,a,b,c,d,  c  \n\
             5,No label,a,b,c,d,\n",
        );
        assert_eq!(store.len(), 2);
        let texts: Vec<_> = store.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, ["Valid one", "Valid two"]);
        assert_eq!(store.get(1).unwrap().correct_label, OptionLabel::C);
    }

    #[test]
    fn empty_question_row_is_dropped() {
        let store = store_from(
            "1,\"\",3,4,5,6,B\n\
             2,2+2?,3,4,5,6,B\n",
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().id, "2");
    }

    #[test]
    fn correct_label_e_is_dropped() {
        let store = store_from(
            "1,Pick one,a,b,c,d,E\n\
             2,Pick another,a,b,c,d,D\n",
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().text, "Pick another");
    }

    #[test]
    fn all_invalid_rows_fail() {
        let err = QuestionStore::load(
            format!("{HEADER}1,,a,b,c,d,A\n2,Q,a,b,c,d,Z\n3,Q,a,b,c,d,\n").as_bytes(),
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::NoValidQuestions { rows: 3 }));
    }

    #[test]
    fn header_only_fails() {
        let err = QuestionStore::load(HEADER.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::NoValidQuestions { rows: 0 }));
    }

    #[test]
    fn empty_source_fails() {
        assert!(QuestionStore::load(&b""[..]).is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = QuestionStore::from_path("does/not/exist/questions.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn missing_columns_read_as_empty() {
        let store = QuestionStore::load(&b"question,correct,option_B\nWhich?,b,yes\n"[..]).unwrap();
        let q = store.get(0).unwrap();
        assert_eq!(q.id, "");
        assert_eq!(q.option(OptionLabel::A), "");
        assert_eq!(q.option(OptionLabel::B), "yes");
        assert_eq!(q.correct_label, OptionLabel::B);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let store = store_from("1,Short row,a,b,c,d,A\n2,Too short\n");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let store = store_from("7,\"Pick 1, 2 or 3\",\"one, really\",b,c,d,A\n");
        let q = store.get(0).unwrap();
        assert_eq!(q.text, "Pick 1, 2 or 3");
        assert_eq!(q.option(OptionLabel::A), "one, really");
    }

    #[test]
    fn undecodable_row_is_dropped() {
        let mut source = HEADER.as_bytes().to_vec();
        source.extend_from_slice(b"1,bad \xff row,a,b,c,d,A\n2,good,a,b,c,d,B\n");

        let store = QuestionStore::load(source.as_slice()).unwrap();
        let texts: Vec<_> = store.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, ["good"]);
    }

    #[test]
    fn all_undecodable_rows_fail() {
        let mut source = HEADER.as_bytes().to_vec();
        source.extend_from_slice(b"1,\xff,a,b,c,d,A\n2,x,\xfe,b,c,d,B\n");

        let err = QuestionStore::load(source.as_slice()).unwrap_err();
        assert!(matches!(err, LoadError::NoValidQuestions { rows: 2 }));
    }

    #[test]
    fn rejected_rows_are_reported_by_file_line() {
        let source = format!(
            "{HEADER}1,\"spans\ntwo lines\",a,b,c,d,A\n2,,a,b,c,d,A\n3,ok,a,b,c,d,Q\n"
        );

        let scan = scan_rows(source.as_bytes()).unwrap();
        assert_eq!(scan.questions.len(), 1);
        assert_eq!(scan.questions[0].text, "spans\ntwo lines");
        assert_eq!(scan.rejected_lines, [4, 5]);
    }

    #[test]
    fn script_only_question_is_loaded_verbatim() {
        let store = store_from("1,<script>alert(1)</script>,a,b,c,d,A\n2,ok,a,b,c,d,A\n");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().text, "<script>alert(1)</script>");
    }
}
