// src/engine.rs

use chrono::Utc;

use crate::{
    error::QuizError,
    models::{
        question::Question,
        session::{AnswerRecord, SessionState, Summary},
    },
    questions::QuestionStore,
};

/// Where a session stands in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    /// No session state: the visitor has not given a name yet.
    AwaitingLogin,
    /// Question `index` is the next one to answer.
    InProgress { index: usize },
    /// Every question has been answered.
    Complete,
}

/// The quiz state machine.
///
/// Holds no state of its own: every operation takes the caller's
/// `SessionState` and reads the shared `QuestionStore`.
#[derive(Debug, Clone, Copy)]
pub struct QuizEngine<'a> {
    questions: &'a QuestionStore,
}

impl<'a> QuizEngine<'a> {
    pub fn new(questions: &'a QuestionStore) -> Self {
        Self { questions }
    }

    /// Fresh progress for a newly logged-in user.
    pub fn login(&self, username: &str) -> SessionState {
        SessionState::new(username)
    }

    /// Rewinds to the first question. Safe to call in any state.
    pub fn restart(&self, session: &mut SessionState) {
        session.reset();
    }

    pub fn state(&self, session: Option<&SessionState>) -> QuizState {
        match session {
            None => QuizState::AwaitingLogin,
            Some(session) if self.is_complete(session) => QuizState::Complete,
            Some(session) => QuizState::InProgress {
                index: session.current_index,
            },
        }
    }

    pub fn is_complete(&self, session: &SessionState) -> bool {
        session.current_index >= self.questions.len()
    }

    /// The question the session should answer next.
    ///
    /// Callers must route completed sessions to the summary first; asking
    /// past the end is an `OutOfRange` error, never clamped.
    pub fn current_question(&self, session: &SessionState) -> Result<&'a Question, QuizError> {
        self.questions
            .get(session.current_index)
            .ok_or(QuizError::OutOfRange {
                index: session.current_index,
                total: self.questions.len(),
            })
    }

    /// Records an answer to the current question and advances by one.
    ///
    /// * `selected` is uppercased and stored verbatim; labels outside A-D
    ///   are accepted and scored as incorrect.
    /// * The index moves forward whether or not the answer was correct.
    pub fn submit_answer(
        &self,
        session: &mut SessionState,
        selected: &str,
    ) -> Result<AnswerRecord, QuizError> {
        let question = self.current_question(session)?;
        let selected_label = selected.to_uppercase();
        let is_correct = selected_label == question.correct_label.as_str();

        let record = AnswerRecord {
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            selected_label,
            correct_label: question.correct_label,
            is_correct,
            answered_at: Utc::now(),
        };

        session.answer_log.push(record.clone());
        if is_correct {
            session.score += 1;
        }
        session.current_index += 1;

        Ok(record)
    }

    /// Progress so far; valid before completion too.
    pub fn summary(&self, session: &SessionState) -> Summary {
        Summary {
            username: session.username.clone(),
            score: session.score,
            total: self.questions.len(),
            answer_log: session.answer_log.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::OptionLabel;
    use crate::questions::tests::store_from;

    fn single_question() -> QuestionStore {
        store_from("1,2+2?,3,4,5,6,B\n")
    }

    fn three_questions() -> QuestionStore {
        store_from(
            "1,First,a,b,c,d,A\n\
             2,Second,a,b,c,d,B\n\
             3,Third,a,b,c,d,C\n",
        )
    }

    fn assert_invariant(engine: &QuizEngine<'_>, session: &SessionState, total: usize) {
        assert!(session.score <= session.answer_log.len());
        assert!(session.answer_log.len() <= session.current_index);
        assert!(session.current_index <= total);
        assert_eq!(engine.is_complete(session), session.current_index >= total);
    }

    #[test]
    fn correct_lowercase_answer_completes_single_question_quiz() {
        let store = single_question();
        let engine = QuizEngine::new(&store);
        let mut session = engine.login("alice");

        let question = engine.current_question(&session).unwrap();
        assert_eq!(question.text, "2+2?");
        assert_eq!(question.option(OptionLabel::B), "4");

        let record = engine.submit_answer(&mut session, "b").unwrap();
        assert!(record.is_correct);
        assert_eq!(record.selected_label, "B");
        assert_eq!(record.correct_label, OptionLabel::B);
        assert_eq!(session.score, 1);
        assert!(engine.is_complete(&session));
        assert_eq!(engine.state(Some(&session)), QuizState::Complete);
    }

    #[test]
    fn out_of_set_label_is_recorded_as_incorrect() {
        let store = single_question();
        let engine = QuizEngine::new(&store);
        let mut session = engine.login("alice");

        let record = engine.submit_answer(&mut session, "Z").unwrap();
        assert!(!record.is_correct);
        assert_eq!(record.selected_label, "Z");
        assert_eq!(session.score, 0);
        assert!(engine.is_complete(&session));
    }

    #[test]
    fn malformed_selection_is_stored_as_is() {
        let store = single_question();
        let engine = QuizEngine::new(&store);
        let mut session = engine.login("alice");

        let record = engine.submit_answer(&mut session, " b").unwrap();
        assert_eq!(record.selected_label, " B");
        assert!(!record.is_correct);
    }

    #[test]
    fn index_and_score_follow_submissions() {
        let store = three_questions();
        let engine = QuizEngine::new(&store);
        let mut session = engine.login("bob");
        assert_eq!(engine.state(Some(&session)), QuizState::InProgress { index: 0 });

        for (n, choice) in ["a", "D", "c"].into_iter().enumerate() {
            assert_eq!(session.current_index, n);
            engine.submit_answer(&mut session, choice).unwrap();
            assert_eq!(session.current_index, n + 1);
            assert_invariant(&engine, &session, store.len());
        }

        assert_eq!(session.score, 2);
        assert_eq!(session.answer_log.len(), 3);
        let outcomes: Vec<bool> = session.answer_log.iter().map(|r| r.is_correct).collect();
        assert_eq!(outcomes, [true, false, true]);
        assert_eq!(session.answer_log[1].question_text, "Second");
        assert_eq!(session.answer_log[1].question_id, "2");
    }

    #[test]
    fn current_question_past_the_end_is_out_of_range() {
        let store = single_question();
        let engine = QuizEngine::new(&store);
        let mut session = engine.login("alice");
        engine.submit_answer(&mut session, "A").unwrap();

        assert_eq!(
            engine.current_question(&session),
            Err(QuizError::OutOfRange { index: 1, total: 1 })
        );
        assert!(engine.submit_answer(&mut session, "A").is_err());
        assert_eq!(session.answer_log.len(), 1);
        assert_eq!(session.current_index, 1);
    }

    #[test]
    fn restart_resets_progress_and_keeps_name() {
        let store = three_questions();
        let engine = QuizEngine::new(&store);
        let mut session = engine.login("carol");
        engine.submit_answer(&mut session, "A").unwrap();
        engine.submit_answer(&mut session, "B").unwrap();

        engine.restart(&mut session);
        assert_eq!(session.username, "carol");
        assert_eq!(session.current_index, 0);
        assert_eq!(session.score, 0);
        assert!(session.answer_log.is_empty());

        engine.restart(&mut session);
        assert_eq!(session.current_index, 0);
        assert_eq!(engine.current_question(&session).unwrap().text, "First");
    }

    #[test]
    fn summary_reports_progress_and_is_idempotent() {
        let store = three_questions();
        let engine = QuizEngine::new(&store);
        let mut session = engine.login("dave");
        engine.submit_answer(&mut session, "a").unwrap();

        let first = engine.summary(&session);
        let second = engine.summary(&session);
        assert_eq!(first, second);
        assert_eq!(first.username, "dave");
        assert_eq!(first.score, 1);
        assert_eq!(first.total, 3);
        assert_eq!(first.answer_log.len(), 1);
    }

    #[test]
    fn no_session_means_awaiting_login() {
        let store = single_question();
        let engine = QuizEngine::new(&store);
        assert_eq!(engine.state(None), QuizState::AwaitingLogin);
    }
}
