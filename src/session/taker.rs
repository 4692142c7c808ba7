use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::AnswerError;
use crate::models::{Answer, Question, QuestionKind, Quiz};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
}

impl QuizScore {
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f32 * 100.0 / self.total as f32
        }
    }
}

/// Cursor and answer sheet over one quiz. The quiz itself is never mutated.
#[derive(Debug, Clone)]
pub struct QuizTaker {
    quiz: Arc<Quiz>,
    index: usize,
    answers: HashMap<String, Answer>,
    highlighted: usize,
    finished: bool,
}

impl QuizTaker {
    pub fn new(quiz: Arc<Quiz>) -> Self {
        Self {
            quiz,
            index: 0,
            answers: HashMap::new(),
            highlighted: 0,
            finished: false,
        }
    }

    pub fn quiz(&self) -> &Arc<Quiz> {
        &self.quiz
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.quiz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quiz.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current(&self) -> Option<&Question> {
        self.quiz.questions.get(self.index)
    }

    /// Option under the selection cursor of the current question.
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn can_navigate(&self) -> bool {
        self.len() > 1
    }

    pub fn next(&mut self) {
        if !self.can_navigate() {
            return;
        }
        self.index = (self.index + 1) % self.len();
        self.highlighted = 0;
    }

    pub fn previous(&mut self) {
        if !self.can_navigate() {
            return;
        }
        self.index = (self.index + self.len() - 1) % self.len();
        self.highlighted = 0;
    }

    pub fn highlight_next(&mut self) {
        if let Some(question) = self.current()
            && !question.options.is_empty()
        {
            self.highlighted = (self.highlighted + 1) % question.options.len();
        }
    }

    pub fn highlight_previous(&mut self) {
        if let Some(question) = self.current()
            && !question.options.is_empty()
        {
            let len = question.options.len();
            self.highlighted = (self.highlighted + len - 1) % len;
        }
    }

    /// Stores `answer` after checking it fits the question's kind and options.
    pub fn record_answer(&mut self, question_id: &str, answer: Answer) -> Result<(), AnswerError> {
        self.ensure_open()?;
        let question = self
            .quiz
            .question(question_id)
            .ok_or_else(|| AnswerError::UnknownQuestion(question_id.to_string()))?;

        let unknown = |option: &str| AnswerError::UnknownOption {
            question: question.id.clone(),
            option: option.to_string(),
        };
        match (question.kind(), &answer) {
            (QuestionKind::SingleChoice | QuestionKind::Boolean, Answer::Single(id)) => {
                if !question.has_option(id) {
                    return Err(unknown(id));
                }
            }
            (kind @ (QuestionKind::SingleChoice | QuestionKind::Boolean), Answer::Multiple(_)) => {
                return Err(AnswerError::ExpectedSingle {
                    question: question.id.clone(),
                    kind,
                });
            }
            (QuestionKind::MultipleChoice, Answer::Multiple(ids)) => {
                if ids.is_empty() {
                    return Err(AnswerError::EmptySelection(question.id.clone()));
                }
                if let Some(missing) = ids.iter().find(|id| !question.has_option(id)) {
                    return Err(unknown(missing));
                }
            }
            (QuestionKind::MultipleChoice, Answer::Single(_)) => {
                return Err(AnswerError::ExpectedMultiple(question.id.clone()));
            }
        }

        self.answers.insert(question_id.to_string(), answer);
        Ok(())
    }

    /// Picks the option at `position` on the current question. Multiple-choice
    /// questions toggle membership instead.
    pub fn select_option(&mut self, position: usize) -> Result<(), AnswerError> {
        self.ensure_open()?;
        let Some(question) = self.current() else {
            return Ok(());
        };
        let Some(option) = question.options.get(position) else {
            return Ok(());
        };
        let question_id = question.id.clone();
        let option_id = option.id.clone();

        let answer = match question.kind() {
            QuestionKind::SingleChoice | QuestionKind::Boolean => Answer::Single(option_id),
            QuestionKind::MultipleChoice => {
                let mut ids = match self.answers.get(&question_id) {
                    Some(Answer::Multiple(ids)) => ids.clone(),
                    _ => BTreeSet::new(),
                };
                if !ids.remove(&option_id) {
                    ids.insert(option_id);
                }
                if ids.is_empty() {
                    self.answers.remove(&question_id);
                    return Ok(());
                }
                Answer::Multiple(ids)
            }
        };
        self.record_answer(&question_id, answer)
    }

    pub fn select_highlighted(&mut self) -> Result<(), AnswerError> {
        self.select_option(self.highlighted)
    }

    pub fn clear_answer(&mut self) -> Result<(), AnswerError> {
        self.ensure_open()?;
        if let Some(question) = self.quiz.questions.get(self.index) {
            self.answers.remove(&question.id);
        }
        Ok(())
    }

    /// Answers are frozen once the quiz is finished.
    fn ensure_open(&self) -> Result<(), AnswerError> {
        if self.finished {
            return Err(AnswerError::Finished);
        }
        Ok(())
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn restart(&mut self) {
        self.index = 0;
        self.highlighted = 0;
        self.answers.clear();
        self.finished = false;
    }

    /// Whether the recorded answer is right; `None` when unanswered.
    pub fn is_correct(&self, question_id: &str) -> Option<bool> {
        let question = self.quiz.question(question_id)?;
        let answer = self.answers.get(question_id)?;
        Some(question.key.accepts(answer))
    }

    pub fn score(&self) -> QuizScore {
        let correct = self
            .quiz
            .questions
            .iter()
            .filter(|q| self.is_correct(&q.id) == Some(true))
            .count();
        QuizScore {
            correct,
            answered: self.answers.len(),
            total: self.quiz.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{boolean, multiple, quiz, single};

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn taker() -> QuizTaker {
        QuizTaker::new(Arc::new(quiz(vec![
            single("q1", "c"),
            multiple("q2", &["a", "b"]),
            boolean("q3", "false"),
        ])))
    }

    #[test]
    fn test_two_ids_on_single_choice_rejected() {
        let mut taker = taker();
        assert_eq!(
            taker.record_answer("q1", Answer::Multiple(set(&["a", "b"]))),
            Err(AnswerError::ExpectedSingle {
                question: "q1".to_string(),
                kind: QuestionKind::SingleChoice
            })
        );
        assert!(taker.answer_for("q1").is_none());
    }

    #[test]
    fn test_single_id_on_multiple_choice_rejected() {
        let mut taker = taker();
        assert_eq!(
            taker.record_answer("q2", Answer::Single("a".to_string())),
            Err(AnswerError::ExpectedMultiple("q2".to_string()))
        );
    }

    #[test]
    fn test_record_answer_checks_ids() {
        let mut taker = taker();
        assert_eq!(
            taker.record_answer("nope", Answer::Single("a".to_string())),
            Err(AnswerError::UnknownQuestion("nope".to_string()))
        );
        assert!(matches!(
            taker.record_answer("q3", Answer::Single("maybe".to_string())),
            Err(AnswerError::UnknownOption { .. })
        ));
        assert_eq!(
            taker.record_answer("q2", Answer::Multiple(BTreeSet::new())),
            Err(AnswerError::EmptySelection("q2".to_string()))
        );
        assert!(taker.record_answer("q2", Answer::Multiple(set(&["a"]))).is_ok());
    }

    #[test]
    fn test_scoring_does_not_touch_quiz() {
        let mut taker = taker();
        let before = taker.quiz().as_ref().clone();

        taker.record_answer("q1", Answer::Single("c".to_string())).unwrap();
        taker.record_answer("q2", Answer::Multiple(set(&["a"]))).unwrap();
        taker.record_answer("q3", Answer::Single("false".to_string())).unwrap();

        assert_eq!(
            taker.score(),
            QuizScore {
                correct: 2,
                answered: 3,
                total: 3
            }
        );
        assert_eq!(taker.is_correct("q2"), Some(false));
        assert_eq!(taker.quiz().as_ref(), &before);
    }

    #[test]
    fn test_select_option_toggles_multiple_choice() {
        let mut taker = taker();
        taker.next();
        assert_eq!(taker.current().unwrap().id, "q2");

        taker.select_option(0).unwrap();
        taker.select_option(1).unwrap();
        assert_eq!(taker.answer_for("q2"), Some(&Answer::Multiple(set(&["a", "b"]))));
        assert_eq!(taker.is_correct("q2"), Some(true));

        taker.select_option(0).unwrap();
        taker.select_option(1).unwrap();
        assert!(taker.answer_for("q2").is_none());
    }

    #[test]
    fn test_select_option_replaces_single_choice() {
        let mut taker = taker();
        taker.select_option(0).unwrap();
        taker.select_option(2).unwrap();
        assert_eq!(taker.answer_for("q1"), Some(&Answer::Single("c".to_string())));

        assert!(taker.select_option(99).is_ok());
        assert_eq!(taker.answer_for("q1"), Some(&Answer::Single("c".to_string())));
    }

    #[test]
    fn test_navigation_cycles_and_resets_highlight() {
        let mut taker = taker();
        taker.highlight_next();
        taker.highlight_next();
        assert_eq!(taker.highlighted(), 2);

        taker.previous();
        assert_eq!(taker.index(), 2);
        assert_eq!(taker.highlighted(), 0);
        taker.highlight_previous();
        assert_eq!(taker.highlighted(), 1);

        taker.next();
        assert_eq!(taker.index(), 0);
    }

    #[test]
    fn test_single_question_quiz_does_not_navigate() {
        let mut taker = QuizTaker::new(Arc::new(quiz(vec![single("q1", "a")])));
        taker.next();
        taker.previous();
        assert_eq!(taker.index(), 0);
    }

    #[test]
    fn test_finished_quiz_freezes_answers() {
        let mut taker = taker();
        taker.select_option(2).unwrap();
        taker.finish();

        assert_eq!(taker.select_option(0), Err(AnswerError::Finished));
        assert_eq!(
            taker.record_answer("q3", Answer::Single("false".to_string())),
            Err(AnswerError::Finished)
        );
        assert_eq!(taker.clear_answer(), Err(AnswerError::Finished));
        assert_eq!(
            taker.answer_for("q1"),
            Some(&Answer::Single("c".to_string()))
        );
        assert_eq!(taker.score().correct, 1);

        taker.restart();
        assert!(taker.select_option(0).is_ok());
    }

    #[test]
    fn test_restart_clears_answers() {
        let mut taker = taker();
        taker.select_option(2).unwrap();
        taker.next();
        taker.finish();
        taker.restart();

        assert_eq!(taker.index(), 0);
        assert!(!taker.is_finished());
        assert_eq!(taker.score().answered, 0);
    }

    #[test]
    fn test_empty_quiz_is_inert() {
        let mut taker = QuizTaker::new(Arc::new(quiz(vec![])));
        taker.next();
        taker.highlight_next();
        assert!(taker.clear_answer().is_ok());
        assert!(taker.select_highlighted().is_ok());
        assert!(taker.current().is_none());
        assert_eq!(taker.score().percentage(), 0.0);
    }
}
