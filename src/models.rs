use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;

/// A validated handle to the file the user picked.
///
/// Only `intake` builds these, so every instance satisfies the size and media
/// type limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    name: String,
    size_bytes: u64,
    media_type: String,
}

impl SourceDocument {
    pub(crate) fn new(name: String, size_bytes: u64, media_type: String) -> Self {
        Self {
            name,
            size_bytes,
            media_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice,
    MultipleChoice,
    Boolean,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 3] = [
        QuestionKind::SingleChoice,
        QuestionKind::MultipleChoice,
        QuestionKind::Boolean,
    ];

    /// Parses the wire names, including the ones the backend prompt used.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "single_choice" | "single_correct" | "single" => Some(QuestionKind::SingleChoice),
            "multiple_choice" | "multiple_correct" | "multiple" => {
                Some(QuestionKind::MultipleChoice)
            }
            "boolean" | "yes_no" | "true_false" => Some(QuestionKind::Boolean),
            _ => None,
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice => "single_choice",
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::Boolean => "boolean",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::SingleChoice => "Single Choice",
            QuestionKind::MultipleChoice => "Multiple Choice",
            QuestionKind::Boolean => "Yes or No",
        }
    }

    /// The next kind in display order, wrapping around.
    pub fn cycle(&self) -> Self {
        match self {
            QuestionKind::SingleChoice => QuestionKind::MultipleChoice,
            QuestionKind::MultipleChoice => QuestionKind::Boolean,
            QuestionKind::Boolean => QuestionKind::SingleChoice,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOption {
    pub id: String,
    pub label: String,
}

/// The correct answer of a question, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    SingleChoice { correct: String },
    MultipleChoice { correct: BTreeSet<String> },
    Boolean { correct: String },
}

impl AnswerKey {
    pub fn kind(&self) -> QuestionKind {
        match self {
            AnswerKey::SingleChoice { .. } => QuestionKind::SingleChoice,
            AnswerKey::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            AnswerKey::Boolean { .. } => QuestionKind::Boolean,
        }
    }

    /// True when `answer` is exactly the correct selection.
    pub fn accepts(&self, answer: &Answer) -> bool {
        match (self, answer) {
            (AnswerKey::SingleChoice { correct }, Answer::Single(id))
            | (AnswerKey::Boolean { correct }, Answer::Single(id)) => correct == id,
            (AnswerKey::MultipleChoice { correct }, Answer::Multiple(ids)) => correct == ids,
            _ => false,
        }
    }

    pub fn is_correct_option(&self, option_id: &str) -> bool {
        match self {
            AnswerKey::SingleChoice { correct } | AnswerKey::Boolean { correct } => {
                correct == option_id
            }
            AnswerKey::MultipleChoice { correct } => correct.contains(option_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
    pub key: AnswerKey,
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        self.key.kind()
    }

    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.prompt.trim().is_empty() {
            return Err(ArtifactError::EmptyPrompt(self.id.clone()));
        }

        let count = self.options.len();
        if count < 2 || (self.kind() == QuestionKind::Boolean && count != 2) {
            return Err(ArtifactError::WrongOptionCount {
                question: self.id.clone(),
                count: self.options.len(),
            });
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.id.as_str()) {
                return Err(ArtifactError::DuplicateOption {
                    question: self.id.clone(),
                    option: option.id.clone(),
                });
            }
            if option.label.trim().is_empty() {
                return Err(ArtifactError::EmptyOptionLabel {
                    question: self.id.clone(),
                });
            }
        }

        let unknown = |option: &str| ArtifactError::UnknownCorrectOption {
            question: self.id.clone(),
            option: option.to_string(),
        };
        match &self.key {
            AnswerKey::SingleChoice { correct } | AnswerKey::Boolean { correct } => {
                if !self.has_option(correct) {
                    return Err(unknown(correct));
                }
            }
            AnswerKey::MultipleChoice { correct } => {
                if correct.is_empty() {
                    return Err(ArtifactError::NoCorrectAnswer(self.id.clone()));
                }
                if let Some(missing) = correct.iter().find(|id| !self.has_option(id)) {
                    return Err(unknown(missing));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Checks every structural invariant, reporting the first violation.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        let mut ids = HashSet::new();
        for question in &self.questions {
            if !ids.insert(question.id.as_str()) {
                return Err(ArtifactError::DuplicateQuestion(question.id.clone()));
            }
            question.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardDeck {
    pub cards: Vec<Flashcard>,
}

impl FlashcardDeck {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        let mut ids = HashSet::new();
        for card in &self.cards {
            if !ids.insert(card.id.as_str()) {
                return Err(ArtifactError::DuplicateCard(card.id.clone()));
            }
            if card.term.trim().is_empty() || card.definition.trim().is_empty() {
                return Err(ArtifactError::IncompleteCard(card.id.clone()));
            }
        }
        Ok(())
    }
}

pub fn is_valid_quiz(quiz: &Quiz) -> bool {
    quiz.validate().is_ok()
}

pub fn is_valid_deck(deck: &FlashcardDeck) -> bool {
    deck.validate().is_ok()
}

/// What the user picked for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Single(String),
    Multiple(BTreeSet<String>),
}

impl Answer {
    pub fn contains(&self, option_id: &str) -> bool {
        match self {
            Answer::Single(id) => id == option_id,
            Answer::Multiple(ids) => ids.contains(option_id),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn option(id: &str, label: &str) -> QuizOption {
        QuizOption {
            id: id.to_string(),
            label: label.to_string(),
        }
    }

    pub fn single(id: &str, correct: &str) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("Prompt for {id}?"),
            options: vec![
                option("a", "Alpha"),
                option("b", "Beta"),
                option("c", "Gamma"),
                option("d", "Delta"),
            ],
            key: AnswerKey::SingleChoice {
                correct: correct.to_string(),
            },
        }
    }

    pub fn multiple(id: &str, correct: &[&str]) -> Question {
        Question {
            key: AnswerKey::MultipleChoice {
                correct: correct.iter().map(|s| s.to_string()).collect(),
            },
            ..single(id, "a")
        }
    }

    pub fn boolean(id: &str, correct: &str) -> Question {
        Question {
            id: id.to_string(),
            prompt: format!("Is {id} true?"),
            options: vec![option("true", "Yes"), option("false", "No")],
            key: AnswerKey::Boolean {
                correct: correct.to_string(),
            },
        }
    }

    pub fn quiz(questions: Vec<Question>) -> Quiz {
        Quiz {
            title: "Test Quiz".to_string(),
            questions,
        }
    }

    pub fn deck(len: usize) -> FlashcardDeck {
        FlashcardDeck::new(
            (1..=len)
                .map(|i| Flashcard {
                    id: format!("card-{i}"),
                    term: format!("Term {i}"),
                    definition: format!("Definition {i}"),
                })
                .collect(),
        )
    }
}
