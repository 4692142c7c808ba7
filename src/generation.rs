use std::fmt;
use std::time::Instant;

use crate::ai::client::GenerationClient;
use crate::ai::parser::{parse_flashcards, parse_quiz};
use crate::ai::prompt::{flashcard_prompt, quiz_prompt};
use crate::error::StudyError;
use crate::intake::TextExtractor;
use crate::models::{FlashcardDeck, QuestionKind, Quiz, SourceDocument};

/// Allowed quiz lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionCount {
    Five,
    #[default]
    Ten,
    Fifteen,
    Twenty,
}

impl QuestionCount {
    pub const ALL: [QuestionCount; 4] = [
        QuestionCount::Five,
        QuestionCount::Ten,
        QuestionCount::Fifteen,
        QuestionCount::Twenty,
    ];

    pub fn get(&self) -> usize {
        match self {
            QuestionCount::Five => 5,
            QuestionCount::Ten => 10,
            QuestionCount::Fifteen => 15,
            QuestionCount::Twenty => 20,
        }
    }

    pub fn from_count(count: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.get() == count)
    }

    pub fn increase(&self) -> Self {
        match self {
            QuestionCount::Five => QuestionCount::Ten,
            QuestionCount::Ten => QuestionCount::Fifteen,
            QuestionCount::Fifteen | QuestionCount::Twenty => QuestionCount::Twenty,
        }
    }

    pub fn decrease(&self) -> Self {
        match self {
            QuestionCount::Five | QuestionCount::Ten => QuestionCount::Five,
            QuestionCount::Fifteen => QuestionCount::Ten,
            QuestionCount::Twenty => QuestionCount::Fifteen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOptions {
    pub question_count: QuestionCount,
    pub kind: QuestionKind,
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            question_count: QuestionCount::Ten,
            kind: QuestionKind::SingleChoice,
        }
    }
}

/// Identifies one outbound generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationTicket(pub u64);

impl fmt::Display for GenerationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationStatus {
    Idle,
    Generating {
        ticket: GenerationTicket,
        started_at: Instant,
    },
    Error(String),
    Done,
}

/// Status bookkeeping shared by the quiz and flashcard generators.
#[derive(Debug, Clone)]
pub struct GenerationController {
    status: GenerationStatus,
}

impl Default for GenerationController {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationController {
    pub fn new() -> Self {
        Self {
            status: GenerationStatus::Idle,
        }
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.status, GenerationStatus::Generating { .. })
    }

    pub fn outstanding(&self) -> Option<GenerationTicket> {
        match self.status {
            GenerationStatus::Generating { ticket, .. } => Some(ticket),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            GenerationStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Enters `Generating` under `ticket`.
    ///
    /// A missing document moves to `Error` with a user-facing message; a call
    /// while a request is outstanding is refused and changes nothing.
    pub fn begin(
        &mut self,
        document: Option<&SourceDocument>,
        ticket: GenerationTicket,
    ) -> Result<GenerationTicket, StudyError> {
        if self.is_generating() {
            return Err(StudyError::GenerationInFlight);
        }
        let Some(document) = document else {
            let err = StudyError::MissingDocument;
            self.status = GenerationStatus::Error(err.user_message());
            return Err(err);
        };

        log::info!("generation {} started for {}", ticket, document.name());
        self.status = GenerationStatus::Generating {
            ticket,
            started_at: Instant::now(),
        };
        Ok(ticket)
    }

    /// Applies the response for `ticket`, emitting the artifact at most once.
    ///
    /// Responses for any ticket other than the outstanding one are discarded.
    pub fn complete<T>(
        &mut self,
        ticket: GenerationTicket,
        result: Result<T, StudyError>,
    ) -> Option<T> {
        if self.outstanding() != Some(ticket) {
            log::debug!("discarding stale generation response {}", ticket);
            return None;
        }

        match result {
            Ok(artifact) => {
                log::info!("generation {} done", ticket);
                self.status = GenerationStatus::Done;
                Some(artifact)
            }
            Err(e) => {
                log::warn!("generation {} failed: {}", ticket, e);
                self.status = GenerationStatus::Error(e.user_message());
                None
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuizGenerator {
    pub options: QuizOptions,
    pub controller: GenerationController,
}

impl QuizGenerator {
    pub fn new(options: QuizOptions) -> Self {
        Self {
            options,
            controller: GenerationController::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlashcardGenerator {
    pub controller: GenerationController,
}

/// Keeps the questions of the requested kind, in order, up to the count.
pub fn select_questions(quiz: Quiz, options: &QuizOptions) -> Quiz {
    let questions = quiz
        .questions
        .into_iter()
        .filter(|q| q.kind() == options.kind)
        .take(options.question_count.get())
        .collect();
    Quiz {
        title: quiz.title,
        questions,
    }
}

/// Runs one quiz generation round trip against the collaborator.
pub async fn generate_quiz(
    client: &dyn GenerationClient,
    extractor: &dyn TextExtractor,
    document: &SourceDocument,
    options: &QuizOptions,
) -> Result<Quiz, StudyError> {
    let text = extractor.extract(document)?;
    let request = quiz_prompt(options, &text);

    let response = client.generate(&request).await?;
    log::debug!("raw quiz response: {}", response);

    let quiz = parse_quiz(&response)?;
    quiz.validate()?;

    let total = quiz.len();
    let selected = select_questions(quiz, options);
    if selected.len() < options.question_count.get() {
        log::warn!(
            "requested {} {} questions, got {} of {} usable",
            options.question_count.get(),
            options.kind,
            selected.len(),
            total
        );
    }
    Ok(selected)
}

/// Runs one flashcard generation round trip against the collaborator.
pub async fn generate_flashcards(
    client: &dyn GenerationClient,
    extractor: &dyn TextExtractor,
    document: &SourceDocument,
) -> Result<FlashcardDeck, StudyError> {
    let text = extractor.extract(document)?;
    let request = flashcard_prompt(&text);

    let response = client.generate(&request).await?;
    log::debug!("raw flashcard response: {}", response);

    let deck = parse_flashcards(&response)?;
    deck.validate()?;
    Ok(deck)
}
