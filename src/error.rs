//! Error types shared across the generation, session and navigation layers.

use thiserror::Error;

use crate::models::QuestionKind;
use crate::navigation::View;

/// Errors a user can run into while producing or navigating study material.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum StudyError {
    #[error("no document selected")]
    MissingDocument,
    #[error("a generation request is already in flight")]
    GenerationInFlight,
    #[error("generation request failed: {0}")]
    GenerationTransportFailure(String),
    #[error("generated content was invalid: {0}")]
    GenerationResponseInvalid(String),
    #[error("{view:?} cannot be entered without its payload")]
    NavigationInvariantViolation { view: View },
}

impl StudyError {
    /// Message shown in the status area of the active screen.
    pub fn user_message(&self) -> String {
        match self {
            StudyError::MissingDocument => {
                "No file uploaded. Please go back to upload a file.".to_string()
            }
            StudyError::GenerationInFlight => "Generation already in progress.".to_string(),
            StudyError::GenerationTransportFailure(reason) => {
                format!("Could not reach the AI service ({reason}). Please try again.")
            }
            StudyError::GenerationResponseInvalid(reason) => {
                format!("The AI returned unusable content ({reason}). Please try again.")
            }
            StudyError::NavigationInvariantViolation { .. } => {
                "Nothing generated yet. Generate first.".to_string()
            }
        }
    }
}

impl From<ClientError> for StudyError {
    fn from(err: ClientError) -> Self {
        StudyError::GenerationTransportFailure(err.to_string())
    }
}

impl From<ArtifactError> for StudyError {
    fn from(err: ArtifactError) -> Self {
        StudyError::GenerationResponseInvalid(err.to_string())
    }
}

/// Structural violations found while validating a quiz or a deck.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ArtifactError {
    #[error("response is not valid JSON: {0}")]
    Malformed(String),
    #[error("duplicate question id `{0}`")]
    DuplicateQuestion(String),
    #[error("question `{0}` has an empty prompt")]
    EmptyPrompt(String),
    #[error("question `{question}` has {count} options")]
    WrongOptionCount { question: String, count: usize },
    #[error("question `{question}` repeats option id `{option}`")]
    DuplicateOption { question: String, option: String },
    #[error("question `{question}` has an empty option label")]
    EmptyOptionLabel { question: String },
    #[error("question `{question}` references unknown option `{option}`")]
    UnknownCorrectOption { question: String, option: String },
    #[error("question `{0}` has no correct answer")]
    NoCorrectAnswer(String),
    #[error("question `{question}` is {kind} but its answer has the wrong shape")]
    AnswerShape { question: String, kind: QuestionKind },
    #[error("question `{question}` has unknown type `{kind}`")]
    UnknownKind { question: String, kind: String },
    #[error("duplicate flashcard id `{0}`")]
    DuplicateCard(String),
    #[error("flashcard `{0}` is missing its term or definition")]
    IncompleteCard(String),
}

/// Transport-level failures of a generation collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    #[error("generation service is not configured: {0}")]
    NotConfigured(String),
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Api(String),
    #[error("service returned an empty response")]
    EmptyResponse,
    #[error("no response within {0} seconds")]
    Timeout(u64),
}

/// Rejected answer changes on a `QuizTaker`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("no question with id `{0}`")]
    UnknownQuestion(String),
    #[error("{kind} question `{question}` needs a single option")]
    ExpectedSingle { question: String, kind: QuestionKind },
    #[error("multiple-choice question `{0}` needs a set of options")]
    ExpectedMultiple(String),
    #[error("answer for `{0}` selects nothing")]
    EmptySelection(String),
    #[error("question `{question}` has no option `{option}`")]
    UnknownOption { question: String, option: String },
    #[error("the quiz is finished; restart it to change answers")]
    Finished,
}

/// Reasons a picked file never becomes a `SourceDocument`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntakeError {
    #[error("File size exceeds 10MB limit.")]
    TooLarge { size_bytes: u64 },
    #[error("Only PDF files are supported.")]
    UnsupportedMediaType(String),
    #[error("file has no usable name")]
    Unnamed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Invalid environment configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unknown provider `{0}` (expected `openrouter` or `gemini`)")]
    UnknownProvider(String),
    #[error("`{key}` has invalid value `{value}`")]
    InvalidValue { key: &'static str, value: String },
}
