pub mod ai;
pub mod ai_worker;
pub mod app;
pub mod config;
pub mod error;
pub mod generation;
pub mod intake;
pub mod logger;
pub mod models;
pub mod navigation;
pub mod session;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod ui_tests;

// Re-exports for convenience
pub use app::{App, AppControl};
pub use error::StudyError;
pub use generation::{GenerationController, GenerationStatus, QuestionCount, QuizOptions};
pub use models::{Answer, AnswerKey, Flashcard, FlashcardDeck, Question, QuestionKind, Quiz};
pub use navigation::{NavEvent, Navigator, Transition, View};
pub use session::{FlashcardViewer, QuizTaker};
