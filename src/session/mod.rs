//! Study sessions over a generated quiz or flashcard deck.

mod input;
mod taker;
mod viewer;

pub use input::{SessionEvent, handle_flashcard_input, handle_quiz_input};
pub use taker::{QuizScore, QuizTaker};
pub use viewer::FlashcardViewer;
