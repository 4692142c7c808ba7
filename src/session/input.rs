use crossterm::event::{KeyCode, KeyEvent};
use rand::thread_rng;

use super::{FlashcardViewer, QuizTaker};

/// What a session key press means to the surrounding app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    None,
    Back,
}

pub fn handle_flashcard_input(viewer: &mut FlashcardViewer, key: KeyEvent) -> SessionEvent {
    match key.code {
        KeyCode::Esc => return SessionEvent::Back,
        KeyCode::Char(' ') | KeyCode::Enter => viewer.flip(),
        KeyCode::Right | KeyCode::Down => viewer.next(),
        KeyCode::Left | KeyCode::Up => viewer.previous(),
        KeyCode::Char('r') => viewer.restart(),
        KeyCode::Char('s') => viewer.shuffle(&mut thread_rng()),
        _ => {}
    }
    SessionEvent::None
}

pub fn handle_quiz_input(taker: &mut QuizTaker, key: KeyEvent) -> SessionEvent {
    if taker.is_finished() {
        match key.code {
            KeyCode::Esc => return SessionEvent::Back,
            KeyCode::Char('r') => taker.restart(),
            _ => {}
        }
        return SessionEvent::None;
    }

    match key.code {
        KeyCode::Esc => return SessionEvent::Back,
        KeyCode::Up => taker.highlight_previous(),
        KeyCode::Down => taker.highlight_next(),
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Err(e) = taker.select_highlighted() {
                log::warn!("answer rejected: {}", e);
            }
        }
        KeyCode::Right => taker.next(),
        KeyCode::Left => taker.previous(),
        KeyCode::Backspace => {
            if let Err(e) = taker.clear_answer() {
                log::warn!("answer not cleared: {}", e);
            }
        }
        KeyCode::Char('s') => taker.finish(),
        KeyCode::Char('r') => taker.restart(),
        _ => {}
    }
    SessionEvent::None
}
