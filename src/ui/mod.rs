pub mod layout;
mod flashcards;
mod generator;
mod intake;
mod quiz;
mod summary;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::navigation::Screen;

pub use flashcards::draw_flashcards;
pub use generator::{draw_flashcard_generator, draw_quiz_generator};
pub use intake::draw_intake;
pub use layout::{calculate_quiz_chunks, calculate_screen_chunks};
pub use quiz::draw_quiz;
pub use summary::draw_summary;

/// Renders whichever screen the navigator has active.
pub fn draw(f: &mut Frame, app: &App) {
    let navigator = app.navigator();
    let document = navigator.context().document.as_ref();
    match navigator.screen() {
        Screen::Intake => draw_intake(f, app),
        Screen::QuizGeneration(generator) => {
            draw_quiz_generator(f, generator, document, app.status())
        }
        Screen::FlashcardGeneration(generator) => {
            draw_flashcard_generator(f, generator, document, app.status())
        }
        Screen::QuizSession(taker) if taker.is_finished() => draw_summary(f, taker),
        Screen::QuizSession(taker) => draw_quiz(f, taker),
        Screen::FlashcardSession(viewer) => draw_flashcards(f, viewer),
    }
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// One help row: `key` in the accent style followed by its description.
fn help_line(keys: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (key, label) in keys {
        spans.push(Span::styled(key.to_string(), key_style()));
        spans.push(Span::from(format!(" {}  ", label)));
    }
    Line::from(spans)
}

fn draw_header(f: &mut Frame, area: Rect, title: &str) {
    let header = Paragraph::new(title.to_string())
        .style(key_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_help(f: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let help = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn draw_status(f: &mut Frame, area: Rect, message: Option<&str>, color: Color) {
    let status = Paragraph::new(message.unwrap_or("").to_string())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn empty_hint(text: &str) -> Paragraph<'static> {
    Paragraph::new(text.to_string())
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL))
}
