use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{draw_header, draw_help, empty_hint, help_line};
use crate::session::FlashcardViewer;
use crate::ui::layout::calculate_screen_chunks;

pub fn draw_flashcards(f: &mut Frame, viewer: &FlashcardViewer) {
    let layout = calculate_screen_chunks(f.area());

    let Some(card) = viewer.current() else {
        draw_header(f, layout.header_area, "Flashcards");
        f.render_widget(
            empty_hint("No flashcards were generated. Press Esc to try again."),
            layout.body_area,
        );
        draw_help(f, layout.help_area, vec![help_line(&[("Esc", "Back")])]);
        return;
    };

    draw_header(
        f,
        layout.header_area,
        &format!("Card {} / {}", viewer.index() + 1, viewer.len()),
    );

    let (side, body, color) = if viewer.is_flipped() {
        ("Definition", card.definition.as_str(), Color::Green)
    } else {
        ("Term", card.term.as_str(), Color::Yellow)
    };
    let mut text = Text::default();
    text.push_line(Line::from(""));
    text.push_line(Line::from(Span::styled(
        body.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    let card_widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(side));
    f.render_widget(card_widget, layout.body_area);

    let mut keys = vec![("Space", "Flip")];
    if viewer.can_navigate() {
        keys.push(("←/→", "Card"));
        keys.push(("s", "Shuffle"));
    }
    keys.push(("r", "Restart"));
    keys.push(("Esc", "Back"));
    draw_help(f, layout.help_area, vec![help_line(&keys)]);
}
