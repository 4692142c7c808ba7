use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::{draw_header, draw_help, draw_status, help_line};
use crate::app::App;
use crate::ui::layout::calculate_screen_chunks;

pub fn draw_intake(f: &mut Frame, app: &App) {
    let layout = calculate_screen_chunks(f.area());
    draw_header(f, layout.header_area, "Study Buddy v0.1.0");

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(layout.body_area);

    let picker = app.picker();
    let items: Vec<ListItem> = if picker.files().is_empty() {
        vec![
            ListItem::new(format!("No files in {}", picker.dir().display())).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]
    } else {
        picker
            .files()
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                let style = if i == picker.selected() {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(name).style(style)
            })
            .collect()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("Upload a PDF (max 10MB)"),
    );
    f.render_widget(list, body[0]);

    let context = app.navigator().context();
    let mut side = vec![match &context.document {
        Some(doc) => Line::from(format!(
            "Document: {} ({:.1} MB)",
            doc.name(),
            doc.size_bytes() as f64 / (1024.0 * 1024.0)
        )),
        None => Line::from("Document: none"),
    }];
    side.push(Line::from(""));
    if context.quiz.is_some() {
        side.push(Line::from("Quiz ready"));
    }
    if context.deck.is_some() {
        side.push(Line::from("Flashcards ready"));
    }
    side.push(Line::from(""));
    side.push(Line::from(app.ai_status().to_string()));

    let info = Paragraph::new(side)
        .style(Style::default().fg(if app.ai_enabled() {
            Color::Green
        } else {
            Color::Yellow
        }))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Study Material"));
    f.render_widget(info, body[1]);

    draw_status(f, layout.status_area, app.status(), Color::Yellow);
    draw_help(
        f,
        layout.help_area,
        vec![help_line(&[
            ("↑/↓", "Select"),
            ("Enter", "Upload"),
            ("q", "Quiz"),
            ("f", "Flashcards"),
            ("r", "Rescan"),
            ("Esc/Ctrl+C", "Quit"),
        ])],
    );
}
