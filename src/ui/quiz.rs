use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{draw_header, draw_help, empty_hint, help_line};
use crate::models::QuestionKind;
use crate::session::QuizTaker;
use crate::ui::layout::calculate_quiz_chunks;

fn marker(kind: QuestionKind, selected: bool) -> &'static str {
    match (kind, selected) {
        (QuestionKind::MultipleChoice, true) => "[x]",
        (QuestionKind::MultipleChoice, false) => "[ ]",
        (_, true) => "(•)",
        (_, false) => "( )",
    }
}

pub fn draw_quiz(f: &mut Frame, taker: &QuizTaker) {
    let layout = calculate_quiz_chunks(f.area());

    let Some(question) = taker.current() else {
        draw_header(f, layout.header_area, &taker.quiz().title);
        f.render_widget(
            empty_hint("The generated quiz has no questions of this type. Press Esc to try again."),
            layout.question_area,
        );
        draw_help(f, layout.help_area, vec![help_line(&[("Esc", "Back")])]);
        return;
    };

    let progress = format!(
        "Question {} / {} - {}",
        taker.index() + 1,
        taker.len(),
        taker.quiz().title
    );
    draw_header(f, layout.header_area, &progress);

    let prompt = Paragraph::new(question.prompt.clone())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(question.kind().label()),
        );
    f.render_widget(prompt, layout.question_area);

    let answer = taker.answer_for(&question.id);
    let mut text = Text::default();
    for (i, option) in question.options.iter().enumerate() {
        let selected = answer.is_some_and(|a| a.contains(&option.id));
        let style = if i == taker.highlighted() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        text.push_line(Line::from(vec![
            Span::styled(
                format!("{} {}", marker(question.kind(), selected), option.label),
                style,
            ),
        ]));
    }
    let options = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(options, layout.options_area);

    draw_help(
        f,
        layout.help_area,
        vec![
            help_line(&[
                ("↑/↓", "Choose"),
                ("Space", "Select"),
                ("←/→", "Question"),
                ("Backspace", "Clear"),
            ]),
            help_line(&[("s", "Finish"), ("r", "Restart"), ("Esc", "Back")]),
        ],
    );
}
