use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{draw_header, draw_help, help_line};
use crate::session::QuizTaker;
use crate::ui::layout::calculate_screen_chunks;
use crate::utils::truncate_string;

pub fn draw_summary(f: &mut Frame, taker: &QuizTaker) {
    let layout = calculate_screen_chunks(f.area());
    draw_header(
        f,
        layout.header_area,
        &format!("Quiz Summary - {}", taker.quiz().title),
    );

    let score = taker.score();
    let mut text = Text::default();
    text.push_line(Line::from(Span::styled(
        format!(
            "Score: {} / {} ({:.0}%)",
            score.correct,
            score.total,
            score.percentage()
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    text.push_line(Line::from(format!("Answered: {}", score.answered)));
    text.push_line(Line::from(""));

    for (i, question) in taker.quiz().questions.iter().enumerate() {
        let (mark, color) = match taker.is_correct(&question.id) {
            Some(true) => ("[✓]", Color::Green),
            Some(false) => ("[✗]", Color::Red),
            None => ("[ ]", Color::DarkGray),
        };
        text.push_line(Line::from(vec![
            Span::styled(mark, Style::default().fg(color)),
            Span::from(format!(" {}. {}", i + 1, truncate_string(&question.prompt, 60))),
        ]));

        let correct: Vec<&str> = question
            .options
            .iter()
            .filter(|o| question.key.is_correct_option(&o.id))
            .map(|o| o.label.as_str())
            .collect();
        text.push_line(Line::from(format!(
            "   Correct: {}",
            truncate_string(&correct.join(", "), 56)
        )));
    }

    let summary = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(summary, layout.body_area);

    draw_help(
        f,
        layout.help_area,
        vec![help_line(&[("r", "Retake"), ("Esc", "Back"), ("Ctrl+C", "Exit")])],
    );
}
