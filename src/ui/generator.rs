use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{draw_header, draw_help, draw_status, help_line};
use crate::generation::{
    FlashcardGenerator, GenerationController, GenerationStatus, QuestionCount, QuizGenerator,
};
use crate::models::{QuestionKind, SourceDocument};
use crate::ui::layout::calculate_screen_chunks;
use crate::utils::format_elapsed;

fn document_line(document: Option<&SourceDocument>) -> Line<'static> {
    match document {
        Some(doc) => Line::from(format!("Source: {}", doc.name())),
        None => Line::from(Span::styled(
            "Source: none",
            Style::default().fg(Color::DarkGray),
        )),
    }
}

/// Status text and its color for the generator's status box.
fn status_text(controller: &GenerationController, message: Option<&str>) -> (String, Color) {
    match controller.status() {
        GenerationStatus::Idle => (
            message.unwrap_or("Press Enter to generate.").to_string(),
            message.map_or(Color::White, |_| Color::Yellow),
        ),
        GenerationStatus::Generating { started_at, .. } => (
            format!("Generating... {}", format_elapsed(started_at.elapsed())),
            Color::Cyan,
        ),
        GenerationStatus::Error(err) => (err.clone(), Color::Red),
        GenerationStatus::Done => (
            message.unwrap_or("Done. Press l to open it again.").to_string(),
            Color::Green,
        ),
    }
}

/// A left-to-right list of choices with `selected` highlighted.
fn choice_line<T: PartialEq + Copy>(
    choices: &[T],
    selected: T,
    label: impl Fn(T) -> String,
) -> Line<'static> {
    let mut spans = Vec::new();
    for choice in choices {
        let text = format!(" {} ", label(*choice));
        if *choice == selected {
            spans.push(Span::styled(
                text,
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::from(text));
        }
        spans.push(Span::from(" "));
    }
    Line::from(spans)
}

pub fn draw_quiz_generator(
    f: &mut Frame,
    generator: &QuizGenerator,
    document: Option<&SourceDocument>,
    message: Option<&str>,
) {
    let layout = calculate_screen_chunks(f.area());
    draw_header(f, layout.header_area, "Quiz Generator");

    let mut text = Text::default();
    text.push_line(document_line(document));
    text.push_line(Line::from(""));
    text.push_line(Line::from("Number of questions:"));
    text.push_line(choice_line(
        &QuestionCount::ALL,
        generator.options.question_count,
        |c| c.get().to_string(),
    ));
    text.push_line(Line::from(""));
    text.push_line(Line::from("Question type:"));
    text.push_line(choice_line(&QuestionKind::ALL, generator.options.kind, |k| {
        k.label().to_string()
    }));

    let body = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(body, layout.body_area);

    let (status, color) = status_text(&generator.controller, message);
    draw_status(f, layout.status_area, Some(&status), color);

    draw_help(
        f,
        layout.help_area,
        vec![help_line(&[
            ("←/→", "Count"),
            ("Tab", "Type"),
            ("Enter", "Generate"),
            ("l", "Last quiz"),
            ("Esc", "Back"),
        ])],
    );
}

pub fn draw_flashcard_generator(
    f: &mut Frame,
    generator: &FlashcardGenerator,
    document: Option<&SourceDocument>,
    message: Option<&str>,
) {
    let layout = calculate_screen_chunks(f.area());
    draw_header(f, layout.header_area, "Flashcard Generator");

    let text = vec![
        document_line(document),
        Line::from(""),
        Line::from("Builds a deck of 10-15 key terms and their definitions."),
    ];
    let body = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Flashcards"));
    f.render_widget(body, layout.body_area);

    let (status, color) = status_text(&generator.controller, message);
    draw_status(f, layout.status_area, Some(&status), color);

    draw_help(
        f,
        layout.help_area,
        vec![help_line(&[
            ("Enter", "Generate"),
            ("l", "Last deck"),
            ("Esc", "Back"),
        ])],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationTicket;
    use crate::intake::validate_document;

    #[test]
    fn test_status_text_follows_controller() {
        let mut controller = GenerationController::new();
        assert_eq!(status_text(&controller, None).0, "Press Enter to generate.");

        let doc = validate_document("notes.pdf", 10, "application/pdf").unwrap();
        controller.begin(Some(&doc), GenerationTicket(1)).unwrap();
        assert!(status_text(&controller, None).0.starts_with("Generating... 00:0"));

        let _: Option<()> = controller.complete(
            GenerationTicket(1),
            Err(crate::error::StudyError::MissingDocument),
        );
        let (text, color) = status_text(&controller, None);
        assert_eq!(text, "No file uploaded. Please go back to upload a file.");
        assert_eq!(color, Color::Red);
    }
}
