#[cfg(test)]
mod ui_integration_tests {
    use std::fs;
    use std::sync::Arc;
    use std::time::Duration;

    use crossbeam_channel::{Receiver, unbounded};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};
    use tempfile::TempDir;

    use crate::ai::client::MockGenerationClient;
    use crate::ai_worker::{
        GenerationRequest, GenerationResponse, WorkerContext, spawn_generation_worker,
    };
    use crate::app::{App, AppControl, DocumentPicker};
    use crate::generation::QuestionCount;
    use crate::intake::PlaceholderExtractor;
    use crate::models::QuestionKind;
    use crate::models::fixtures::{boolean, deck, quiz};
    use crate::navigation::{Screen, View};
    use crate::ui;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    /// Upload directory holding `bad.txt` and `notes.pdf`, in picker order.
    fn documents() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.txt"), "plain notes").unwrap();
        fs::write(dir.path().join("notes.pdf"), b"%PDF-1.4 revolution").unwrap();
        dir
    }

    fn app(dir: &TempDir) -> (App, Receiver<GenerationRequest>) {
        let (tx, rx) = unbounded();
        (App::new(DocumentPicker::new(dir.path()), tx), rx)
    }

    fn upload_notes(app: &mut App) {
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.status(), Some("Uploaded notes.pdf"));
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| ui::draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_quiz_flow_end_to_end() {
        let dir = documents();
        let (mut app, requests) = app(&dir);
        upload_notes(&mut app);

        app.handle_key(press(KeyCode::Char('q')));
        assert_eq!(app.navigator().view(), View::QuizGeneration);

        app.handle_key(press(KeyCode::Left));
        app.handle_key(press(KeyCode::Tab));
        app.handle_key(press(KeyCode::Tab));
        app.handle_key(press(KeyCode::Enter));

        let request = requests.try_recv().unwrap();
        let ticket = match &request {
            GenerationRequest::Quiz {
                ticket,
                document,
                options,
            } => {
                assert_eq!(document.name(), "notes.pdf");
                assert_eq!(options.question_count, QuestionCount::Five);
                assert_eq!(options.kind, QuestionKind::Boolean);
                *ticket
            }
            other => panic!("unexpected request {:?}", other),
        };
        assert!(render(&app).contains("Generating..."));

        // Enter is ignored while the request is outstanding.
        app.handle_key(press(KeyCode::Enter));
        assert!(requests.try_recv().is_err());

        app.apply_response(GenerationResponse::Quiz {
            ticket,
            result: Ok(quiz(vec![boolean("q1", "true"), boolean("q2", "false")])),
        });
        assert_eq!(app.navigator().view(), View::QuizSession);
        assert!(render(&app).contains("Question 1 / 2"));

        app.handle_key(press(KeyCode::Enter));
        app.handle_key(press(KeyCode::Right));
        app.handle_key(press(KeyCode::Enter));
        app.handle_key(press(KeyCode::Char('s')));

        match app.navigator().screen() {
            Screen::QuizSession(taker) => assert_eq!(taker.score().correct, 1),
            other => panic!("unexpected screen {:?}", other.view()),
        }
        assert!(render(&app).contains("Score: 1 / 2 (50%)"));
    }

    #[test]
    fn test_flashcard_flow_end_to_end() {
        let dir = documents();
        let (mut app, requests) = app(&dir);
        upload_notes(&mut app);

        app.handle_key(press(KeyCode::Char('f')));
        app.handle_key(press(KeyCode::Enter));
        let ticket = requests.try_recv().unwrap().ticket();

        app.apply_response(GenerationResponse::Flashcards {
            ticket,
            result: Ok(deck(3)),
        });
        assert_eq!(app.navigator().view(), View::FlashcardSession);
        let screen = render(&app);
        assert!(screen.contains("Card 1 / 3"));
        assert!(screen.contains("Term 1"));

        app.handle_key(press(KeyCode::Char(' ')));
        assert!(render(&app).contains("Definition 1"));

        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.navigator().view(), View::FlashcardGeneration);
        app.handle_key(press(KeyCode::Char('l')));
        assert_eq!(app.navigator().view(), View::FlashcardSession);
    }

    #[test]
    fn test_empty_deck_renders_hint() {
        let dir = documents();
        let (mut app, requests) = app(&dir);
        upload_notes(&mut app);
        app.handle_key(press(KeyCode::Char('f')));
        app.handle_key(press(KeyCode::Enter));
        let ticket = requests.try_recv().unwrap().ticket();

        app.apply_response(GenerationResponse::Flashcards {
            ticket,
            result: Ok(deck(0)),
        });
        assert_eq!(app.navigator().view(), View::FlashcardSession);
        assert!(render(&app).contains("No flashcards were generated."));
    }

    #[test]
    fn test_upload_rejects_non_pdf() {
        let dir = documents();
        let (mut app, _requests) = app(&dir);

        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.status(), Some("Only PDF files are supported."));
        assert!(app.navigator().context().document.is_none());
        assert!(render(&app).contains("Only PDF files are supported."));
    }

    #[test]
    fn test_generator_requires_upload() {
        let dir = documents();
        let (mut app, _requests) = app(&dir);

        app.handle_key(press(KeyCode::Char('q')));
        assert_eq!(app.navigator().view(), View::Intake);
        assert_eq!(
            app.status(),
            Some("No file uploaded. Please go back to upload a file.")
        );
    }

    #[test]
    fn test_empty_directory_message() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _requests) = app(&dir);
        app.handle_key(press(KeyCode::Enter));
        assert!(app.status().unwrap().starts_with("No files found"));
    }

    #[test]
    fn test_response_after_leaving_is_ignored() {
        let dir = documents();
        let (mut app, requests) = app(&dir);
        upload_notes(&mut app);
        app.handle_key(press(KeyCode::Char('q')));
        app.handle_key(press(KeyCode::Enter));
        let ticket = requests.try_recv().unwrap().ticket();

        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.navigator().view(), View::Intake);

        app.apply_response(GenerationResponse::Quiz {
            ticket,
            result: Ok(quiz(vec![boolean("q1", "true")])),
        });
        assert_eq!(app.navigator().view(), View::Intake);
        assert!(app.navigator().context().quiz.is_none());
    }

    #[test]
    fn test_resume_without_quiz_redirects() {
        let dir = documents();
        let (mut app, _requests) = app(&dir);
        upload_notes(&mut app);
        app.handle_key(press(KeyCode::Char('q')));
        app.handle_key(press(KeyCode::Char('l')));

        assert_eq!(app.navigator().view(), View::QuizGeneration);
        assert_eq!(app.status(), Some("Nothing generated yet. Generate first."));
    }

    #[test]
    fn test_stopped_worker_surfaces_error() {
        let dir = documents();
        let (mut app, requests) = app(&dir);
        drop(requests);
        upload_notes(&mut app);
        app.handle_key(press(KeyCode::Char('f')));
        app.handle_key(press(KeyCode::Enter));

        match app.navigator().screen() {
            Screen::FlashcardGeneration(generator) => {
                let message = generator.controller.error_message().unwrap();
                assert!(message.contains("worker stopped"));
            }
            other => panic!("unexpected screen {:?}", other.view()),
        }
    }

    #[test]
    fn test_quit_keys() {
        let dir = documents();
        let (mut app, _requests) = app(&dir);
        upload_notes(&mut app);
        app.handle_key(press(KeyCode::Char('q')));

        assert_eq!(app.handle_key(press(KeyCode::Esc)), AppControl::Continue);
        assert_eq!(app.navigator().view(), View::Intake);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            AppControl::Quit
        );
        assert_eq!(app.handle_key(press(KeyCode::Esc)), AppControl::Quit);
    }

    #[test]
    fn test_screens_render_without_panicking() {
        let dir = documents();
        let (mut app, _requests) = app(&dir);
        let intake = render(&app);
        assert!(intake.contains("notes.pdf"));
        assert!(intake.contains("AI: Disabled"));

        upload_notes(&mut app);
        app.handle_key(press(KeyCode::Char('q')));
        let generator = render(&app);
        assert!(generator.contains("Quiz Generator"));
        assert!(generator.contains("Single Choice"));

        app.handle_key(press(KeyCode::Esc));
        app.handle_key(press(KeyCode::Char('f')));
        assert!(render(&app).contains("Flashcard Generator"));
    }

    #[test]
    fn test_real_worker_with_mock_client() {
        let dir = documents();
        let (request_tx, request_rx) = unbounded();
        let (response_tx, response_rx) = unbounded();
        let client = MockGenerationClient::replying(
            r#"{"title": "Revolution", "questions": [
                {"id": "q1", "type": "yes_no", "question": "Was the Bastille stormed in 1789?",
                 "options": ["Yes", "No"], "correct_answer": "Yes"},
                {"id": "q2", "type": "single_choice", "question": "Who led the Terror?",
                 "options": ["Robespierre", "Napoleon"], "correct_answer": "a"}
            ]}"#,
        );
        let _worker = spawn_generation_worker(
            WorkerContext {
                client: Arc::new(client),
                extractor: Arc::new(PlaceholderExtractor),
                timeout: Duration::from_secs(5),
            },
            response_tx,
            request_rx,
        )
        .unwrap();

        let mut app = App::new(DocumentPicker::new(dir.path()), request_tx);
        upload_notes(&mut app);
        app.handle_key(press(KeyCode::Char('q')));
        app.handle_key(press(KeyCode::Tab));
        app.handle_key(press(KeyCode::Tab));
        app.handle_key(press(KeyCode::Enter));

        let response = response_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        app.apply_response(response);

        match app.navigator().screen() {
            Screen::QuizSession(taker) => {
                assert_eq!(taker.len(), 1);
                assert_eq!(taker.current().unwrap().id, "q1");
            }
            other => panic!("unexpected screen {:?}", other.view()),
        }
    }
}
