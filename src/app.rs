use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::ai_worker::{GenerationRequest, GenerationResponse};
use crate::error::StudyError;
use crate::intake::{accept_path, list_documents};
use crate::navigation::{NavEvent, Navigator, Screen, Transition, View};
use crate::session::{SessionEvent, handle_flashcard_input, handle_quiz_input};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    Continue,
    Quit,
}

/// File list shown on the upload screen.
#[derive(Debug, Clone)]
pub struct DocumentPicker {
    dir: PathBuf,
    files: Vec<PathBuf>,
    selected: usize,
}

impl DocumentPicker {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut picker = Self {
            dir: dir.into(),
            files: Vec::new(),
            selected: 0,
        };
        picker.rescan();
        picker
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.files.get(self.selected).map(PathBuf::as_path)
    }

    pub fn rescan(&mut self) {
        self.files = list_documents(&self.dir);
        self.selected = self.selected.min(self.files.len().saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        if self.selected < self.files.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

pub struct App {
    navigator: Navigator,
    picker: DocumentPicker,
    requests: Sender<GenerationRequest>,
    ai_enabled: bool,
    ai_status: String,
    status: Option<String>,
}

impl App {
    pub fn new(picker: DocumentPicker, requests: Sender<GenerationRequest>) -> Self {
        Self {
            navigator: Navigator::new(),
            picker,
            requests,
            ai_enabled: false,
            ai_status: "AI: Disabled".to_string(),
            status: None,
        }
    }

    pub fn with_ai_status(mut self, enabled: bool, label: impl Into<String>) -> Self {
        self.ai_enabled = enabled;
        self.ai_status = label.into();
        self
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn picker(&self) -> &DocumentPicker {
        &self.picker
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    pub fn ai_status(&self) -> &str {
        &self.ai_status
    }

    /// Transient message for the active screen.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppControl {
        if key.kind != KeyEventKind::Press {
            return AppControl::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppControl::Quit;
        }
        self.status = None;

        match self.navigator.view() {
            View::Intake => return self.handle_intake_key(key),
            View::QuizGeneration => self.handle_quiz_generator_key(key),
            View::FlashcardGeneration => self.handle_flashcard_generator_key(key),
            View::QuizSession | View::FlashcardSession => self.handle_session_key(key),
        }
        AppControl::Continue
    }

    /// Feeds a worker response into the navigator.
    pub fn apply_response(&mut self, response: GenerationResponse) {
        let transition = self.navigator.dispatch(response.into());
        self.note(transition);
    }

    fn handle_intake_key(&mut self, key: KeyEvent) -> AppControl {
        match key.code {
            KeyCode::Esc => return AppControl::Quit,
            KeyCode::Up => self.picker.select_previous(),
            KeyCode::Down => self.picker.select_next(),
            KeyCode::Char('r') => self.picker.rescan(),
            KeyCode::Enter => self.accept_selected(),
            KeyCode::Char('q') => self.dispatch(NavEvent::OpenQuizGenerator),
            KeyCode::Char('f') => self.dispatch(NavEvent::OpenFlashcardGenerator),
            _ => {}
        }
        AppControl::Continue
    }

    fn handle_quiz_generator_key(&mut self, key: KeyEvent) {
        let generating = match self.navigator.screen_mut() {
            Screen::QuizGeneration(generator) => {
                let generating = generator.controller.is_generating();
                if !generating {
                    let options = &mut generator.options;
                    match key.code {
                        KeyCode::Left => {
                            options.question_count = options.question_count.decrease()
                        }
                        KeyCode::Right => {
                            options.question_count = options.question_count.increase()
                        }
                        KeyCode::Tab => options.kind = options.kind.cycle(),
                        _ => {}
                    }
                }
                generating
            }
            _ => return,
        };

        match key.code {
            KeyCode::Esc => self.dispatch(NavEvent::Back),
            KeyCode::Enter if !generating => self.start_generation(),
            KeyCode::Char('l') if !generating => self.dispatch(NavEvent::ResumeQuizSession),
            _ => {}
        }
    }

    fn handle_flashcard_generator_key(&mut self, key: KeyEvent) {
        let generating = match self.navigator.screen() {
            Screen::FlashcardGeneration(generator) => generator.controller.is_generating(),
            _ => return,
        };

        match key.code {
            KeyCode::Esc => self.dispatch(NavEvent::Back),
            KeyCode::Enter if !generating => self.start_generation(),
            KeyCode::Char('l') if !generating => self.dispatch(NavEvent::ResumeFlashcardSession),
            _ => {}
        }
    }

    fn handle_session_key(&mut self, key: KeyEvent) {
        let event = match self.navigator.screen_mut() {
            Screen::QuizSession(taker) => handle_quiz_input(taker, key),
            Screen::FlashcardSession(viewer) => handle_flashcard_input(viewer, key),
            _ => SessionEvent::None,
        };
        if event == SessionEvent::Back {
            self.dispatch(NavEvent::Back);
        }
    }

    fn accept_selected(&mut self) {
        let Some(path) = self.picker.selected_path() else {
            self.status = Some(format!(
                "No files found in {}. Add a PDF and press r.",
                self.picker.dir().display()
            ));
            return;
        };

        match accept_path(path) {
            Ok(document) => {
                self.status = Some(format!("Uploaded {}", document.name()));
                self.dispatch(NavEvent::DocumentAccepted(document));
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn start_generation(&mut self) {
        let request = match self.navigator.begin_generation() {
            Ok(request) => request,
            // Missing-document errors are shown by the generator itself.
            Err(StudyError::MissingDocument) => return,
            Err(e) => {
                self.status = Some(e.user_message());
                return;
            }
        };

        if let Err(e) = self.requests.send(request) {
            log::error!("generation worker is gone: {}", e);
            let error = StudyError::GenerationTransportFailure("worker stopped".to_string());
            self.apply_response(GenerationResponse::failed(&e.0, error));
        }
    }

    fn dispatch(&mut self, event: NavEvent) {
        let transition = self.navigator.dispatch(event);
        self.note(transition);
    }

    fn note(&mut self, transition: Transition) {
        match transition {
            Transition::Rejected(e) => self.status = Some(e.user_message()),
            Transition::Redirected { to, .. } => {
                self.status =
                    Some(StudyError::NavigationInvariantViolation { view: to }.user_message())
            }
            Transition::Moved { .. } | Transition::Stayed => {}
        }
    }
}
