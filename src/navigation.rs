//! Which screen is active, and the study state that outlives any one screen.

use std::fmt;
use std::sync::Arc;

use crate::ai_worker::{GenerationRequest, GenerationResponse};
use crate::error::StudyError;
use crate::generation::{FlashcardGenerator, GenerationTicket, QuizGenerator, QuizOptions};
use crate::models::{FlashcardDeck, Quiz, SourceDocument};
use crate::session::{FlashcardViewer, QuizTaker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Intake,
    QuizGeneration,
    QuizSession,
    FlashcardGeneration,
    FlashcardSession,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Intake => "Upload",
            View::QuizGeneration => "Quiz Generator",
            View::QuizSession => "Quiz",
            View::FlashcardGeneration => "Flashcard Generator",
            View::FlashcardSession => "Flashcards",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Cross-screen state owned by the navigator.
#[derive(Debug, Clone, Default)]
pub struct StudyContext {
    pub document: Option<SourceDocument>,
    pub quiz: Option<Arc<Quiz>>,
    pub deck: Option<Arc<FlashcardDeck>>,
    pub quiz_options: QuizOptions,
}

/// The active screen together with the controller it owns.
#[derive(Debug, Clone)]
pub enum Screen {
    Intake,
    QuizGeneration(QuizGenerator),
    QuizSession(QuizTaker),
    FlashcardGeneration(FlashcardGenerator),
    FlashcardSession(FlashcardViewer),
}

impl Screen {
    pub fn view(&self) -> View {
        match self {
            Screen::Intake => View::Intake,
            Screen::QuizGeneration(_) => View::QuizGeneration,
            Screen::QuizSession(_) => View::QuizSession,
            Screen::FlashcardGeneration(_) => View::FlashcardGeneration,
            Screen::FlashcardSession(_) => View::FlashcardSession,
        }
    }
}

#[derive(Debug, Clone)]
pub enum NavEvent {
    OpenQuizGenerator,
    OpenFlashcardGenerator,
    QuizGenerated {
        ticket: GenerationTicket,
        result: Result<Quiz, StudyError>,
    },
    FlashcardsGenerated {
        ticket: GenerationTicket,
        result: Result<FlashcardDeck, StudyError>,
    },
    Back,
    BackToIntake,
    ResumeQuizSession,
    ResumeFlashcardSession,
    DocumentAccepted(SourceDocument),
}

impl From<GenerationResponse> for NavEvent {
    fn from(response: GenerationResponse) -> Self {
        match response {
            GenerationResponse::Quiz { ticket, result } => NavEvent::QuizGenerated { ticket, result },
            GenerationResponse::Flashcards { ticket, result } => {
                NavEvent::FlashcardsGenerated { ticket, result }
            }
        }
    }
}

/// Outcome of one dispatch. `from` is always the view active before it.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Moved { from: View, to: View },
    Stayed,
    Redirected { from: View, to: View },
    Rejected(StudyError),
}

#[derive(Debug)]
pub struct Navigator {
    context: StudyContext,
    screen: Screen,
    last_ticket: u64,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            context: StudyContext::default(),
            screen: Screen::Intake,
            last_ticket: 0,
        }
    }

    pub fn view(&self) -> View {
        self.screen.view()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn context(&self) -> &StudyContext {
        &self.context
    }

    pub fn dispatch(&mut self, event: NavEvent) -> Transition {
        let from = self.view();
        let transition = match event {
            NavEvent::OpenQuizGenerator => self.open_generator(View::QuizGeneration),
            NavEvent::OpenFlashcardGenerator => self.open_generator(View::FlashcardGeneration),
            NavEvent::QuizGenerated { ticket, result } => self.quiz_generated(ticket, result),
            NavEvent::FlashcardsGenerated { ticket, result } => {
                self.flashcards_generated(ticket, result)
            }
            NavEvent::Back => match from {
                View::Intake => Transition::Stayed,
                View::QuizGeneration | View::FlashcardGeneration => self.enter(View::Intake),
                View::QuizSession => self.enter(View::QuizGeneration),
                View::FlashcardSession => self.enter(View::FlashcardGeneration),
            },
            NavEvent::BackToIntake => self.enter(View::Intake),
            NavEvent::ResumeQuizSession => self.enter(View::QuizSession),
            NavEvent::ResumeFlashcardSession => self.enter(View::FlashcardSession),
            NavEvent::DocumentAccepted(document) => self.document_accepted(document),
        };

        match &transition {
            Transition::Stayed => {}
            Transition::Rejected(e) => log::info!("navigation from {:?} rejected: {}", from, e),
            other => log::info!("navigation: {:?}", other),
        }
        transition
    }

    /// Starts generation on the active generator screen and returns the
    /// request for the worker.
    pub fn begin_generation(&mut self) -> Result<GenerationRequest, StudyError> {
        let ticket = GenerationTicket(self.last_ticket + 1);
        let document = self.context.document.as_ref();

        let request = match &mut self.screen {
            Screen::QuizGeneration(generator) => {
                generator.controller.begin(document, ticket)?;
                self.context.quiz_options = generator.options;
                GenerationRequest::Quiz {
                    ticket,
                    document: document.cloned().ok_or(StudyError::MissingDocument)?,
                    options: generator.options,
                }
            }
            Screen::FlashcardGeneration(generator) => {
                generator.controller.begin(document, ticket)?;
                GenerationRequest::Flashcards {
                    ticket,
                    document: document.cloned().ok_or(StudyError::MissingDocument)?,
                }
            }
            other => {
                return Err(StudyError::NavigationInvariantViolation { view: other.view() });
            }
        };

        self.last_ticket = ticket.0;
        log::debug!("issued generation ticket {}", ticket);
        Ok(request)
    }

    fn open_generator(&mut self, target: View) -> Transition {
        if self.context.document.is_none() {
            return Transition::Rejected(StudyError::MissingDocument);
        }
        self.enter(target)
    }

    fn quiz_generated(
        &mut self,
        ticket: GenerationTicket,
        result: Result<Quiz, StudyError>,
    ) -> Transition {
        let Screen::QuizGeneration(generator) = &mut self.screen else {
            log::debug!("quiz response {} arrived off its screen, discarded", ticket);
            return Transition::Stayed;
        };
        match generator.controller.complete(ticket, result) {
            Some(quiz) => {
                self.context.quiz = Some(Arc::new(quiz));
                self.enter(View::QuizSession)
            }
            None => Transition::Stayed,
        }
    }

    fn flashcards_generated(
        &mut self,
        ticket: GenerationTicket,
        result: Result<FlashcardDeck, StudyError>,
    ) -> Transition {
        let Screen::FlashcardGeneration(generator) = &mut self.screen else {
            log::debug!("flashcard response {} arrived off its screen, discarded", ticket);
            return Transition::Stayed;
        };
        match generator.controller.complete(ticket, result) {
            Some(deck) => {
                self.context.deck = Some(Arc::new(deck));
                self.enter(View::FlashcardSession)
            }
            None => Transition::Stayed,
        }
    }

    fn document_accepted(&mut self, document: SourceDocument) -> Transition {
        log::info!("document accepted: {}", document.name());
        self.context.document = Some(document);
        self.context.quiz = None;
        self.context.deck = None;

        match self.view() {
            View::Intake => Transition::Stayed,
            View::QuizSession | View::FlashcardSession => self.enter(View::Intake),
            View::QuizGeneration | View::FlashcardGeneration => {
                match &mut self.screen {
                    Screen::QuizGeneration(generator) => {
                        *generator = QuizGenerator::new(generator.options);
                    }
                    Screen::FlashcardGeneration(generator) => {
                        *generator = FlashcardGenerator::default();
                    }
                    _ => {}
                }
                Transition::Stayed
            }
        }
    }

    /// Switches to `target`. A session without its payload redirects to the
    /// generator that produces it.
    fn enter(&mut self, target: View) -> Transition {
        let from = self.view();
        if from == target {
            return Transition::Stayed;
        }

        let screen = match target {
            View::Intake => Screen::Intake,
            View::QuizGeneration => {
                Screen::QuizGeneration(QuizGenerator::new(self.context.quiz_options))
            }
            View::FlashcardGeneration => Screen::FlashcardGeneration(FlashcardGenerator::default()),
            View::QuizSession => match &self.context.quiz {
                Some(quiz) => Screen::QuizSession(QuizTaker::new(Arc::clone(quiz))),
                None => return self.redirect(target, View::QuizGeneration),
            },
            View::FlashcardSession => match &self.context.deck {
                Some(deck) => Screen::FlashcardSession(FlashcardViewer::new(Arc::clone(deck))),
                None => return self.redirect(target, View::FlashcardGeneration),
            },
        };

        if let Screen::QuizGeneration(generator) = &self.screen {
            self.context.quiz_options = generator.options;
        }
        self.screen = screen;
        Transition::Moved { from, to: target }
    }

    fn redirect(&mut self, requested: View, to: View) -> Transition {
        // Generators are only reachable with a document.
        if self.context.document.is_none() {
            return Transition::Rejected(StudyError::MissingDocument);
        }
        let from = self.view();
        let violation = StudyError::NavigationInvariantViolation { view: requested };
        log::warn!("{}; redirecting to {:?}", violation, to);
        if from != to {
            self.enter(to);
        }
        Transition::Redirected { from, to }
    }
}
