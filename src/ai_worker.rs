use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::ai::client::GenerationClient;
use crate::error::{ClientError, StudyError};
use crate::generation::{GenerationTicket, QuizOptions, generate_flashcards, generate_quiz};
use crate::intake::TextExtractor;
use crate::models::{FlashcardDeck, Quiz, SourceDocument};

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    Quiz {
        ticket: GenerationTicket,
        document: SourceDocument,
        options: QuizOptions,
    },
    Flashcards {
        ticket: GenerationTicket,
        document: SourceDocument,
    },
}

impl GenerationRequest {
    pub fn ticket(&self) -> GenerationTicket {
        match self {
            GenerationRequest::Quiz { ticket, .. } | GenerationRequest::Flashcards { ticket, .. } => {
                *ticket
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum GenerationResponse {
    Quiz {
        ticket: GenerationTicket,
        result: Result<Quiz, StudyError>,
    },
    Flashcards {
        ticket: GenerationTicket,
        result: Result<FlashcardDeck, StudyError>,
    },
}

impl GenerationResponse {
    pub fn ticket(&self) -> GenerationTicket {
        match self {
            GenerationResponse::Quiz { ticket, .. }
            | GenerationResponse::Flashcards { ticket, .. } => *ticket,
        }
    }

    /// The failure response for a request that never reached the worker.
    pub fn failed(request: &GenerationRequest, error: StudyError) -> Self {
        match request {
            GenerationRequest::Quiz { ticket, .. } => GenerationResponse::Quiz {
                ticket: *ticket,
                result: Err(error),
            },
            GenerationRequest::Flashcards { ticket, .. } => GenerationResponse::Flashcards {
                ticket: *ticket,
                result: Err(error),
            },
        }
    }
}

/// Everything the worker needs to serve requests.
#[derive(Clone)]
pub struct WorkerContext {
    pub client: Arc<dyn GenerationClient>,
    pub extractor: Arc<dyn TextExtractor>,
    pub timeout: Duration,
}

async fn with_timeout<T>(
    timeout: Duration,
    fut: impl Future<Output = Result<T, StudyError>>,
) -> Result<T, StudyError> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::Timeout(timeout.as_secs()).into()),
    }
}

/// Runs one request to completion.
pub async fn serve(context: &WorkerContext, request: GenerationRequest) -> GenerationResponse {
    let client = context.client.as_ref();
    let extractor = context.extractor.as_ref();
    match request {
        GenerationRequest::Quiz {
            ticket,
            document,
            options,
        } => {
            let result = with_timeout(
                context.timeout,
                generate_quiz(client, extractor, &document, &options),
            )
            .await;
            GenerationResponse::Quiz { ticket, result }
        }
        GenerationRequest::Flashcards { ticket, document } => {
            let result = with_timeout(
                context.timeout,
                generate_flashcards(client, extractor, &document),
            )
            .await;
            GenerationResponse::Flashcards { ticket, result }
        }
    }
}

pub fn spawn_generation_worker(
    context: WorkerContext,
    responses: Sender<GenerationResponse>,
    requests: Receiver<GenerationRequest>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("study-buddy::generation_worker".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    log::error!("worker could not start its runtime: {}", e);
                    fail_all(&responses, &requests, &e.to_string());
                    return;
                }
            };

            while let Ok(request) = requests.recv() {
                log::info!("worker received generation request {}", request.ticket());
                let response = runtime.block_on(serve(&context, request));
                if let Err(e) = responses.send(response) {
                    log::warn!("worker response channel closed: {}", e);
                    break;
                }
            }
            log::info!("worker channel disconnected, exiting");
        })
}

fn fail_all(
    responses: &Sender<GenerationResponse>,
    requests: &Receiver<GenerationRequest>,
    reason: &str,
) {
    while let Ok(request) = requests.recv() {
        let error = StudyError::GenerationTransportFailure(reason.to_string());
        if responses
            .send(GenerationResponse::failed(&request, error))
            .is_err()
        {
            break;
        }
    }
}
