pub mod client;
pub mod gemini;
pub mod parser;
pub mod prompt;

// Public API exports
pub use client::{DEFAULT_MODEL, GenerationClient, ModelConfig, OpenRouterClient, PromptRequest};
pub use gemini::GeminiClient;
pub use parser::{clean_json_object, clean_json_response, parse_flashcards, parse_quiz};
