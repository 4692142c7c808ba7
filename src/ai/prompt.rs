use crate::ai::client::PromptRequest;
use crate::generation::QuizOptions;
use crate::models::QuestionKind;

pub const FLASHCARD_TARGET_MIN: usize = 10;
pub const FLASHCARD_TARGET_MAX: usize = 15;

const QUIZ_SYSTEM: &str =
    "You are an expert educational content creator. You write quizzes strictly from the provided content.";
const FLASHCARD_SYSTEM: &str =
    "You are a flashcard generator. You write concise term and definition pairs from the provided content.";

fn kind_rules(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::SingleChoice => {
            "Each question has exactly 4 options and exactly 1 correct option. \"correct_answer\" is a single option id string."
        }
        QuestionKind::MultipleChoice => {
            "Each question has exactly 4 options and 2 or more correct options, and its text ends with \"(select all that apply)\". \"correct_answer\" is an array of option id strings."
        }
        QuestionKind::Boolean => {
            "Each question has exactly 2 options, {\"id\": \"true\", \"text\": \"Yes\"} and {\"id\": \"false\", \"text\": \"No\"}. \"correct_answer\" is the single option id string \"true\" or \"false\"."
        }
    }
}

pub fn quiz_prompt(options: &QuizOptions, document_text: &str) -> PromptRequest {
    let count = options.question_count.get();
    let kind = options.kind;
    let instruction = format!(
        r#"Generate a quiz with exactly {count} {label} questions based on the content from the uploaded document.

{rules}

Respond ONLY with this exact JSON structure (no markdown, no extra text):
{{
    "title": "short quiz title",
    "questions": [
        {{
            "id": "q1",
            "type": "{wire}",
            "question": "question text",
            "options": [{{"id": "a", "text": "option text"}}],
            "correct_answer": {answer_example}
        }}
    ]
}}

- Question ids are unique. Option ids are unique within a question.
- Every id in "correct_answer" must be one of that question's option ids.
- Questions test understanding of the document content, not general knowledge.
- If the content is insufficient, return {{"title": "", "questions": []}}."#,
        count = count,
        label = kind.label(),
        rules = kind_rules(kind),
        wire = kind.wire_name(),
        answer_example = match kind {
            QuestionKind::MultipleChoice => r#"["a", "b"]"#,
            QuestionKind::Boolean => r#""true""#,
            QuestionKind::SingleChoice => r#""a""#,
        },
    );

    PromptRequest {
        system: QUIZ_SYSTEM.to_string(),
        instruction,
        document_text: document_text.to_string(),
    }
}

pub fn flashcard_prompt(document_text: &str) -> PromptRequest {
    let instruction = format!(
        r#"Generate a list of flashcards (term and definition) based on the content from the uploaded document. Provide {FLASHCARD_TARGET_MIN}-{FLASHCARD_TARGET_MAX} flashcards.

Respond ONLY with a JSON array (no markdown, no extra text):
[
    {{"term": "term", "definition": "concise definition"}}
]

If the content is insufficient, return []."#
    );

    PromptRequest {
        system: FLASHCARD_SYSTEM.to_string(),
        instruction,
        document_text: document_text.to_string(),
    }
}
