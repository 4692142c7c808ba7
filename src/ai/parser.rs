//! Turns collaborator output into artifact values.
//!
//! The collaborator text is untrusted: everything returned from here still
//! has to pass `Quiz::validate` / `FlashcardDeck::validate`.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::ArtifactError;
use crate::models::{AnswerKey, Flashcard, FlashcardDeck, Question, QuestionKind, Quiz, QuizOption};

pub const DEFAULT_QUIZ_TITLE: &str = "Generated Quiz";

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?is)^```[a-z]*\s*|\s*```$").unwrap();
    static ref LIST_MARKER: Regex = Regex::new(r"^(?:[-*#>]+|\d+[.)])\s*").unwrap();
}

fn strip_fences(response: &str) -> String {
    CODE_FENCE.replace_all(response.trim(), "").trim().to_string()
}

fn slice_between(text: &str, start: usize, closer: char) -> Option<&str> {
    let end = text.rfind(closer)?;
    (end > start).then(|| &text[start..=end])
}

/// Strips fences and surrounding prose, keeping the outermost object or
/// array, whichever opens first.
pub fn clean_json_response(response: &str) -> String {
    let cleaned = strip_fences(response);
    let Some(start) = cleaned.find(['{', '[']) else {
        return cleaned;
    };
    let closer = if cleaned[start..].starts_with('{') {
        '}'
    } else {
        ']'
    };
    slice_between(&cleaned, start, closer)
        .unwrap_or(&cleaned)
        .trim()
        .to_string()
}

/// Like `clean_json_response` but always keeps the outermost object, so
/// brackets in leading prose are skipped.
pub fn clean_json_object(response: &str) -> String {
    let cleaned = strip_fences(response);
    cleaned
        .find('{')
        .and_then(|start| slice_between(&cleaned, start, '}'))
        .unwrap_or(&cleaned)
        .trim()
        .to_string()
}

#[derive(Debug, Deserialize)]
struct RawQuiz {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type", alias = "kind")]
    kind: String,
    #[serde(alias = "prompt", alias = "text")]
    question: String,
    #[serde(default)]
    options: Vec<RawOption>,
    #[serde(alias = "correct_answers", alias = "correctAnswer")]
    correct_answer: RawCorrect,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOption {
    Labeled {
        id: String,
        #[serde(alias = "label")]
        text: String,
    },
    Plain(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCorrect {
    One(String),
    Many(Vec<String>),
}

impl RawCorrect {
    /// A bare string, or a one-element list as the backend format sends for
    /// single answers.
    fn into_single(self) -> Option<String> {
        match self {
            RawCorrect::One(answer) => Some(answer),
            RawCorrect::Many(mut answers) if answers.len() == 1 => answers.pop(),
            RawCorrect::Many(_) => None,
        }
    }
}

fn option_id(position: usize) -> String {
    let letter = (b'a' + (position % 26) as u8) as char;
    if position < 26 {
        letter.to_string()
    } else {
        format!("{}{}", letter, position / 26)
    }
}

fn boolean_defaults() -> Vec<QuizOption> {
    vec![
        QuizOption {
            id: "true".to_string(),
            label: "Yes".to_string(),
        },
        QuizOption {
            id: "false".to_string(),
            label: "No".to_string(),
        },
    ]
}

/// Maps an answer reference to an option id, matching ids before labels.
fn resolve_reference(options: &[QuizOption], reference: &str) -> String {
    let reference = reference.trim();
    options
        .iter()
        .find(|o| o.id == reference)
        .or_else(|| options.iter().find(|o| o.label.trim() == reference))
        .map(|o| o.id.clone())
        .unwrap_or_else(|| reference.to_string())
}

fn convert_question(raw: RawQuestion, position: usize) -> Result<Question, ArtifactError> {
    let id = raw
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("q{}", position + 1));

    let kind = QuestionKind::from_wire(&raw.kind).ok_or_else(|| ArtifactError::UnknownKind {
        question: id.clone(),
        kind: raw.kind.clone(),
    })?;

    let mut options: Vec<QuizOption> = raw
        .options
        .into_iter()
        .enumerate()
        .map(|(i, option)| match option {
            RawOption::Labeled { id, text } => QuizOption { id, label: text },
            RawOption::Plain(text) => QuizOption {
                id: option_id(i),
                label: text,
            },
        })
        .collect();
    if options.is_empty() && kind == QuestionKind::Boolean {
        options = boolean_defaults();
    }

    let shape_error = || ArtifactError::AnswerShape {
        question: id.clone(),
        kind,
    };
    let key = match (kind, raw.correct_answer) {
        (QuestionKind::MultipleChoice, RawCorrect::Many(answers)) => AnswerKey::MultipleChoice {
            correct: answers
                .iter()
                .map(|a| resolve_reference(&options, a))
                .collect::<BTreeSet<_>>(),
        },
        (QuestionKind::MultipleChoice, RawCorrect::One(_)) => return Err(shape_error()),
        (kind, answer) => {
            let correct = answer
                .into_single()
                .map(|a| resolve_reference(&options, &a))
                .ok_or_else(shape_error)?;
            if kind == QuestionKind::Boolean {
                AnswerKey::Boolean { correct }
            } else {
                AnswerKey::SingleChoice { correct }
            }
        }
    };

    Ok(Question {
        id,
        prompt: raw.question.trim().to_string(),
        options,
        key,
    })
}

/// Parses the quiz JSON contract. Structure is not validated here.
pub fn parse_quiz(response: &str) -> Result<Quiz, ArtifactError> {
    let cleaned = clean_json_object(response);
    log::debug!("cleaned quiz response: {}", cleaned);
    let raw: RawQuiz = serde_json::from_str(&cleaned)
        .map_err(|e| ArtifactError::Malformed(format!("{} (cleaned: {})", e, cleaned)))?;

    let questions = raw
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| convert_question(q, i))
        .collect::<Result<Vec<_>, _>>()?;

    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_QUIZ_TITLE.to_string());

    Ok(Quiz { title, questions })
}

#[derive(Debug, Deserialize)]
struct RawCard {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "question")]
    term: String,
    #[serde(alias = "answer")]
    definition: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDeck {
    Cards(Vec<RawCard>),
    Wrapped { flashcards: Vec<RawCard> },
}

fn card_id(position: usize) -> String {
    format!("card-{}", position + 1)
}

/// Parses "Term: ..." / "Definition: ..." line pairs.
fn parse_term_definition_pairs(text: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    let mut pending_term: Option<String> = None;

    for line in text.lines() {
        let line = LIST_MARKER.replace(line.trim(), "");
        let line = line.replace("**", "");
        let line = line.trim();
        let lower = line.to_ascii_lowercase();

        if lower.starts_with("term:") {
            pending_term = Some(line["term:".len()..].trim().to_string());
        } else if lower.starts_with("definition:")
            && let Some(term) = pending_term.take()
        {
            cards.push(Flashcard {
                id: card_id(cards.len()),
                term,
                definition: line["definition:".len()..].trim().to_string(),
            });
        }
    }

    cards
}

/// Parses the flashcard JSON contract, falling back to the line-pair format.
pub fn parse_flashcards(response: &str) -> Result<FlashcardDeck, ArtifactError> {
    let cleaned = clean_json_response(response);
    log::debug!("cleaned flashcard response: {}", cleaned);

    let mut json_error = None;
    if cleaned.starts_with('[') || cleaned.starts_with('{') {
        match serde_json::from_str::<RawDeck>(&cleaned) {
            Ok(raw) => return Ok(deck_from_raw(raw)),
            Err(e) => json_error = Some(e.to_string()),
        }
        // A bracket in leading prose can hide a wrapped deck.
        let object = clean_json_object(response);
        if object != cleaned
            && let Ok(raw) = serde_json::from_str::<RawDeck>(&object)
        {
            return Ok(deck_from_raw(raw));
        }
    }

    let cards = parse_term_definition_pairs(response);
    if cards.is_empty() {
        let reason = json_error.unwrap_or_else(|| "no flashcards found".to_string());
        return Err(ArtifactError::Malformed(format!(
            "{} (cleaned: {})",
            reason, cleaned
        )));
    }
    Ok(FlashcardDeck::new(cards))
}

fn deck_from_raw(raw: RawDeck) -> FlashcardDeck {
    let cards = match raw {
        RawDeck::Cards(cards) | RawDeck::Wrapped { flashcards: cards } => cards,
    };
    FlashcardDeck::new(
        cards
            .into_iter()
            .enumerate()
            .map(|(i, card)| Flashcard {
                id: card
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| card_id(i)),
                term: card.term.trim().to_string(),
                definition: card.definition.trim().to_string(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_json_response_simple() {
        let json = r#"{"questions":[]}"#;
        assert_eq!(clean_json_response(json), r#"{"questions":[]}"#);
    }

    #[test]
    fn test_clean_json_response_markdown() {
        let json = "```json\n[{\"term\": \"a\", \"definition\": \"b\"}]\n```";
        assert_eq!(
            clean_json_response(json),
            r#"[{"term": "a", "definition": "b"}]"#
        );
    }

    #[test]
    fn test_clean_json_response_with_text() {
        let json = r#"Here's your quiz: {"title": "T", "questions": []} enjoy"#;
        assert_eq!(
            clean_json_response(json),
            r#"{"title": "T", "questions": []}"#
        );
    }

    #[test]
    fn test_parse_quiz_contract() {
        let json = r#"{
            "title": "Fluids",
            "questions": [
                {"id": "q1", "type": "single_choice", "question": "Which principle?",
                 "options": [{"id": "a", "text": "Archimedes"}, {"id": "b", "text": "Bernoulli"}],
                 "correct_answer": "b"},
                {"id": "q2", "type": "multiple_choice", "question": "Which flows?",
                 "options": [{"id": "a", "text": "Laminar"}, {"id": "b", "text": "Turbulent"}, {"id": "c", "text": "Static"}],
                 "correct_answer": ["a", "b"]},
                {"id": "q3", "type": "yes_no", "question": "Is viscosity resistance?",
                 "options": [{"id": "true", "text": "Yes"}, {"id": "false", "text": "No"}],
                 "correct_answer": "true"}
            ]
        }"#;

        let quiz = parse_quiz(json).unwrap();
        assert_eq!(quiz.title, "Fluids");
        assert_eq!(quiz.len(), 3);
        assert_eq!(quiz.questions[1].kind(), QuestionKind::MultipleChoice);
        assert_eq!(quiz.questions[2].kind(), QuestionKind::Boolean);
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn test_parse_quiz_backend_format() {
        let json = r#"{"questions": [
            {"type": "single_correct", "question": "Mitochondria?",
             "options": ["Protein synthesis", "Energy production", "Waste removal", "Storage"],
             "correct_answer": "Energy production"},
            {"type": "yes_no", "question": "Is the sun a star?", "correct_answer": "true"}
        ]}"#;

        let quiz = parse_quiz(json).unwrap();
        assert_eq!(quiz.title, DEFAULT_QUIZ_TITLE);
        assert_eq!(quiz.questions[0].id, "q1");
        assert_eq!(
            quiz.questions[0].key,
            AnswerKey::SingleChoice {
                correct: "b".to_string()
            }
        );
        assert_eq!(quiz.questions[1].options.len(), 2);
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn test_parse_quiz_backend_list_answers() {
        let json = r#"{"questions": [
            {"type": "single_correct", "question": "What is the main function of mitochondria?",
             "options": ["Protein synthesis", "Energy production", "Waste removal", "Storage"],
             "correct_answers": ["Energy production"]},
            {"type": "multiple_correct", "question": "Which are planets?",
             "options": ["Mercurio", "Sol", "Tierra", "Luna"],
             "correct_answers": ["Mercurio", "Tierra"]},
            {"type": "yes_no", "question": "Is the sun a star?",
             "options": ["Yes", "No"], "correct_answers": ["Yes"]}
        ]}"#;

        let quiz = parse_quiz(json).unwrap();
        assert_eq!(
            quiz.questions[0].key,
            AnswerKey::SingleChoice {
                correct: "b".to_string()
            }
        );
        assert_eq!(
            quiz.questions[1].key,
            AnswerKey::MultipleChoice {
                correct: ["a", "c"].iter().map(|s| s.to_string()).collect()
            }
        );
        assert_eq!(
            quiz.questions[2].key,
            AnswerKey::Boolean {
                correct: "a".to_string()
            }
        );
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn test_parse_quiz_skips_brackets_in_preamble() {
        let response = r#"Here is your quiz [JSON]: {"title": "Cells", "questions": [
            {"id": "q1", "type": "yes_no", "question": "Do cells divide?",
             "options": ["Yes", "No"], "correct_answer": "Yes"}
        ]} Good luck!"#;

        assert!(clean_json_object(response).starts_with(r#"{"title": "Cells""#));
        let quiz = parse_quiz(response).unwrap();
        assert_eq!(quiz.title, "Cells");
        assert_eq!(quiz.len(), 1);
    }

    #[test]
    fn test_parse_flashcards_wrapped_after_bracketed_preamble() {
        let response =
            r#"Cards [2]: {"flashcards": [{"term": "Danton", "definition": "Orator"}]}"#;
        let deck = parse_flashcards(response).unwrap();
        assert_eq!(deck.cards[0].term, "Danton");
    }

    #[test]
    fn test_parse_quiz_rejects_wrong_answer_shape() {
        let json = r#"{"questions": [
            {"id": "q1", "type": "single_choice", "question": "Pick",
             "options": ["x", "y"], "correct_answer": ["a", "b"]}
        ]}"#;
        assert_eq!(
            parse_quiz(json),
            Err(ArtifactError::AnswerShape {
                question: "q1".to_string(),
                kind: QuestionKind::SingleChoice
            })
        );
    }

    #[test]
    fn test_parse_quiz_rejects_unknown_kind_and_garbage() {
        let json = r#"{"questions": [{"type": "essay", "question": "Why?", "correct_answer": "x"}]}"#;
        assert!(matches!(
            parse_quiz(json),
            Err(ArtifactError::UnknownKind { .. })
        ));
        assert!(matches!(
            parse_quiz("I cannot help with that."),
            Err(ArtifactError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_flashcards_json_variants() {
        let deck = parse_flashcards(
            r#"[{"term": "Bastille", "definition": "Fortress stormed in 1789"}]"#,
        )
        .unwrap();
        assert_eq!(deck.cards[0].id, "card-1");
        assert_eq!(deck.cards[0].term, "Bastille");

        let wrapped = parse_flashcards(
            r#"{"flashcards": [{"question": "Who?", "answer": "Robespierre"}]}"#,
        )
        .unwrap();
        assert_eq!(wrapped.cards[0].definition, "Robespierre");

        assert!(parse_flashcards("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_flashcards_line_pairs() {
        let text = "Here are your flashcards:\n\n1. **Term:** Reign of Terror\n   **Definition:** Period of mass executions\n\nTerm: Danton\nDefinition: Revolutionary leader\nTerm: orphan";
        let deck = parse_flashcards(text).unwrap();
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.cards[0].term, "Reign of Terror");
        assert_eq!(deck.cards[0].definition, "Period of mass executions");
        assert_eq!(deck.cards[1].id, "card-2");
    }

    #[test]
    fn test_parse_flashcards_without_cards_is_malformed() {
        assert!(matches!(
            parse_flashcards("Sorry, nothing to see here."),
            Err(ArtifactError::Malformed(_))
        ));
        assert!(matches!(
            parse_flashcards(r#"[{"term": "only a term"}]"#),
            Err(ArtifactError::Malformed(_))
        ));
    }
}
