//! Prompt composition
//!
//! Pure functions that render a generation request from a job's static
//! attributes plus the shared style guide. No randomness, no I/O; the same
//! inputs always compose the same prompt.

use crate::catalog::{LanguageDef, ObjectDef, PairDef, TemplateDef};
use crate::style::StyleGuide;

/// Prompt for a single flashcard illustration
pub fn compose_illustration(object: &ObjectDef, style: &StyleGuide) -> String {
    let subject = if object.description.trim().is_empty() {
        format!("An illustration of \"{}\".", object.id)
    } else {
        as_sentence(object.description.trim())
    };

    let mut parts = vec![
        subject,
        format!(
            "This artwork belongs to the '{}' category of a children's language-learning app.",
            object.category
        ),
    ];

    push_constraints(&mut parts, style);
    parts.join(" ")
}

/// Prompt for translating one marketing template into one language
pub fn compose_localization(
    template: &TemplateDef,
    language: &LanguageDef,
    style: &StyleGuide,
) -> String {
    let mut parts = vec![
        format!(
            "Translate the following marketing copy into {} ({}).",
            language.name, language.code
        ),
        format!(
            "Respond with a JSON object mapping \"{}\" to the translated text.",
            template.id
        ),
        "Keep the tone playful and natural for native speakers.".to_string(),
    ];

    push_constraints(&mut parts, style);
    parts.push(format!("Copy:\n{}", template.text));
    parts.join(" ")
}

/// Prompt for a showcase image pairing a category with a language pair
pub fn compose_showcase(category: &str, pair: &PairDef, style: &StyleGuide) -> String {
    let mut parts = vec![
        format!(
            "A showcase scene for the '{}' flashcard category of a children's language-learning app.",
            category
        ),
        format!(
            "The scene celebrates learning {} from {}.",
            pair.target, pair.source
        ),
    ];

    push_constraints(&mut parts, style);
    parts.join(" ")
}

fn push_constraints(parts: &mut Vec<String>, style: &StyleGuide) {
    // Appended verbatim, last, so the style block reads as one unit
    let constraints = style.constraints();
    if !constraints.is_empty() {
        parts.push(constraints);
    }
}

fn as_sentence(text: &str) -> String {
    if text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}
