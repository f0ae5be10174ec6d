//! Lexicon Scenarios - one-shot prompts that bypass the persona
//!
//! Dictionary lookups, sentence translation and image explanation each use a
//! fixed template instead of the composed tutor instruction.

use once_cell::sync::Lazy;
use regex::Regex;

const DEFINE_TEMPLATE: &str = "Translate the word '{word}' into {source}. \
Reply with only its direct translations, separated by commas. \
Do not write sentences, explanations, examples or a pronunciation guide.";

const TRANSLATE_TEMPLATE: &str = "Translate the following text into {target}. \
Give only a natural, fluent translation with no explanation, notes or quotation marks.\n\n{text}";

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*•]+|\d+[.)])\s*").expect("valid list marker regex"));

static TERM_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;\n、，]+").expect("valid separator regex"));

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?。]\s+").expect("valid sentence end regex"));

pub fn define_prompt(word: &str, source_language: &str) -> String {
    DEFINE_TEMPLATE
        .replace("{word}", word.trim())
        .replace("{source}", source_language.trim())
}

pub fn translate_prompt(text: &str, target_language: &str) -> String {
    TRANSLATE_TEMPLATE
        .replace("{target}", target_language.trim())
        .replace("{text}", text.trim())
}

pub fn vision_prompt(prompt: &str, source_language: &str) -> String {
    format!("{}. Please explain in {}.", prompt.trim(), source_language.trim())
}

/// Flatten a dictionary answer into "term, term, term"
///
/// Models occasionally answer with a bulleted list or full sentences even
/// when told not to.
pub fn clean_definition(raw: &str) -> String {
    let mut terms: Vec<&str> = Vec::new();
    for piece in TERM_SEPARATOR.split(raw) {
        let piece = LIST_MARKER.find(piece).map_or(piece, |m| &piece[m.end()..]);
        for sentence in SENTENCE_END.split(piece) {
            let term = sentence.trim().trim_end_matches(['.', '!', '?', '。']).trim();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
    }
    terms.join(", ")
}
