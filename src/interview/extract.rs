//! Deterministic answer extraction
//!
//! Turns a free-form user answer into the short items a step collects.
//! Deliberately heuristic: bullet lists and short sentences are accepted,
//! prose paragraphs are not. An empty extraction means the answer was
//! insufficient and the step re-prompts.

use super::state::{Step, MAX_ITEMS_PER_BUCKET};
use regex::Regex;
use std::sync::OnceLock;

/// Longest item we accept, in words. Anything longer reads as prose.
const MAX_ITEM_WORDS: usize = 12;

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-•*\d]+[.)]?\s*").expect("static regex"))
}

/// Extract candidate items for a step from the user's answer.
///
/// Splits on lines and sentence-ish separators, strips bullet markers, and
/// keeps non-empty fragments of at most [`MAX_ITEM_WORDS`] words, capped at
/// [`MAX_ITEMS_PER_BUCKET`].
pub fn extract_items(_step: Step, text: &str) -> Vec<String> {
    let mut items = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // A single line may carry several sentence-separated items.
        let fragments: Vec<&str> = if bullet_re().is_match(line) {
            vec![line]
        } else {
            line.split(['.', ';']).collect()
        };
        for fragment in fragments {
            let item = bullet_re().replace(fragment.trim(), "").trim().to_string();
            if item.is_empty() || item.split_whitespace().count() > MAX_ITEM_WORDS {
                continue;
            }
            if !items.contains(&item) {
                items.push(item);
            }
            if items.len() >= MAX_ITEMS_PER_BUCKET {
                return items;
            }
        }
    }
    items
}

/// Whether the extraction satisfies the step's requirements.
///
/// Every step needs at least one parsed item. The responsibilities prompt
/// asks for 2–5, but a single clear answer is accepted rather than
/// re-prompted.
pub fn is_sufficient(_step: Step, items: &[String]) -> bool {
    !items.is_empty()
}
