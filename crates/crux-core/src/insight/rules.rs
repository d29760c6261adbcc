//! Extraction rules, one pure function per insight category.
//!
//! Goals and challenged assumptions are read per sentence; decisions, next
//! steps and risks keep whole turns. Marker checks are case-insensitive
//! substring tests; captured phrases keep the speaker's casing.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};

use crate::session::{ConversationTurn, Speaker};

pub const MAX_ASSUMPTIONS: usize = 5;
pub const MAX_DECISIONS: usize = 3;
pub const MAX_NEXT_STEPS: usize = 3;
pub const MAX_RISKS: usize = 3;

static GOAL_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:want to|plan to|goal is(?: to)?)\s+(.+)").expect("valid regex")
});

static GOAL_VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b((?:build|create|launch|improve|increase|reduce|optimize)\b.*)")
        .expect("valid regex")
});

static METRIC_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\d[\d,]*(?:\.\d+)?[kKmMbB]?|\d+(?:\.\d+)?%|\b\d[\d,]*(?:\.\d+)?\b")
        .expect("valid regex")
});

static KPI_TERM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(revenue|conversion|retention|growth|users|customers)\b")
        .expect("valid regex")
});

static TIMELINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(this week|next week|this month|in \d+ days?|by (?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)|\d+ weeks?)\b",
    )
    .expect("valid regex")
});

const ASSUMPTION_MARKERS: [&str; 3] = ["why", "how do you know", "what if"];
const DECISION_MARKERS: [&str; 5] = ["decide", "choose", "commit", "we will", "i will"];
const NEXT_STEP_MARKERS: [&str; 3] = ["next", "will do", "going to"];
const RISK_MARKERS: [&str; 4] = ["what if", "risk", "what breaks", "what happens when"];

/// Splits text into trimmed sentences. Terminal punctuation is kept; a period
/// inside a number ("2.5") does not end a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            push_sentence(&mut sentences, &mut current);
            continue;
        }
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_none_or(|next| next.is_whitespace()) {
            push_sentence(&mut sentences, &mut current);
        }
    }
    push_sentence(&mut sentences, &mut current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}

fn contains_any(sentence: &str, markers: &[&str]) -> bool {
    let lowered = sentence.to_lowercase();
    markers.iter().any(|marker| lowered.contains(marker))
}

fn sentences_of<'a>(
    history: &'a [ConversationTurn],
    speaker: Option<Speaker>,
) -> impl Iterator<Item = String> + 'a {
    history
        .iter()
        .filter(move |turn| speaker.is_none_or(|s| turn.speaker == s))
        .flat_map(|turn| split_sentences(&turn.content))
}

fn turns_matching<'a>(
    history: &'a [ConversationTurn],
    speaker: Option<Speaker>,
    markers: &'a [&'a str],
) -> impl Iterator<Item = String> + 'a {
    history
        .iter()
        .filter(move |turn| speaker.is_none_or(|s| turn.speaker == s))
        .filter(move |turn| contains_any(&turn.content, markers))
        .map(|turn| turn.content.trim().to_string())
}

fn last_n(mut items: Vec<String>, n: usize) -> Vec<String> {
    let skip = items.len().saturating_sub(n);
    items.drain(..skip);
    items
}

fn clean_phrase(phrase: &str) -> String {
    phrase
        .trim()
        .trim_end_matches(['.', '!', '?', ',', ';', ':'])
        .trim()
        .to_string()
}

/// Goal phrase for one sentence: the text after an intent marker, or the text
/// starting at the first action verb.
pub fn goal_phrase(sentence: &str) -> Option<String> {
    let captured = GOAL_MARKER
        .captures(sentence)
        .or_else(|| GOAL_VERB.captures(sentence))?;
    let phrase = clean_phrase(captured.get(1)?.as_str());
    (!phrase.is_empty()).then_some(phrase)
}

/// Goal phrases from every turn.
pub fn extract_goals(history: &[ConversationTurn]) -> BTreeSet<String> {
    sentences_of(history, None)
        .filter_map(|sentence| goal_phrase(&sentence))
        .collect()
}

/// The goal stated most often; ties go to the one stated first.
pub fn lead_goal(history: &[ConversationTurn]) -> Option<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, phrase) in sentences_of(history, None)
        .filter_map(|sentence| goal_phrase(&sentence))
        .enumerate()
    {
        counts.entry(phrase).or_insert((0, position)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (a_count, a_first)), (_, (b_count, b_first))| {
            a_count.cmp(b_count).then(b_first.cmp(a_first))
        })
        .map(|(phrase, _)| phrase)
}

/// Challenger questions that probe an assumption, first five in order.
pub fn extract_challenged_assumptions(history: &[ConversationTurn]) -> Vec<String> {
    sentences_of(history, Some(Speaker::Challenger))
        .filter(|sentence| sentence.contains('?') && contains_any(sentence, &ASSUMPTION_MARKERS))
        .take(MAX_ASSUMPTIONS)
        .collect()
}

/// Turns carrying a commitment from either speaker, most recent three in
/// history order.
pub fn extract_key_decisions(history: &[ConversationTurn]) -> Vec<String> {
    last_n(turns_matching(history, None, &DECISION_MARKERS).collect(), MAX_DECISIONS)
}

/// Turns with a forward-looking action, most recent three.
pub fn extract_next_steps(history: &[ConversationTurn]) -> Vec<String> {
    last_n(turns_matching(history, None, &NEXT_STEP_MARKERS).collect(), MAX_NEXT_STEPS)
}

/// Challenger turns raising a risk, first three in order.
pub fn extract_risk_factors(history: &[ConversationTurn]) -> Vec<String> {
    turns_matching(history, Some(Speaker::Challenger), &RISK_MARKERS)
        .take(MAX_RISKS)
        .collect()
}

/// Numeric tokens and KPI vocabulary from every turn.
pub fn extract_metrics(history: &[ConversationTurn]) -> BTreeSet<String> {
    let mut metrics = BTreeSet::new();
    for turn in history {
        for token in METRIC_TOKEN.find_iter(&turn.content) {
            metrics.insert(token.as_str().to_string());
        }
        for term in KPI_TERM.find_iter(&turn.content) {
            metrics.insert(term.as_str().to_lowercase());
        }
    }
    metrics
}

/// Time expressions from every turn, lowercased.
pub fn extract_timeline(history: &[ConversationTurn]) -> BTreeSet<String> {
    history
        .iter()
        .flat_map(|turn| TIMELINE.find_iter(&turn.content))
        .map(|mention| mention.as_str().to_lowercase())
        .collect()
}
