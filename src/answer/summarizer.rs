//! Extractive question answering over a transcript.
//!
//! Used when no language model is reachable. Sentences of the transcript are
//! scored against the words of the question plus a fixed list of phrases that
//! tend to introduce explanations, and the best few are returned verbatim.

use tracing::debug;

/// Returned when there is no transcript text at all.
pub const NO_CONTENT_REPLY: &str = "No transcript content available.";

/// Prefix for answers built from scored sentences.
pub const MATCH_PREFIX: &str = "Based on the video: ";

/// Prefix for answers built from the opening sentences when nothing scored.
pub const OPENING_PREFIX: &str = "The video content: ";

/// Phrases that usually mark an explanation.
const INDICATOR_PHRASES: &[&str] = &[
    "because",
    "the reason",
    "helps",
    "allows",
    "enables",
    "controls",
    "responsible",
];

const SENTENCE_DELIMITER: &str = ". ";

/// Sentences must be longer than this many characters to be considered.
const MIN_SENTENCE_CHARS: usize = 10;

/// Question words must be longer than this many characters to count.
const MIN_QUESTION_WORD_CHARS: usize = 3;

const QUESTION_WORD_POINTS: u32 = 2;
const INDICATOR_POINTS: u32 = 3;

const MAX_ANSWER_SENTENCES: usize = 3;
const OPENING_SENTENCES: usize = 2;

/// A transcript sentence with its relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredSentence<'a> {
    pub sentence: &'a str,
    pub score: u32,
}

/// Stateless extractive summarizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveSummarizer;

impl ExtractiveSummarizer {
    pub fn new() -> Self {
        Self
    }

    /// Answer `question` from `transcript` without any external call.
    ///
    /// Never fails: odd input degrades to one of the fixed reply shapes.
    pub fn summarize(&self, transcript: &str, question: &str) -> String {
        if transcript.is_empty() {
            return NO_CONTENT_REPLY.to_string();
        }

        let cleaned = clean(transcript);
        let sentences = split_sentences(&cleaned);
        let words = question_words(question);

        let ranked = rank_sentences(&sentences, &words);
        debug!(
            sentences = sentences.len(),
            question_words = words.len(),
            matched = ranked.len(),
            "Scored transcript sentences"
        );

        if ranked.is_empty() {
            let opening = sentences
                .iter()
                .take(OPENING_SENTENCES)
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            return format!("{}{}", OPENING_PREFIX, opening);
        }

        let top = ranked
            .iter()
            .take(MAX_ANSWER_SENTENCES)
            .map(|s| s.sentence)
            .collect::<Vec<_>>()
            .join(" ");
        format!("{}{}", MATCH_PREFIX, top)
    }
}

/// Drop spaced hyphens and collapse every whitespace run to a single space.
pub fn clean(transcript: &str) -> String {
    transcript
        .replace(" - ", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split cleaned text on ". " and keep fragments long enough to be sentences.
pub fn split_sentences(cleaned: &str) -> Vec<&str> {
    cleaned
        .split(SENTENCE_DELIMITER)
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

/// Lowercased question tokens with edge punctuation removed.
///
/// Short tokens are dropped; duplicates are kept, so a word repeated in the
/// question is counted once per occurrence when scoring.
pub fn question_words(question: &str) -> Vec<String> {
    question
        .split_whitespace()
        .map(|token| token.trim_matches(|c| matches!(c, '.' | ',' | '!' | '?')))
        .filter(|token| token.chars().count() > MIN_QUESTION_WORD_CHARS)
        .map(str::to_lowercase)
        .collect()
}

/// Score one sentence against the question words and indicator phrases.
pub fn score_sentence(sentence: &str, question_words: &[String]) -> u32 {
    let lowered = sentence.to_lowercase();

    let word_points = question_words
        .iter()
        .filter(|word| lowered.contains(word.as_str()))
        .count() as u32
        * QUESTION_WORD_POINTS;

    let indicator_points = INDICATOR_PHRASES
        .iter()
        .filter(|phrase| lowered.contains(**phrase))
        .count() as u32
        * INDICATOR_POINTS;

    word_points + indicator_points
}

/// Score every sentence, drop the zero scores, and order by score descending.
///
/// The sort is stable, so equal scores keep transcript order.
pub fn rank_sentences<'a>(sentences: &[&'a str], question_words: &[String]) -> Vec<ScoredSentence<'a>> {
    let mut scored: Vec<ScoredSentence<'a>> = sentences
        .iter()
        .map(|&sentence| ScoredSentence {
            sentence,
            score: score_sentence(sentence, question_words),
        })
        .filter(|s| s.score > 0)
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
