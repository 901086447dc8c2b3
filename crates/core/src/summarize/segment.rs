//! Sentence segmentation and word tokenization.
//!
//! Splits raw text into ordered sentences and reduces each sentence to a bag
//! of normalized terms (lowercased, stop words removed). Sentence text is kept
//! verbatim so summaries only ever contain substrings of the input.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;
use stop_words::{LANGUAGE, get};

/// Letters/digits, allowing inner apostrophes and hyphens (`l'homme`, `state-of-the-art`).
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*").expect("word pattern is valid"));

const TERMINATORS: &[char] = &['.', '!', '?', '…'];
const CLOSERS: &[char] = &['"', '\'', ')', ']', '}', '»', '”', '’'];

/// Languages with stop-word lists and abbreviation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    French,
    German,
    Spanish,
    Italian,
    Portuguese,
    Dutch,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnsupportedLanguage(String);

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "fr" | "french" => Ok(Language::French),
            "de" | "german" => Ok(Language::German),
            "es" | "spanish" => Ok(Language::Spanish),
            "it" | "italian" => Ok(Language::Italian),
            "pt" | "portuguese" => Ok(Language::Portuguese),
            "nl" | "dutch" => Ok(Language::Dutch),
            _ => Err(UnsupportedLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::English => "english",
            Language::French => "french",
            Language::German => "german",
            Language::Spanish => "spanish",
            Language::Italian => "italian",
            Language::Portuguese => "portuguese",
            Language::Dutch => "dutch",
        };
        f.write_str(name)
    }
}

impl Language {
    fn stop_words(self) -> FxHashSet<String> {
        let lang = match self {
            Language::English => LANGUAGE::English,
            Language::French => LANGUAGE::French,
            Language::German => LANGUAGE::German,
            Language::Spanish => LANGUAGE::Spanish,
            Language::Italian => LANGUAGE::Italian,
            Language::Portuguese => LANGUAGE::Portuguese,
            Language::Dutch => LANGUAGE::Dutch,
        };
        get(lang).iter().map(|s| s.to_lowercase()).collect()
    }

    /// Lowercased abbreviations (without the trailing period) that do not end a sentence.
    fn abbreviations(self) -> &'static [&'static str] {
        match self {
            Language::English => &[
                "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd", "co",
                "corp", "fig", "approx", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct",
                "nov", "dec",
            ],
            Language::French => &[
                "m", "mm", "mme", "mmes", "mlle", "dr", "pr", "st", "ste", "etc", "cf", "ex", "env", "p", "pp",
                "av", "apr", "j.-c", "janv", "févr", "oct", "nov", "déc",
            ],
            Language::German => &["z.b", "bzw", "usw", "ca", "dr", "hr", "fr", "nr", "vgl", "s", "u.a", "d.h"],
            Language::Spanish => &["sr", "sra", "srta", "dr", "dra", "etc", "p.ej", "ud", "uds", "núm"],
            Language::Italian => &["sig", "sigg", "dott", "prof", "ecc", "es", "pag", "n"],
            Language::Portuguese => &["sr", "sra", "dr", "dra", "etc", "ex", "pág", "n"],
            Language::Dutch => &["dhr", "mevr", "dr", "bijv", "enz", "o.a", "d.w.z", "nr", "blz"],
        }
    }
}

/// A sentence of the input with its ordinal position and bag of terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    /// Zero-based position in the document.
    pub position: usize,
    /// Trimmed, verbatim slice of the input text.
    pub text: String,
    /// Normalized tokens with stop words removed, in order of appearance.
    pub terms: Vec<String>,
}

/// Language-aware sentence splitter and tokenizer.
#[derive(Debug, Clone)]
pub struct Segmenter {
    language: Language,
    stop_words: FxHashSet<String>,
}

impl Segmenter {
    pub fn new(language: Language) -> Self {
        Self { language, stop_words: language.stop_words() }
    }

    /// Segmenter that keeps every token.
    pub fn without_stop_words(language: Language) -> Self {
        Self { language, stop_words: FxHashSet::default() }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }

    /// Split `text` into sentences, dropping fragments without any word.
    pub fn segment(&self, text: &str) -> Vec<Sentence> {
        self.split_sentences(text)
            .into_iter()
            .filter(|s| WORD.is_match(s))
            .enumerate()
            .map(|(position, s)| Sentence { position, text: s.to_string(), terms: self.tokenize(s) })
            .collect()
    }

    /// Lowercased word tokens of `sentence`, without stop words.
    pub fn tokenize(&self, sentence: &str) -> Vec<String> {
        WORD.find_iter(sentence)
            .map(|m| m.as_str().to_lowercase())
            .filter(|w| !self.stop_words.contains(w))
            .collect()
    }

    fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut sentences = Vec::new();
        for paragraph in split_paragraphs(text) {
            let mut start = 0;
            let chars: Vec<(usize, char)> = paragraph.char_indices().collect();
            let mut i = 0;
            while i < chars.len() {
                let (_, c) = chars[i];
                if !TERMINATORS.contains(&c) {
                    i += 1;
                    continue;
                }

                let mut end = i + 1;
                while end < chars.len() && (TERMINATORS.contains(&chars[end].1) || CLOSERS.contains(&chars[end].1)) {
                    end += 1;
                }
                let end_byte = chars.get(end).map(|(b, _)| *b).unwrap_or(paragraph.len());

                if self.is_boundary(paragraph, &chars, i, end) {
                    push_trimmed(&mut sentences, &paragraph[start..end_byte]);
                    start = end_byte;
                }
                i = end;
            }
            push_trimmed(&mut sentences, &paragraph[start..]);
        }
        sentences
    }

    /// Whether the terminator run `chars[at..end]` closes a sentence.
    fn is_boundary(&self, paragraph: &str, chars: &[(usize, char)], at: usize, end: usize) -> bool {
        let mut next = end;
        let mut saw_space = false;
        while next < chars.len() && chars[next].1.is_whitespace() {
            saw_space = true;
            next += 1;
        }
        if next == chars.len() {
            return true;
        }
        if !saw_space || chars[next].1.is_lowercase() {
            return false;
        }

        if chars[at].1 == '.' && end == at + 1 {
            let word_start = chars[..at]
                .iter()
                .rev()
                .find(|(_, c)| c.is_whitespace() || *c == '(' || *c == '"')
                .map_or(0, |&(i, c)| i + c.len_utf8());
            let word = paragraph[word_start..chars[at].0].to_lowercase();
            let mut letters = word.chars().filter(|c| c.is_alphabetic());
            let single_letter = letters.next().is_some() && letters.next().is_none() && word.chars().count() == 1;
            if single_letter || self.language.abbreviations().contains(&word.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Split on blank lines; a paragraph break always ends a sentence.
fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let mut blank_run_start: Option<usize> = None;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            blank_run_start.get_or_insert(offset);
        } else if let Some(blank) = blank_run_start.take() {
            paragraphs.push(&text[start..blank]);
            start = offset;
        }
        offset += line.len();
    }
    paragraphs.push(&text[start..]);
    paragraphs.into_iter()
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, candidate: &'a str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}
