//! Language-model capability used by the parser: named entities and sentences.
//!
//! The parser receives an `Arc<dyn NlpModel>`; nothing here is process-global.

use std::sync::LazyLock;

use regex::Regex;

pub const LABEL_GPE: &str = "GPE";
pub const LABEL_LOC: &str = "LOC";

/// A named entity span found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

impl Entity {
    pub fn is_place(&self) -> bool {
        self.label == LABEL_GPE || self.label == LABEL_LOC
    }
}

pub trait NlpModel: Send + Sync {
    fn extract_entities(&self, text: &str) -> Vec<Entity>;
    fn split_sentences(&self, text: &str) -> Vec<String>;
}

const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

const PLACES: &[&str] = &[
    "New York",
    "San Francisco",
    "Los Angeles",
    "Seattle",
    "Boston",
    "Chicago",
    "Austin",
    "London",
    "Berlin",
    "Paris",
    "Amsterdam",
    "Dublin",
    "Toronto",
    "Vancouver",
    "Sydney",
    "Singapore",
    "Bangalore",
    "Bengaluru",
    "Mumbai",
    "Hyderabad",
    "Tokyo",
    "United States",
    "United Kingdom",
    "Canada",
    "Germany",
    "France",
    "India",
    "Australia",
    "Ireland",
    "Netherlands",
];

static CITY_STATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-zA-Z]+(?:[ -][A-Z][a-zA-Z]+)*),[ \t]*([A-Z]{2})\b")
        .expect("valid city-state regex")
});

static PLACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = PLACES
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternatives})\b")).expect("valid place gazetteer regex")
});

/// Rule-based model: `City, ST` patterns plus a small place gazetteer.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedNlp;

impl NlpModel for RuleBasedNlp {
    fn extract_entities(&self, text: &str) -> Vec<Entity> {
        let mut spans: Vec<(usize, usize, &'static str)> = Vec::new();

        for caps in CITY_STATE_REGEX.captures_iter(text) {
            let (Some(whole), Some(state)) = (caps.get(0), caps.get(2)) else {
                continue;
            };
            if US_STATES.contains(&state.as_str()) {
                spans.push((whole.start(), whole.end(), LABEL_GPE));
            }
        }

        for m in PLACE_REGEX.find_iter(text) {
            spans.push((m.start(), m.end(), LABEL_GPE));
        }

        // Earliest first; on equal start the longer span wins.
        spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut entities = Vec::new();
        let mut covered_until = 0;
        for (start, end, label) in spans {
            if start < covered_until {
                continue;
            }
            entities.push(Entity {
                text: text[start..end].to_string(),
                label: label.to_string(),
            });
            covered_until = end;
        }
        entities
    }

    fn split_sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            current.push(c);
            let terminal = matches!(c, '.' | '!' | '?');
            let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
            if terminal && at_boundary {
                push_sentence(&mut sentences, &current);
                current.clear();
            }
        }
        push_sentence(&mut sentences, &current);
        sentences
    }
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}
