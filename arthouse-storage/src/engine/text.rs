//! Full-text matching over a collection's text index.
//!
//! Search strings follow the usual text-search grammar: bare words are
//! alternatives (any may match), `"quoted phrases"` must all appear, and a
//! leading `-` excludes a word or phrase. Matching is case-insensitive on
//! whole words.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::value::get_path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    terms: Vec<String>,
    phrases: Vec<String>,
    excluded_terms: Vec<String>,
    excluded_phrases: Vec<String>,
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

impl TextQuery {
    pub fn parse(search: &str) -> Self {
        let mut query = Self::default();
        let mut rest = search;

        while let Some(start) = rest.find('"') {
            let negated = rest[..start].ends_with('-');
            let before = if negated {
                &rest[..start - 1]
            } else {
                &rest[..start]
            };
            query.add_words(before);

            let after = &rest[start + 1..];
            let (phrase, remainder) = match after.find('"') {
                Some(end) => (&after[..end], &after[end + 1..]),
                None => (after, ""),
            };
            let phrase = phrase.trim().to_lowercase();
            if !phrase.is_empty() {
                // Phrase words also count as alternatives.
                if negated {
                    query.excluded_phrases.push(phrase);
                } else {
                    query.terms.extend(tokenize(&phrase));
                    query.phrases.push(phrase);
                }
            }
            rest = remainder;
        }
        query.add_words(rest);
        query
    }

    fn add_words(&mut self, segment: &str) {
        for word in segment.split_whitespace() {
            match word.strip_prefix('-') {
                Some(excluded) => self.excluded_terms.extend(tokenize(excluded)),
                None => self.terms.extend(tokenize(word)),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.phrases.is_empty()
    }

    /// Test a document, reading the indexed `fields`.
    pub fn matches(&self, doc: &Map<String, Value>, fields: &[String]) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut text = String::new();
        for field in fields {
            match get_path(doc, field) {
                Some(Value::String(s)) => {
                    text.push_str(s);
                    text.push('\n');
                }
                Some(Value::Array(items)) => {
                    for item in items.iter().filter_map(Value::as_str) {
                        text.push_str(item);
                        text.push('\n');
                    }
                }
                _ => {}
            }
        }
        let lowered = text.to_lowercase();
        let words: HashSet<String> = tokenize(&lowered).collect();

        if self.excluded_terms.iter().any(|t| words.contains(t))
            || self.excluded_phrases.iter().any(|p| lowered.contains(p.as_str()))
        {
            return false;
        }
        if !self.phrases.iter().all(|p| lowered.contains(p.as_str())) {
            return false;
        }
        self.terms.iter().any(|t| words.contains(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> Vec<String> {
        vec!["title".into(), "description".into()]
    }

    fn artwork(title: &str, description: &str) -> Map<String, Value> {
        json!({"title": title, "description": description})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_any_term_matches_case_insensitively() {
        let q = TextQuery::parse("WAVE lilies");
        assert!(q.matches(&artwork("The Great Wave", ""), &fields()));
        assert!(q.matches(&artwork("", "Water lilies at dusk"), &fields()));
        assert!(!q.matches(&artwork("Starry Night", ""), &fields()));
    }

    #[test]
    fn test_phrase_must_appear() {
        let q = TextQuery::parse("\"starry night\"");
        assert!(q.matches(&artwork("The Starry Night", ""), &fields()));
        assert!(!q.matches(&artwork("Night sky, starry", ""), &fields()));
    }

    #[test]
    fn test_negation_excludes() {
        let q = TextQuery::parse("night -starry");
        assert!(q.matches(&artwork("Night Watch", ""), &fields()));
        assert!(!q.matches(&artwork("Starry Night", ""), &fields()));
    }

    #[test]
    fn test_only_negations_match_nothing() {
        let q = TextQuery::parse("-starry");
        assert!(!q.matches(&artwork("Night Watch", ""), &fields()));
    }

    #[test]
    fn test_partial_words_do_not_match() {
        let q = TextQuery::parse("wav");
        assert!(!q.matches(&artwork("The Great Wave", ""), &fields()));
    }
}
