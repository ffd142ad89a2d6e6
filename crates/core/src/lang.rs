use std::collections::HashMap;

use chrono::NaiveDate;

/// Entity labels the item extractor cares about. A real linguistic backend
/// may recognize more; anything else is ignored upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityLabel {
    /// A bare number ("2", "1.99").
    Cardinal,
    /// A monetary amount ("$3.50").
    Money,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub label: EntityLabel,
    pub text: String,
}

impl Entity {
    pub fn new(label: EntityLabel, text: impl Into<String>) -> Self {
        Self { label, text: text.into() }
    }
}

/// Abstraction over the linguistic-analysis service.
///
/// Injected into the chunk merger and item extractor rather than loaded as a
/// process-wide model, so tests can supply a deterministic implementation.
/// Implementations must degrade gracefully: empty or garbage text yields
/// empty outputs, never an error.
pub trait LinguisticAnalyzer: Send + Sync {
    /// Lower-case, lemmatize, drop stop-words, and concatenate what remains
    /// (no separators). Used for terminator-phrase containment checks.
    fn normalize(&self, text: &str) -> String;

    /// Contiguous multi-word noun-phrase spans of `text`, in reading order.
    fn noun_chunks(&self, text: &str) -> Vec<String>;

    /// Labeled entities found in `text`.
    fn entities(&self, text: &str) -> Vec<Entity>;
}

/// Abstraction over the free-text date-parsing service.
pub trait DateParser: Send + Sync {
    fn parse(&self, text: &str) -> Option<NaiveDate>;
}

// ── Scripted implementations (always available, used for tests) ───────────────

/// Returns pre-set chunks and entities keyed by exact input text — useful for
/// exercising the merger and extractor without a real linguistic backend.
/// Normalization is plain lower-casing with whitespace removed.
#[derive(Debug, Default)]
pub struct MockAnalyzer {
    chunks: HashMap<String, Vec<String>>,
    entities: HashMap<String, Vec<Entity>>,
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunks(mut self, text: &str, chunks: &[&str]) -> Self {
        self.chunks
            .insert(text.to_string(), chunks.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_entity(mut self, text: &str, label: EntityLabel, entity_text: &str) -> Self {
        self.entities
            .entry(text.to_string())
            .or_default()
            .push(Entity::new(label, entity_text));
        self
    }
}

impl LinguisticAnalyzer for MockAnalyzer {
    fn normalize(&self, text: &str) -> String {
        text.to_lowercase().split_whitespace().collect()
    }

    fn noun_chunks(&self, text: &str) -> Vec<String> {
        self.chunks.get(text).cloned().unwrap_or_default()
    }

    fn entities(&self, text: &str) -> Vec<Entity> {
        self.entities.get(text).cloned().unwrap_or_default()
    }
}

/// Recognizes only the exact strings it was scripted with.
#[derive(Debug, Default)]
pub struct MockDateParser {
    known: HashMap<String, NaiveDate>,
}

impl MockDateParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, text: &str, date: NaiveDate) -> Self {
        self.known.insert(text.to_string(), date);
        self
    }
}

impl DateParser for MockDateParser {
    fn parse(&self, text: &str) -> Option<NaiveDate> {
        self.known.get(text).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_analyzer_returns_scripted_outputs() {
        let analyzer = MockAnalyzer::new()
            .with_chunks("GROCERY MART", &["GROCERY MART"])
            .with_entity("3.50", EntityLabel::Cardinal, "3.50");

        assert_eq!(analyzer.noun_chunks("GROCERY MART"), vec!["GROCERY MART"]);
        assert_eq!(analyzer.entities("3.50").len(), 1);
        assert!(analyzer.noun_chunks("anything else").is_empty());
        assert!(analyzer.entities("").is_empty());
    }

    #[test]
    fn mock_normalize_lowercases_and_strips_whitespace() {
        let analyzer = MockAnalyzer::new();
        assert_eq!(analyzer.normalize("Sub Total $5.00"), "subtotal$5.00");
    }

    #[test]
    fn mock_date_parser_only_knows_scripted_strings() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let parser = MockDateParser::new().with_date("01/02/2023", date);
        assert_eq!(parser.parse("01/02/2023"), Some(date));
        assert_eq!(parser.parse("not a date"), None);
    }
}
