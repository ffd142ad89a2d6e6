use std::sync::OnceLock;

use regex::Regex;

use recibo_core::lang::{Entity, EntityLabel, LinguisticAnalyzer};

use crate::stopwords::is_stop_word;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_money, r"\$\s?\d[\d,]*(?:\.\d+)?");
re!(re_cardinal, r"\b\d[\d,]*(?:\.\d+)?\b");

// ── Rule-based linguistic backend ─────────────────────────────────────────────

/// Deterministic, dictionary-and-regex linguistic analyzer.
///
/// Fills the role a statistical NLP model plays upstream: receipts are short,
/// noisy, and mostly nouns and numbers, so stop-word filtering, a plural
/// stemmer, and amount regexes get close enough to drive the layout pipeline
/// without a model dependency.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleAnalyzer;

impl RuleAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl LinguisticAnalyzer for RuleAnalyzer {
    fn normalize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for token in tokenize(&text.to_lowercase()) {
            match token {
                Token::Word(w) => {
                    if !is_stop_word(&w) {
                        out.push_str(&lemma(&w));
                    }
                }
                Token::Other(t) => out.push_str(&t),
            }
        }
        out
    }

    fn noun_chunks(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for raw in text.split_whitespace() {
            if is_wordlike(raw) {
                current.push(raw);
            } else if !current.is_empty() {
                chunks.push(current.join(" "));
                current.clear();
            }
        }
        if !current.is_empty() {
            chunks.push(current.join(" "));
        }
        chunks
    }

    fn entities(&self, text: &str) -> Vec<Entity> {
        let mut entities: Vec<Entity> = re_money()
            .find_iter(text)
            .map(|m| Entity::new(EntityLabel::Money, m.as_str()))
            .collect();
        entities.extend(
            re_cardinal()
                .find_iter(text)
                .map(|m| Entity::new(EntityLabel::Cardinal, m.as_str())),
        );
        entities
    }
}

/// A token is wordlike when it carries at least one letter — bare numbers,
/// prices, and symbol runs break noun phrases.
fn is_wordlike(token: &str) -> bool {
    token.chars().any(|c| c.is_alphabetic())
}

// ── Tokenization ──────────────────────────────────────────────────────────────

enum Token {
    Word(String),
    Other(String),
}

/// Split into alphabetic runs, numeric runs ('.' and ',' continue a number),
/// and symbol runs. Whitespace separates and is dropped.
fn tokenize(text: &str) -> Vec<Token> {
    #[derive(PartialEq, Clone, Copy)]
    enum Class {
        Alpha,
        Num,
        Sym,
    }

    fn flush(buf: &mut String, class: &mut Option<Class>, tokens: &mut Vec<Token>) {
        if let Some(c) = class.take() {
            let t = std::mem::take(buf);
            tokens.push(match c {
                Class::Alpha => Token::Word(t),
                _ => Token::Other(t),
            });
        }
    }

    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut class: Option<Class> = None;

    for ch in text.chars() {
        let next = if ch.is_whitespace() {
            None
        } else if ch.is_alphabetic() {
            Some(Class::Alpha)
        } else if ch.is_ascii_digit() {
            Some(Class::Num)
        } else if (ch == '.' || ch == ',') && class == Some(Class::Num) {
            Some(Class::Num)
        } else {
            Some(Class::Sym)
        };

        match next {
            None => flush(&mut buf, &mut class, &mut tokens),
            Some(n) => {
                if class != Some(n) {
                    flush(&mut buf, &mut class, &mut tokens);
                    class = Some(n);
                }
                buf.push(ch);
            }
        }
    }
    flush(&mut buf, &mut class, &mut tokens);
    tokens
}

// ── Lemmatization ─────────────────────────────────────────────────────────────

/// Naive English lemmatizer: a handful of irregular plurals plus suffix
/// stripping. Both sides of every comparison run through the same rules, so
/// imprecision cancels out.
fn lemma(word: &str) -> String {
    match word {
        "children" => return "child".into(),
        "feet" => return "foot".into(),
        "geese" => return "goose".into(),
        "men" => return "man".into(),
        "women" => return "woman".into(),
        "mice" => return "mouse".into(),
        "teeth" => return "tooth".into(),
        _ => {}
    }

    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if word.len() > 4
        && ["ses", "xes", "zes", "ches", "shes"].iter().any(|s| word.ends_with(s))
    {
        return word[..word.len() - 2].to_string();
    }
    if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}
