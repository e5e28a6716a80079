//! Rule-based word tokenizer for OCR'd menu text.
//!
//! Splits on whitespace, peels punctuation off word edges, breaks compounds
//! on infix separators and keeps known abbreviations whole so that their
//! fragments never look like words.

use std::sync::LazyLock;

use regex::Regex;

/// A lexical unit. Exists only while a menu is being segmented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// True when every character is alphabetic.
    pub is_word: bool,
}

impl Token {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_word: !text.is_empty() && text.chars().all(char::is_alphabetic),
        }
    }

    /// Length in characters, not bytes.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Tokenizer abstraction (allows swapping in a model-backed tokenizer).
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Tokenizers addressable from a language profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerKind {
    German,
    English,
}

impl TokenizerKind {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "de-rules" => Some(Self::German),
            "en-rules" => Some(Self::English),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::German => "de-rules",
            Self::English => "en-rules",
        }
    }

    pub fn build(&self) -> RuleTokenizer {
        match self {
            Self::German => RuleTokenizer::new(GERMAN_ABBREVIATIONS),
            Self::English => RuleTokenizer::new(ENGLISH_ABBREVIATIONS),
        }
    }
}

static GERMAN_ABBREVIATIONS: &[&str] = &[
    "z.B.", "bzw.", "ca.", "inkl.", "evtl.", "u.a.", "usw.", "Nr.", "St.", "Stk.", "gr.", "kl.",
    "versch.", "o.", "m.", "u.",
];

static ENGLISH_ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "incl.", "approx.", "etc.", "no.", "pcs.", "w/", "vs.",
];

/// Separators that split a chunk into parts, e.g. `Kartoffel-Suppe`.
static INFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-/,;:+&|\u{2013}\u{2014}]").expect("static infix pattern"));

/// A period glued between a lowercase and an uppercase letter, e.g.
/// `Nudeln.Dienstag` where OCR lost the space after a sentence end.
static PERIOD_JOIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Ll}\.\p{Lu}").expect("static period pattern"));

/// Whitespace / punctuation tokenizer with an abbreviation exception list.
#[derive(Debug, Clone)]
pub struct RuleTokenizer {
    abbreviations: &'static [&'static str],
}

impl RuleTokenizer {
    pub fn new(abbreviations: &'static [&'static str]) -> Self {
        Self { abbreviations }
    }

    fn is_abbreviation(&self, chunk: &str) -> bool {
        self.abbreviations.iter().any(|a| *a == chunk)
    }

    fn tokenize_chunk(&self, chunk: &str, out: &mut Vec<Token>) {
        if self.is_abbreviation(chunk) {
            out.push(Token::new(chunk));
            return;
        }

        // Leading punctuation: one token per character.
        let mut core = chunk;
        while let Some(c) = core.chars().next() {
            if c.is_alphanumeric() || self.is_abbreviation(core) {
                break;
            }
            out.push(Token::new(&core[..c.len_utf8()]));
            core = &core[c.len_utf8()..];
        }

        // Trailing punctuation, collected back to front.
        let mut suffixes = Vec::new();
        while let Some(c) = core.chars().next_back() {
            if c.is_alphanumeric() || self.is_abbreviation(core) {
                break;
            }
            let split = core.len() - c.len_utf8();
            suffixes.push(&core[split..]);
            core = &core[..split];
        }

        if !core.is_empty() {
            if self.is_abbreviation(core) {
                out.push(Token::new(core));
            } else {
                split_period_joins(core, out);
            }
        }

        out.extend(suffixes.into_iter().rev().map(Token::new));
    }
}

fn split_period_joins(core: &str, out: &mut Vec<Token>) {
    let mut last = 0;
    for m in PERIOD_JOIN_RE.find_iter(core) {
        let dot = m.start() + core[m.start()..].chars().next().map_or(0, char::len_utf8);
        split_infixes(&core[last..dot], out);
        out.push(Token::new("."));
        last = dot + 1;
    }
    split_infixes(&core[last..], out);
}

fn split_infixes(core: &str, out: &mut Vec<Token>) {
    let mut last = 0;
    for m in INFIX_RE.find_iter(core) {
        if m.start() > last {
            out.push(Token::new(&core[last..m.start()]));
        }
        out.push(Token::new(m.as_str()));
        last = m.end();
    }
    if last < core.len() {
        out.push(Token::new(&core[last..]));
    }
}

impl Tokenizer for RuleTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        for chunk in text.split_whitespace() {
            self.tokenize_chunk(chunk, &mut tokens);
        }
        tokens
    }
}
