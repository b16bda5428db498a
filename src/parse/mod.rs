use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::formula::{Formula, Knowledge};

mod sentence;

pub mod consts {
    pub const NEG: &str = "¬";
    pub const STRONG_NEG: &str = "∼";
    pub const WEAK_NEG: &str = "≁";
    pub const CON: &str = "∧";
    pub const DIS: &str = "∨";
    pub const IMP: &str = "→";
}

pub use sentence::{parse_formula, parse_sentence};

pub type SentenceErrors = Vec<SentenceError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty operand")]
    EmptyOperand,
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("encountered invalid character(s) {0:?}")]
    InvalidCharacter(Vec<String>),
    #[error("missing connective/operator or misplaced parentheses")]
    MissingOp,
    #[error("malformed ion application, expected *(f, g) or *N(f, g) with N in 0-8")]
    BadIon,
    #[error("ion application is missing the comma between its arguments")]
    MissingComma,
}

/// A parse failure together with the sentence it occurred in.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{error} (while processing {sentence:?})")]
pub struct SentenceError {
    pub sentence: String,
    #[source]
    pub error: ParseError,
}

/// A parsed sequence of premises, each signed and marked as hard knowledge.
#[derive(Debug, PartialEq, Eq)]
pub struct Document {
    pub formulas: Vec<Formula>,
}

impl Document {
    /// Parse a whole input text.
    ///
    /// Comments are removed first, then the text is split into sentences on
    /// semicolons and newlines. Every failing sentence is reported.
    pub fn parse(i: &str) -> Result<Self, SentenceErrors> {
        let i = strip_comments(i);

        let mut formulas = vec![];
        let mut errors = vec![];

        for s in i
            .split(|c| c == ';' || c == '\n')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            match parse_sentence(s) {
                Ok(f) => formulas.push(f),
                Err(error) => errors.push(SentenceError {
                    sentence: s.to_owned(),
                    error,
                }),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        debug_assert!(formulas.iter().all(|f| f.knowledge() == Knowledge::Hard));

        Ok(Self { formulas })
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    pub fn into_formulas(self) -> Vec<Formula> {
        self.formulas
    }
}

/// Remove `/* ... */` blocks. An unterminated comment is left alone.
pub fn strip_comments(i: &str) -> String {
    static COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?s)/\*.*?\*/"#).unwrap() );

    COMMENT_REGEX.replace_all(i, "").into_owned()
}

/// Normalize operator shorthands in a given string.
pub fn normalize_ops(i: &str) -> String {
    use std::ops::Deref;
    use consts::*;

    static IMP_REGEX: Lazy<(Regex, &'static str)> = Lazy::new(|| (Regex::new(r#"(?:->|⇒)"#).unwrap(), IMP) );
    static CON_REGEX: Lazy<(Regex, &'static str)> = Lazy::new(|| (Regex::new(r#"(?:/\\|&)"#).unwrap(), CON) );
    static DIS_REGEX: Lazy<(Regex, &'static str)> = Lazy::new(|| (Regex::new(r#"(?:\\/|\|)"#).unwrap(), DIS) );
    static WKN_REGEX: Lazy<(Regex, &'static str)> = Lazy::new(|| (Regex::new(r#"~'"#).unwrap(), WEAK_NEG) );
    static STN_REGEX: Lazy<(Regex, &'static str)> = Lazy::new(|| (Regex::new(r#"~"#).unwrap(), STRONG_NEG) );
    static NEG_REGEX: Lazy<(Regex, &'static str)> = Lazy::new(|| (Regex::new(r#"(?:-|−)"#).unwrap(), NEG) );

    // Order matters: "->" must go before "-", and "~'" before "~".
    let pairs = [
        IMP_REGEX.deref(),
        CON_REGEX.deref(),
        DIS_REGEX.deref(),
        WKN_REGEX.deref(),
        STN_REGEX.deref(),
        NEG_REGEX.deref(),
    ];

    let mut out = i.to_owned();

    for (regex, norm) in pairs {
        out = regex.replace_all(&out, *norm).to_string();
    }

    out
}
