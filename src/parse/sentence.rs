use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize_ops;
use super::ParseError;
use crate::formula::*;

/// Binary connectives by increasing precedence.
const BINARY_OPS: [(char, BinaryOp); 4] = [
    ('→', BinaryOp::Imp),
    ('∨', BinaryOp::Or),
    ('∧', BinaryOp::And),
    ('!', BinaryOp::Bang),
];

/// Parse one sentence: an optional turnstile followed by a formula.
///
/// Without a turnstile the sentence is asserted true. The result is hard
/// knowledge.
pub fn parse_sentence(i: &str) -> Result<Formula, ParseError> {
    static TURNSTILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^(NPT|NT|PT|T)"#).unwrap() );

    let i = i.trim();

    let (sign, rest) = match TURNSTILE_REGEX.find(i) {
        Some(m) => {
            let rest = &i[m.end()..];

            match rest.chars().next() {
                None => return Err(ParseError::EmptyOperand),
                Some(c) if is_ident(c) => (Sign::True, i),
                Some(_) => (turnstile(m.as_str()), rest),
            }
        }
        None => (Sign::True, i),
    };

    Ok( parse_formula(rest)?.signed(sign, Knowledge::Hard) )
}

/// Parse an unsigned formula.
pub fn parse_formula(i: &str) -> Result<Formula, ParseError> {
    parse_normalized( &normalize_ops(i) )
}

fn parse_normalized(i: &str) -> Result<Formula, ParseError> {
    static ATOMIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^[A-Za-z0-9_]+$"#).unwrap() );

    let i = i.trim();

    if i.is_empty() {
        return Err(ParseError::EmptyOperand)
    }

    let c: Vec<char> = i.chars().collect();
    let d = compute_depths(&c)?;

    // Remove redundant outer parentheses
    if c[0] == '(' && c[c.len() - 1] == ')' && d[1..c.len() - 1].iter().all(|d| *d > 0) {
        let rest: String = c[1..c.len() - 1].iter().collect();
        return parse_normalized(&rest);
    }

    // The main connective is the first occurrence, outside any parentheses,
    // of the loosest binding binary operator present.
    for (op_c, op) in BINARY_OPS {
        let Some(n) = (0..c.len()).find(|n| c[*n] == op_c && d[*n] == 0) else {
            continue;
        };

        let l: String = c[..n].iter().collect();
        let r: String = c[n + 1..].iter().collect();

        let l = parse_normalized(&l)?;
        let r = parse_normalized(&r)?;

        return Ok( Formula::binary(op, l, r) )
    }

    let rest: String = c[1..].iter().collect();

    match c[0] {
        '¬' => return Ok( Formula::unary(UnaryOp::Neg, parse_normalized(&rest)?) ),
        '∼' => return Ok( Formula::unary(UnaryOp::StrongNeg, parse_normalized(&rest)?) ),
        '≁' => return Ok( Formula::unary(UnaryOp::WeakNeg, parse_normalized(&rest)?) ),
        '*' => return parse_ion(&rest),
        _ => ()
    }

    if let Some(rest) = i.strip_prefix("bot") {
        let rest = rest.trim_start();

        if rest.starts_with('(') {
            let inner = group(rest)?;
            return Ok( Formula::unary(UnaryOp::Bot, parse_normalized(inner)?) )
        }
    }

    if ATOMIC_REGEX.is_match(i) {
        return Ok( Formula::atom(i) )
    }

    invalid_chars(i)?;

    Err(ParseError::MissingOp)
}

/// Parse the remainder of an ion application after the `*`.
fn parse_ion(i: &str) -> Result<Formula, ParseError> {
    let i = i.trim_start();

    let (ion, rest) = match i.chars().next() {
        Some(c @ '0'..='9') => (Ion::digit(c as u8 - b'0').ok_or(ParseError::BadIon)?, &i[1..]),
        Some('(') => (Ion::Generic, i),
        _ => return Err(ParseError::BadIon),
    };

    let inner: Vec<char> = group(rest.trim_start())?.chars().collect();
    let d = compute_depths(&inner)?;

    let Some(n) = (0..inner.len()).find(|n| inner[*n] == ',' && d[*n] == 0) else {
        return Err(ParseError::MissingComma)
    };

    let l: String = inner[..n].iter().collect();
    let r: String = inner[n + 1..].iter().collect();

    Ok( Formula::ion(ion, parse_normalized(&l)?, parse_normalized(&r)?) )
}

/// The contents of a string that is exactly one parenthesized group.
fn group(i: &str) -> Result<&str, ParseError> {
    let c: Vec<char> = i.chars().collect();
    let d = compute_depths(&c)?;

    if c.first() != Some(&'(') || c.last() != Some(&')') {
        return Err(ParseError::BadIon)
    }

    // Only the final character may close the opening parenthesis.
    if d[..c.len() - 1].iter().any(|d| *d == 0) {
        return Err(ParseError::MissingOp)
    }

    Ok( &i[1..i.len() - 1] )
}

fn turnstile(s: &str) -> Sign {
    match s {
        "T"   => Sign::True,
        "NT"  => Sign::NotTrue,
        "PT"  => Sign::PotTrue,
        "NPT" => Sign::NotPotTrue,
        _     => unreachable!("Turnstile regular expression matched {s}")
    }
}

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn invalid_chars(i: &str) -> Result<(), ParseError> {
    static REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[^A-Za-z0-9_¬∼≁∧∨→!*,\s\)\(]"#).unwrap() );

    let captures: Vec<_> = REGEX.find_iter(i)
        .map(|m| m.as_str() )
        .map(|s| s.to_owned() )
        .collect();

    if !captures.is_empty() {
        return Err( ParseError::InvalidCharacter(captures) )
    }

    Ok(())
}

/// Parenthesis depth after each character.
fn compute_depths(i: &[char]) -> Result<Box<[u16]>, ParseError> {
    let mut c_depth = 0_u16;
    let mut v_depth = Vec::with_capacity(i.len());

    for c in i {
        match c {
            '(' => c_depth = c_depth.saturating_add(1),
            ')' => {
                c_depth = c_depth
                    .checked_sub(1)
                    .ok_or(ParseError::UnbalancedParentheses)?
            }
            _ => ()
        }

        v_depth.push(c_depth);
    }

    if c_depth != 0 {
        return Err(ParseError::UnbalancedParentheses)
    }

    Ok( v_depth.into_boxed_slice() )
}
