use std::fmt;

/// An interpretation symbol in a justification prefix.
///
/// Label `0` marks a variable standing for every instance of a universal
/// quantifier; any other label is a concrete witness minted by [`SymbolGen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JustSymbol {
    rank: u32,
    label: u32,
}

impl JustSymbol {
    /// A unification variable of the given rank.
    pub fn variable(rank: u32) -> Self {
        Self { rank, label: 0 }
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn label(&self) -> u32 {
        self.label
    }

    pub fn is_variable(&self) -> bool {
        self.label == 0
    }

    /// Two symbols unify when their ranks agree and at least one is a variable.
    ///
    /// Two distinct concrete witnesses never unify, not even with themselves:
    /// closure only ever compares a witness against a variable.
    pub fn unifies(&self, other: &Self) -> bool {
        self.rank == other.rank && (self.is_variable() || other.is_variable())
    }
}

impl fmt::Display for JustSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_variable() {
            write!(f, "J")
        } else {
            write!(f, "j{}", self.label)
        }
    }
}

/// Mints concrete justification symbols with strictly increasing labels.
#[derive(Debug)]
pub struct SymbolGen {
    next: u32,
}

impl SymbolGen {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// A fresh existential witness of the given rank.
    pub fn fresh(&mut self, rank: u32) -> JustSymbol {
        let label = self.next;
        self.next += 1;

        JustSymbol { rank, label }
    }

    /// Number of concrete symbols minted so far.
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

impl Default for SymbolGen {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether two prefixes have equal length and unify position by position.
pub fn prefix_matches(a: &[JustSymbol], b: &[JustSymbol]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.unifies(y))
}

/// Whether `longer` begins with a segment unifying with `head`.
///
/// Symbols are pushed onto the end of a prefix but rendered in reverse, so
/// this reads as "ends with" in printed output.
pub fn prefix_extends(longer: &[JustSymbol], head: &[JustSymbol]) -> bool {
    head.len() <= longer.len() && head.iter().zip(longer).all(|(x, y)| x.unifies(y))
}
