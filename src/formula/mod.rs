use std::fmt;

mod justification;

pub use justification::{JustSymbol, SymbolGen, prefix_extends, prefix_matches};

pub mod consts {
    pub const HARD_TURNSTILES: [&str; 4] = ["⊨", "⊭", "⊫", "⊯"];
    pub const SOFT_TURNSTILES: [&str; 4] = ["⊨₅", "⊭₅", "⊫₅", "⊯₅"];
    pub const GENERIC_TURNSTILES: [&str; 4] = ["+*", "+/*", "-/*", "-*"];
    pub const ION_GLYPHS: [&str; 9] = ["♢", "♡", "♠", "O", "♣", "•", "∆", "∇", "⋈"];
    pub const UNIVERSAL: &str = "∀";
    pub const EXISTENTIAL: &str = "∃";
}

/// The four epistemic turnstiles, plus a sentinel for unsigned subformulas.
///
/// The discriminants are significant: two signs contradict when they differ
/// exactly in bit 1 (`T`/`NT`, `PT`/`NPT`), or when they are `T` and `NPT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Sign {
    True = 0,
    NotTrue = 2,
    PotTrue = 4,
    NotPotTrue = 6,
    Unknown = 127,
}

impl Sign {
    pub const ALL: [Sign; 4] = [Sign::True, Sign::NotTrue, Sign::PotTrue, Sign::NotPotTrue];

    pub fn contradicts(self, other: Self) -> bool {
        use Sign::*;

        (self as u8 ^ other as u8) == 2
            || matches!((self, other), (True, NotPotTrue) | (NotPotTrue, True))
    }

    /// True for `T` and `PT`.
    pub fn is_positive(self) -> bool {
        matches!(self, Sign::True | Sign::PotTrue)
    }

    pub(crate) fn index(self) -> Option<usize> {
        match self {
            Sign::True       => Some(0),
            Sign::NotTrue    => Some(1),
            Sign::PotTrue    => Some(2),
            Sign::NotPotTrue => Some(3),
            Sign::Unknown    => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sign::True       => "T",
            Sign::NotTrue    => "NT",
            Sign::PotTrue    => "PT",
            Sign::NotPotTrue => "NPT",
            Sign::Unknown    => "?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Knowledge {
    /// Given premises.
    Hard,
    /// Defeasible consequences produced inside ion expansion.
    Soft,
    /// Justifications produced inside ion expansion.
    Just,
    /// Not yet assigned (subformulas of a parsed sentence).
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    None,
    Universal,
    Existential,
    /// Marks a generic justification template.
    GenJust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `~`
    StrongNeg,
    /// `~'`
    WeakNeg,
    /// `bot(..)`
    Bot,
}

/// The ions. Digit ions carry their modal table in `solve::ions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ion {
    Generic,
    Digit(Digit),
}

impl Ion {
    /// The digit ion `*d`, if `d` names one.
    pub fn digit(d: u8) -> Option<Self> {
        Digit::new(d).map(Self::Digit)
    }
}

/// An ion digit, always in `0..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    pub const MAX: u8 = 8;

    pub fn new(d: u8) -> Option<Self> {
        (d <= Self::MAX).then_some(Self(d))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Imp,
    Bang,
    Ion(Ion),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Atomic(String),
    Unary(UnaryOp, Box<Formula>),
    Binary(BinaryOp, Box<Formula>, Box<Formula>),
}

/// A signed, ranked formula tree.
///
/// Children are owned, so `clone` is a deep copy. After construction only
/// the expansion marker and the justification prefix of a freshly derived
/// formula are ever touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    kind       : Kind,
    sign       : Sign,
    knowledge  : Knowledge,
    quantifier : Quantifier,
    rank       : u32,
    prefix     : Vec<JustSymbol>,
    expanded   : bool,
}

impl Formula {
    fn new(kind: Kind, rank: u32) -> Self {
        Self {
            kind,
            sign: Sign::Unknown,
            knowledge: Knowledge::Unknown,
            quantifier: Quantifier::None,
            rank,
            prefix: Vec::new(),
            expanded: false,
        }
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Self::new(Kind::Atomic(name.into()), 0)
    }

    pub fn unary(op: UnaryOp, f: Formula) -> Self {
        let rank = f.rank;
        Self::new(Kind::Unary(op, f.box_up()), rank)
    }

    pub fn binary(op: BinaryOp, l: Formula, r: Formula) -> Self {
        let rank = match op {
            BinaryOp::Ion(_) => (l.rank + 1).max(r.rank),
            _ => l.rank.max(r.rank),
        };

        Self::new(Kind::Binary(op, l.box_up(), r.box_up()), rank)
    }

    pub fn neg(f: Formula) -> Self {
        Self::unary(UnaryOp::Neg, f)
    }

    pub fn and(l: Formula, r: Formula) -> Self {
        Self::binary(BinaryOp::And, l, r)
    }

    pub fn or(l: Formula, r: Formula) -> Self {
        Self::binary(BinaryOp::Or, l, r)
    }

    pub fn imp(l: Formula, r: Formula) -> Self {
        Self::binary(BinaryOp::Imp, l, r)
    }

    pub fn ion(ion: Ion, l: Formula, r: Formula) -> Self {
        Self::binary(BinaryOp::Ion(ion), l, r)
    }

    /// Sign this formula at the top level.
    pub fn signed(mut self, sign: Sign, knowledge: Knowledge) -> Self {
        self.sign = sign;
        self.knowledge = knowledge;
        self
    }

    /// Build a formula with this one's shape and rank but a new sign,
    /// knowledge level and prefix.
    ///
    /// The quantifier is kept unless one is given. The prefix is replaced,
    /// never appended to, and the result is always unexpanded.
    pub fn resigned(
        &self,
        sign: Sign,
        knowledge: Knowledge,
        quantifier: Option<Quantifier>,
        prefix: &[JustSymbol],
    ) -> Self {
        Self {
            kind: self.kind.clone(),
            sign,
            knowledge,
            quantifier: quantifier.unwrap_or(self.quantifier),
            rank: self.rank,
            prefix: prefix.to_vec(),
            expanded: false,
        }
    }

    /// Mark this formula as already expanded, so no rule is ever applied to it.
    pub fn settled(mut self) -> Self {
        self.expanded = true;
        self
    }

    pub fn push_symbol(&mut self, j: JustSymbol) {
        self.prefix.push(j);
    }

    pub fn box_up(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn knowledge(&self) -> Knowledge {
        self.knowledge
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn prefix(&self) -> &[JustSymbol] {
        &self.prefix
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_generic(&self) -> bool {
        self.quantifier == Quantifier::GenJust
    }

    /// The variable name, for atoms.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            Kind::Atomic(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is the atom `name`, ignoring case.
    pub fn is_atom(&self, name: &str) -> bool {
        self.name().is_some_and(|s| s.eq_ignore_ascii_case(name))
    }

    pub fn unary_op(&self) -> Option<UnaryOp> {
        match &self.kind {
            Kind::Unary(op, _) => Some(*op),
            _ => None,
        }
    }

    pub fn binary_op(&self) -> Option<BinaryOp> {
        match &self.kind {
            Kind::Binary(op, ..) => Some(*op),
            _ => None,
        }
    }

    /// Signed structural equality: shape, sign, knowledge level, and
    /// position-wise unifiable prefixes of equal length.
    pub fn matches(&self, other: &Self) -> bool {
        if self.sign != other.sign
            || self.knowledge != other.knowledge
            || !prefix_matches(&self.prefix, &other.prefix)
        {
            return false;
        }

        match (&self.kind, &other.kind) {
            (Kind::Atomic(a), Kind::Atomic(b)) => a.eq_ignore_ascii_case(b),
            (Kind::Unary(o1, f1), Kind::Unary(o2, f2)) => o1 == o2 && f1.matches(f2),
            (Kind::Binary(o1, l1, r1), Kind::Binary(o2, l2, r2)) => {
                o1 == o2 && l1.matches(l2) && r1.matches(r2)
            }
            _ => false,
        }
    }

    /// Unsigned structural equality: connectives and variable names only.
    pub fn same_shape(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (Kind::Atomic(a), Kind::Atomic(b)) => a.eq_ignore_ascii_case(b),
            (Kind::Unary(o1, f1), Kind::Unary(o2, f2)) => o1 == o2 && f1.same_shape(f2),
            (Kind::Binary(o1, l1, r1), Kind::Binary(o2, l2, r2)) => {
                o1 == o2 && l1.same_shape(l2) && r1.same_shape(r2)
            }
            _ => false,
        }
    }

    /// Same sign at the top level and the same shape.
    pub fn same_signed_shape(&self, other: &Self) -> bool {
        self.sign == other.sign && self.same_shape(other)
    }

    /// Render with the generic-justification turnstiles in place of the
    /// plain ones.
    pub fn to_generic_string(&self) -> String {
        let mut out = String::new();
        // Writing to a String never fails.
        let _ = self.render(&mut out, &consts::GENERIC_TURNSTILES);
        out
    }

    fn render(&self, f: &mut impl fmt::Write, hard: &[&str; 4]) -> fmt::Result {
        use consts::*;

        if !self.prefix.is_empty() {
            for j in self.prefix.iter().rev() {
                write!(f, "{j}")?;
            }
            write!(f, " ")?;
        }

        let glyphs = match self.knowledge {
            Knowledge::Hard | Knowledge::Just => Some(hard),
            Knowledge::Soft => Some(&SOFT_TURNSTILES),
            Knowledge::Unknown => None,
        };

        if let (Some(glyphs), Some(i)) = (glyphs, self.sign.index()) {
            write!(f, "{} ", glyphs[i])?;
        }

        match &self.kind {
            Kind::Atomic(s) => write!(f, "{s}")?,
            Kind::Unary(op, g) => {
                let op = match op {
                    UnaryOp::Neg       => "-",
                    UnaryOp::StrongNeg => "~",
                    UnaryOp::WeakNeg   => "~'",
                    UnaryOp::Bot       => "bot",
                };
                write!(f, "{op}({g})")?
            }
            Kind::Binary(op, l, r) => match op {
                BinaryOp::And  => write!(f, "({l} & {r})")?,
                BinaryOp::Or   => write!(f, "({l} | {r})")?,
                BinaryOp::Imp  => write!(f, "({l} -> {r})")?,
                BinaryOp::Bang => write!(f, "({l} ! {r})")?,
                BinaryOp::Ion(Ion::Generic) => write!(f, "*({l}, {r})")?,
                BinaryOp::Ion(Ion::Digit(d)) => {
                    write!(f, "{}({l}, {r})", ION_GLYPHS[d.index()])?
                }
            },
        }

        match self.quantifier {
            Quantifier::Universal   => write!(f, "{UNIVERSAL}"),
            Quantifier::Existential => write!(f, "{EXISTENTIAL}"),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, &consts::HARD_TURNSTILES)
    }
}
