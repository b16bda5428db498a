//! Expansion tables for the ions.
//!
//! Every ion `*n(g1, g2)` expands into justifications of `g1` and soft
//! consequences of `g2`. The tables differ only in the signs and quantifiers
//! attached to each successor, so each ion is a row of data driven by one
//! [`Rule`] implementation.

use crate::formula::*;

use super::rules::{operands, Expansion, Rule};

/// Sign and quantifier of a justification successor.
#[derive(Debug, Clone, Copy)]
pub struct Just(pub Sign, pub Quantifier);

/// Successors of a `T`-signed ion: `[just, soft] | [alt]`.
#[derive(Debug, Clone, Copy)]
pub struct TrueCase {
    pub just: Just,
    pub soft: Sign,
    pub alt: Just,
}

/// Successors of an `NT`-signed ion.
#[derive(Debug, Clone, Copy)]
pub enum NotTrueCase {
    /// `[shared, left, left_soft] | [shared, right_soft]`
    Split {
        shared: Just,
        left: Just,
        left_soft: Sign,
        right_soft: Sign,
    },
    /// `[just, soft]`
    Single { just: Just, soft: Sign },
}

/// Successors of a `PT`-signed ion: `[just, soft] | [alt_soft]`.
#[derive(Debug, Clone, Copy)]
pub struct PotTrueCase {
    pub just: Just,
    pub soft: Sign,
    pub alt_soft: Sign,
}

/// Successors of an `NPT`-signed ion: `[just, soft]`.
#[derive(Debug, Clone, Copy)]
pub struct NotPotTrueCase {
    pub just: Just,
    pub soft: Sign,
}

#[derive(Debug)]
pub struct IonTable {
    /// The nogood shorthand `*n(g, False)`, indexed by the ion's sign.
    pub nogood: [Just; 4],
    pub t: TrueCase,
    pub nt: NotTrueCase,
    pub pt: PotTrueCase,
    pub npt: NotPotTrueCase,
}

const T: Sign = Sign::True;
const NT: Sign = Sign::NotTrue;
const PT: Sign = Sign::PotTrue;
const NPT: Sign = Sign::NotPotTrue;

const A: Quantifier = Quantifier::Universal;
const E: Quantifier = Quantifier::Existential;
const G: Quantifier = Quantifier::GenJust;

/// The table for an ion.
pub fn table(ion: Ion) -> &'static IonTable {
    match ion {
        Ion::Generic => &GENERIC,
        Ion::Digit(d) => &DIGITS[d.index()],
    }
}

/// A justification successor. Generic justifications are templates and are
/// never expanded further.
fn justification(g: &Formula, Just(sign, quantifier): Just, prefix: &[JustSymbol]) -> Formula {
    let j = g.resigned(sign, Knowledge::Just, Some(quantifier), prefix);

    if quantifier == Quantifier::GenJust {
        j.settled()
    } else {
        j
    }
}

fn is_nogood(f: &Formula) -> bool {
    operands(f).1.is_atom("False")
}

impl Rule for IonTable {
    fn apply(&self, f: &Formula, _symbols: &mut SymbolGen) -> Expansion {
        let (g1, g2) = operands(f);

        let just = |j| justification(g1, j, f.prefix());
        let soft = |s| g2.resigned(s, Knowledge::Soft, None, f.prefix());

        if is_nogood(f) {
            return match f.sign().index() {
                Some(i) => Expansion::Extend(vec![just(self.nogood[i])]),
                None => Expansion::Terminal,
            }
        }

        match f.sign() {
            Sign::True => Expansion::Split(
                vec![just(self.t.just), soft(self.t.soft)],
                vec![just(self.t.alt)],
            ),
            Sign::NotTrue => match self.nt {
                NotTrueCase::Split { shared, left, left_soft, right_soft } => Expansion::Split(
                    vec![just(shared), just(left), soft(left_soft)],
                    vec![just(shared), soft(right_soft)],
                ),
                NotTrueCase::Single { just: j, soft: s } => Expansion::Extend(
                    vec![just(j), soft(s)]
                ),
            },
            Sign::PotTrue => Expansion::Split(
                vec![just(self.pt.just), soft(self.pt.soft)],
                vec![soft(self.pt.alt_soft)],
            ),
            Sign::NotPotTrue => Expansion::Extend(
                vec![just(self.npt.just), soft(self.npt.soft)]
            ),
            Sign::Unknown => Expansion::Terminal,
        }
    }

    fn splits(&self, f: &Formula) -> bool {
        if is_nogood(f) {
            return false
        }

        match f.sign() {
            Sign::True | Sign::PotTrue => true,
            Sign::NotTrue => matches!(self.nt, NotTrueCase::Split { .. }),
            _ => false,
        }
    }
}

/// The common layout of ions 0, 1, 2, 5 and 8, which split on `NT`.
const fn wide(
    nogood: [Just; 4],
    t: (Just, Sign, Just),
    nt: (Just, Just, Sign, Sign),
    pt: (Just, Sign, Sign),
    npt: (Just, Sign),
) -> IonTable {
    IonTable {
        nogood,
        t: TrueCase { just: t.0, soft: t.1, alt: t.2 },
        nt: NotTrueCase::Split { shared: nt.0, left: nt.1, left_soft: nt.2, right_soft: nt.3 },
        pt: PotTrueCase { just: pt.0, soft: pt.1, alt_soft: pt.2 },
        npt: NotPotTrueCase { just: npt.0, soft: npt.1 },
    }
}

/// The layout of ions 3, 4, 6 and 7, which do not split on `NT`.
const fn narrow(
    nogood: [Just; 4],
    t: (Just, Sign, Just),
    nt: (Just, Sign),
    pt: (Just, Sign, Sign),
    npt: (Just, Sign),
) -> IonTable {
    IonTable {
        nogood,
        t: TrueCase { just: t.0, soft: t.1, alt: t.2 },
        nt: NotTrueCase::Single { just: nt.0, soft: nt.1 },
        pt: PotTrueCase { just: pt.0, soft: pt.1, alt_soft: pt.2 },
        npt: NotPotTrueCase { just: npt.0, soft: npt.1 },
    }
}

static DIGITS: [IonTable; 9] = [
    // ♢
    wide(
        [Just(NPT, A), Just(PT, E), Just(NPT, E), Just(PT, A)],
        (Just(PT, A), T, Just(NPT, A)),
        (Just(PT, E), Just(NPT, E), T, NT),
        (Just(NPT, E), NPT, PT),
        (Just(PT, A), NPT),
    ),
    // ♡
    wide(
        [Just(NT, A), Just(T, E), Just(NT, E), Just(T, E)],
        (Just(T, A), T, Just(NT, A)),
        (Just(T, E), Just(NT, E), T, NT),
        (Just(NT, E), NPT, PT),
        (Just(T, A), NPT),
    ),
    // ♠
    wide(
        [Just(T, A), Just(T, E), Just(NT, E), Just(T, E)],
        (Just(T, A), T, Just(NPT, A)),
        (Just(PT, E), Just(NT, E), T, NT),
        (Just(NT, E), NPT, PT),
        (Just(T, A), NPT),
    ),
    // O
    narrow(
        [Just(NPT, A), Just(PT, E), Just(NPT, A), Just(PT, E)],
        (Just(NPT, E), T, Just(NPT, A)),
        (Just(PT, E), NT),
        (Just(NPT, A), NPT, PT),
        (Just(PT, E), NPT),
    ),
    // ♣
    narrow(
        [Just(NT, A), Just(T, E), Just(NT, A), Just(T, E)],
        (Just(T, E), T, Just(NT, A)),
        (Just(T, E), NT),
        (Just(NT, A), NPT, PT),
        (Just(T, E), NPT),
    ),
    // •
    wide(
        [Just(NPT, A), Just(PT, E), Just(NT, A), Just(T, E)],
        (Just(T, E), T, Just(NPT, A)),
        (Just(PT, E), Just(NT, A), T, NT),
        (Just(NT, A), NPT, PT),
        (Just(T, E), NPT),
    ),
    // ∆
    narrow(
        [Just(NPT, E), Just(PT, A), Just(NPT, E), Just(PT, A)],
        (Just(PT, A), T, Just(NPT, E)),
        (Just(PT, A), NT),
        (Just(NPT, E), NPT, PT),
        (Just(PT, A), NPT),
    ),
    // ∇
    narrow(
        [Just(NT, E), Just(T, A), Just(NT, E), Just(T, A)],
        (Just(T, A), T, Just(NT, E)),
        (Just(T, A), NT),
        (Just(NT, E), NPT, PT),
        (Just(T, A), NPT),
    ),
    // ⋈
    wide(
        [Just(NPT, E), Just(PT, A), Just(NT, E), Just(T, A)],
        (Just(T, A), T, Just(NPT, E)),
        (Just(PT, A), Just(NT, E), T, NT),
        (Just(NT, E), NPT, PT),
        (Just(T, A), NPT),
    ),
];

static GENERIC: IonTable = wide(
    [Just(NPT, G), Just(PT, G), Just(NT, G), Just(T, G)],
    (Just(T, G), T, Just(NPT, G)),
    (Just(PT, G), Just(NT, G), T, NT),
    (Just(NT, G), NPT, PT),
    (Just(T, G), NPT),
);
