use crate::formula::*;

use super::ions;
use super::BranchingPolicy;

/// What applying a rule to a formula adds to its branch.
#[derive(Debug, PartialEq, Eq)]
pub enum Expansion {
    /// No rule applies.
    Terminal,
    /// Add every formula to the current branch.
    Extend(Vec<Formula>),
    /// Split the branch; each side receives one list.
    Split(Vec<Formula>, Vec<Formula>),
}

impl Expansion {
    pub fn is_split(&self) -> bool {
        matches!(self, Expansion::Split(..))
    }
}

pub trait Rule {
    /// Successors of `f` under this rule.
    fn apply(&self, f: &Formula, symbols: &mut SymbolGen) -> Expansion;
    /// Whether applying this rule to `f` splits the branch.
    fn splits(&self, f: &Formula) -> bool;
}

/// Find the rule governing a formula, if any.
///
/// Quantified formulas are instantiated before their connective is looked at;
/// atoms have no rule.
pub fn rule_for(f: &Formula) -> Option<&'static dyn Rule> {
    if f.quantifier() != Quantifier::None {
        return Some(&Instantiation)
    }

    let rule: &'static dyn Rule = match f.kind() {
        Kind::Atomic(_) => return None,
        Kind::Unary(op, _) => match op {
            UnaryOp::Neg       => &NEGATION,
            UnaryOp::StrongNeg => &STRONG_NEGATION,
            UnaryOp::WeakNeg   => &WEAK_NEGATION,
            UnaryOp::Bot       => &Bottom,
        },
        Kind::Binary(op, ..) => match op {
            BinaryOp::And     => &CONJUNCTION,
            BinaryOp::Or      => &DISJUNCTION,
            BinaryOp::Imp     => &IMPLICATION,
            BinaryOp::Bang    => &BANG,
            BinaryOp::Ion(i)  => ions::table(*i),
        },
    };

    Some(rule)
}

/// Apply the rule for `f`, if any.
pub fn apply(f: &Formula, symbols: &mut SymbolGen) -> Expansion {
    match rule_for(f) {
        Some(rule) => rule.apply(f, symbols),
        None => Expansion::Terminal,
    }
}

/// Whether `f` should be queued behind the non-branching formulas of a branch.
pub fn is_branching(f: &Formula, policy: BranchingPolicy) -> bool {
    match policy {
        BranchingPolicy::SignTable => listed_as_branching(f),
        BranchingPolicy::RuleShape => rule_for(f).is_some_and(|r| r.splits(f)),
    }
}

fn listed_as_branching(f: &Formula) -> bool {
    use Sign::*;

    let sign = f.sign();

    match f.kind() {
        Kind::Unary(UnaryOp::Bot, _) => sign == NotTrue,
        Kind::Binary(op, ..) => match op {
            BinaryOp::Or   => sign == True,
            BinaryOp::And  => sign == NotTrue,
            BinaryOp::Imp  => sign == True,
            BinaryOp::Bang => sign == NotTrue,
            BinaryOp::Ion(Ion::Digit(d)) => match sign {
                NotPotTrue => false,
                NotTrue => !matches!(d.get(), 3 | 4 | 6 | 7),
                _ => true,
            },
            BinaryOp::Ion(Ion::Generic) => false,
        },
        _ => false,
    }
}

/// The two children of a binary formula.
pub(super) fn operands(f: &Formula) -> (&Formula, &Formula) {
    match f.kind() {
        Kind::Binary(_, l, r) => (&**l, &**r),
        _ => unreachable!("Binary rule applied to non-binary formula {f}")
    }
}

fn operand(f: &Formula) -> &Formula {
    match f.kind() {
        Kind::Unary(_, g) => &**g,
        _ => unreachable!("Unary rule applied to non-unary formula {f}")
    }
}

/// Strip the quantifier and extend the prefix with a symbol of the formula's
/// rank: a fresh witness for an existential, a variable for a universal.
struct Instantiation;

impl Rule for Instantiation {
    fn apply(&self, f: &Formula, symbols: &mut SymbolGen) -> Expansion {
        let mut g = f.resigned(f.sign(), f.knowledge(), Some(Quantifier::None), f.prefix());

        let j = match f.quantifier() {
            Quantifier::Existential => symbols.fresh(f.rank()),
            _ => JustSymbol::variable(f.rank()),
        };

        g.push_symbol(j);

        Expansion::Extend(vec![g])
    }

    fn splits(&self, _f: &Formula) -> bool {
        false
    }
}

/// A unary connective that re-signs its operand, indexed by the parent's sign.
struct Flip([Sign; 4]);

static NEGATION: Flip = Flip([Sign::NotPotTrue, Sign::PotTrue, Sign::NotTrue, Sign::True]);
static STRONG_NEGATION: Flip = Flip([Sign::NotTrue, Sign::True, Sign::NotTrue, Sign::True]);
static WEAK_NEGATION: Flip = Flip([Sign::NotPotTrue, Sign::PotTrue, Sign::NotPotTrue, Sign::PotTrue]);

impl Rule for Flip {
    fn apply(&self, f: &Formula, _symbols: &mut SymbolGen) -> Expansion {
        let Some(i) = f.sign().index() else {
            return Expansion::Terminal
        };

        let g = operand(f).resigned(self.0[i], f.knowledge(), None, f.prefix());

        Expansion::Extend(vec![g])
    }

    fn splits(&self, _f: &Formula) -> bool {
        false
    }
}

struct Bottom;

impl Rule for Bottom {
    fn apply(&self, f: &Formula, _symbols: &mut SymbolGen) -> Expansion {
        let g = operand(f);
        let derive = |s| g.resigned(s, f.knowledge(), None, f.prefix());

        match f.sign() {
            Sign::True => Expansion::Extend(vec![
                derive(Sign::PotTrue),
                derive(Sign::NotTrue),
            ]),
            Sign::NotTrue => Expansion::Split(
                vec![derive(Sign::True)],
                vec![derive(Sign::NotPotTrue)],
            ),
            _ => Expansion::Terminal,
        }
    }

    fn splits(&self, f: &Formula) -> bool {
        f.sign() == Sign::NotTrue
    }
}

/// How a binary connective distributes a sign over its two operands.
#[derive(Clone, Copy)]
enum Shape {
    /// Both operands join the branch.
    Both(Sign, Sign),
    /// The branch splits, one operand per side.
    Either(Sign, Sign),
}

/// A binary boolean connective, indexed by the parent's sign.
struct Boolean([Shape; 4]);

static CONJUNCTION: Boolean = Boolean([
    Shape::Both(Sign::True, Sign::True),
    Shape::Either(Sign::NotTrue, Sign::NotTrue),
    Shape::Both(Sign::PotTrue, Sign::PotTrue),
    Shape::Either(Sign::NotPotTrue, Sign::NotPotTrue),
]);

static DISJUNCTION: Boolean = Boolean([
    Shape::Either(Sign::True, Sign::True),
    Shape::Both(Sign::NotTrue, Sign::NotTrue),
    Shape::Either(Sign::PotTrue, Sign::PotTrue),
    Shape::Both(Sign::NotPotTrue, Sign::NotPotTrue),
]);

static IMPLICATION: Boolean = Boolean([
    Shape::Either(Sign::NotPotTrue, Sign::True),
    Shape::Both(Sign::PotTrue, Sign::NotTrue),
    Shape::Either(Sign::NotTrue, Sign::PotTrue),
    Shape::Both(Sign::True, Sign::NotPotTrue),
]);

static BANG: Boolean = Boolean([
    Shape::Both(Sign::True, Sign::True),
    Shape::Either(Sign::NotTrue, Sign::NotTrue),
    Shape::Either(Sign::PotTrue, Sign::PotTrue),
    Shape::Both(Sign::NotPotTrue, Sign::NotPotTrue),
]);

impl Boolean {
    fn shape(&self, f: &Formula) -> Option<Shape> {
        f.sign().index().map(|i| self.0[i])
    }
}

impl Rule for Boolean {
    fn apply(&self, f: &Formula, _symbols: &mut SymbolGen) -> Expansion {
        let (g1, g2) = operands(f);
        let derive = |g: &Formula, s| g.resigned(s, f.knowledge(), None, f.prefix());

        match self.shape(f) {
            Some(Shape::Both(s1, s2)) => Expansion::Extend(vec![derive(g1, s1), derive(g2, s2)]),
            Some(Shape::Either(s1, s2)) => Expansion::Split(vec![derive(g1, s1)], vec![derive(g2, s2)]),
            None => Expansion::Terminal,
        }
    }

    fn splits(&self, f: &Formula) -> bool {
        matches!(self.shape(f), Some(Shape::Either(..)))
    }
}
