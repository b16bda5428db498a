use std::rc::Rc;

use tracing::trace;

use crate::formula::*;
use crate::model::Interpretation;

/// Why a branch closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clash {
    /// The branch holds no formulas at all.
    Empty,
    /// `True` or `False` carries a sign it can never have.
    Constant,
    /// `bot(..)` signed not potentially true.
    Bottom,
    /// Two atoms with the same name, compatible prefixes and contradicting signs.
    Atoms,
    /// A hard rank-0 formula against a generic justification of the same shape.
    Grounded,
    /// A hard rank-0 formula against a generic justification of its negation.
    GroundedNegation,
    /// Two generic justifications of the same shape with contradicting signs.
    Generic,
    /// A true generic conjunction against a conjunct that is not potentially true.
    Conjunct,
    /// A generic implication against a conflicting generic consequent.
    Consequent,
}

#[derive(Debug)]
pub enum Verdict {
    Open(Interpretation),
    Closed(Clash),
}

/// Decide whether a fully expanded branch is closed, reading off its
/// interpretation when it is not.
pub fn check(branch: &[Rc<Formula>]) -> Verdict {
    match clash(branch) {
        Err(clash) => Verdict::Closed(clash),
        Ok(atoms) => Verdict::Open(Interpretation::new(atoms)),
    }
}

fn clash(branch: &[Rc<Formula>]) -> Result<Vec<Rc<Formula>>, Clash> {
    if branch.is_empty() {
        return Err(Clash::Empty)
    }

    let mut atoms = vec![];

    for f in branch {
        if f.name().is_some() && f.quantifier() == Quantifier::None {
            if violates_constant(f) {
                return Err(Clash::Constant)
            }

            if !is_constant(f) {
                atoms.push(Rc::clone(f));
            }
        } else if f.unary_op() == Some(UnaryOp::Bot) && f.sign() == Sign::NotPotTrue {
            return Err(Clash::Bottom)
        }
    }

    if let Some((a1, a2)) = clashing_atoms(&atoms) {
        trace!("Atoms {a1} and {a2} clash");
        return Err(Clash::Atoms)
    }

    if branch.iter().any(|f| violates_constant(f)) {
        return Err(Clash::Constant)
    }

    for (i, f1) in branch.iter().enumerate() {
        for (j, f2) in branch.iter().enumerate() {
            if i == j {
                continue;
            }

            if let Some(clash) = generic_clash(f1, f2) {
                trace!("{f1} and {} clash ({clash:?})", f2.to_generic_string());
                return Err(clash)
            }
        }
    }

    atoms.extend(
        branch.iter()
            .filter(|f| f.is_generic() && !is_constant(f))
            .cloned()
    );

    Ok(atoms)
}

fn is_constant(f: &Formula) -> bool {
    f.is_atom("True") || f.is_atom("False")
}

fn violates_constant(f: &Formula) -> bool {
    use Sign::*;

    (f.is_atom("False") && !matches!(f.sign(), NotTrue | NotPotTrue))
        || (f.is_atom("True") && !matches!(f.sign(), True | PotTrue))
}

/// The first ordered pair of same-named atoms whose signs contradict under
/// compatible prefixes.
fn clashing_atoms(atoms: &[Rc<Formula>]) -> Option<(&Formula, &Formula)> {
    for (i, a1) in atoms.iter().enumerate() {
        for (j, a2) in atoms.iter().enumerate() {
            if i == j || !a1.same_shape(a2) || !a1.sign().contradicts(a2.sign()) {
                continue;
            }

            let comparable = if prefix_matches(a1.prefix(), a2.prefix()) {
                true
            } else if prefix_extends(a2.prefix(), a1.prefix()) {
                // Knowledge justified deeper only overrides soft knowledge
                // when it is itself soft.
                a1.knowledge() != Knowledge::Soft || a2.knowledge() == Knowledge::Soft
            } else {
                false
            };

            if comparable {
                return Some((&**a1, &**a2))
            }
        }
    }

    None
}

/// Equal rank and shape.
fn same(f: &Formula, g: &Formula) -> bool {
    f.rank() == g.rank() && f.same_shape(g)
}

fn generic_clash(f1: &Formula, f2: &Formula) -> Option<Clash> {
    use Sign::*;

    let (s1, s2) = (f1.sign(), f2.sign());
    let grounded = f1.knowledge() == Knowledge::Hard && f1.rank() == 0;

    if grounded && f2.is_generic() {
        if same(f1, f2) {
            return s1.contradicts(s2).then_some(Clash::Grounded)
        }

        if let Kind::Unary(UnaryOp::Neg, g) = f2.kind() {
            if same(f1, g) {
                let clash = matches!((s1, s2), (NotPotTrue, NotPotTrue | NotTrue) | (True, True | PotTrue));
                return clash.then_some(Clash::GroundedNegation)
            }
        }

        return None
    }

    if !(f1.is_generic() && f2.is_generic()) {
        return None
    }

    if same(f1, f2) {
        return s1.contradicts(s2).then_some(Clash::Generic)
    }

    match f1.kind() {
        Kind::Binary(BinaryOp::And, l, r) if same(l, f2) || same(r, f2) => {
            (s1 == True && s2 == NotPotTrue).then_some(Clash::Conjunct)
        }
        Kind::Binary(BinaryOp::Imp, _, r) if same(r, f2) => {
            matches!((s1, s2), (NotPotTrue, PotTrue) | (NotTrue, True) | (NotPotTrue, True))
                .then_some(Clash::Consequent)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, sign: Sign, knowledge: Knowledge, prefix: &[JustSymbol]) -> Rc<Formula> {
        Rc::new(Formula::atom(name).resigned(sign, knowledge, Some(Quantifier::None), prefix))
    }

    fn generic(f: Formula, sign: Sign) -> Rc<Formula> {
        Rc::new(f.resigned(sign, Knowledge::Just, Some(Quantifier::GenJust), &[]).settled())
    }

    fn closed_by(branch: &[Rc<Formula>]) -> Option<Clash> {
        match check(branch) {
            Verdict::Closed(c) => Some(c),
            Verdict::Open(_) => None,
        }
    }

    #[test]
    fn empty_branch_is_closed() {
        assert_eq!(closed_by(&[]), Some(Clash::Empty));
    }

    #[test]
    fn constants() {
        use Sign::*;

        assert_eq!(closed_by(&[atom("false", True, Knowledge::Hard, &[])]), Some(Clash::Constant));
        assert_eq!(closed_by(&[atom("True", NotPotTrue, Knowledge::Hard, &[])]), Some(Clash::Constant));
        assert_eq!(closed_by(&[atom("False", NotTrue, Knowledge::Hard, &[])]), None);

        let Verdict::Open(m) = check(&[atom("TRUE", PotTrue, Knowledge::Hard, &[])]) else {
            panic!("A potentially true constant is consistent")
        };
        assert!(m.hard().is_empty());
    }

    #[test]
    fn bottom() {
        let f = Rc::new(Formula::unary(UnaryOp::Bot, Formula::atom("a")).signed(Sign::NotPotTrue, Knowledge::Hard));
        assert_eq!(closed_by(&[f]), Some(Clash::Bottom));
    }

    #[test]
    fn atoms() {
        use Sign::*;
        let hard = Knowledge::Hard;

        assert_eq!(closed_by(&[atom("a", True, hard, &[]), atom("A", NotTrue, hard, &[])]), Some(Clash::Atoms));
        assert_eq!(closed_by(&[atom("a", True, hard, &[]), atom("a", NotPotTrue, hard, &[])]), Some(Clash::Atoms));
        assert_eq!(closed_by(&[atom("a", NotTrue, hard, &[]), atom("a", PotTrue, hard, &[])]), None);
        assert_eq!(closed_by(&[atom("a", True, hard, &[]), atom("b", NotTrue, hard, &[])]), None);
    }

    #[test]
    fn atoms_under_prefixes() {
        use Sign::*;

        let mut symbols = SymbolGen::new();
        let j1 = symbols.fresh(0);
        let j2 = symbols.fresh(0);
        let v = JustSymbol::variable(0);

        // Distinct witnesses never unify.
        assert_eq!(
            closed_by(&[atom("a", True, Knowledge::Just, &[j1]), atom("a", NotTrue, Knowledge::Just, &[j2])]),
            None
        );

        // A variable unifies with any witness of its rank.
        assert_eq!(
            closed_by(&[atom("a", True, Knowledge::Just, &[v]), atom("a", NotTrue, Knowledge::Just, &[j1])]),
            Some(Clash::Atoms)
        );

        // Soft knowledge is only contradicted by deeper soft knowledge.
        assert_eq!(
            closed_by(&[atom("a", True, Knowledge::Soft, &[]), atom("a", NotTrue, Knowledge::Just, &[j1])]),
            None
        );
        assert_eq!(
            closed_by(&[atom("a", True, Knowledge::Soft, &[]), atom("a", NotTrue, Knowledge::Soft, &[j1])]),
            Some(Clash::Atoms)
        );
        assert_eq!(
            closed_by(&[atom("a", True, Knowledge::Hard, &[]), atom("a", NotTrue, Knowledge::Just, &[j1])]),
            Some(Clash::Atoms)
        );
    }

    #[test]
    fn quantified_atoms_are_ignored() {
        let f = Rc::new(Formula::atom("a").resigned(Sign::True, Knowledge::Just, Some(Quantifier::Universal), &[]));
        let g = atom("a", Sign::NotTrue, Knowledge::Hard, &[]);

        assert_eq!(closed_by(&[f, g]), None);
    }

    #[test]
    fn grounded_against_generic() {
        use Sign::*;

        let p = Formula::atom("p");

        assert_eq!(
            closed_by(&[atom("p", True, Knowledge::Hard, &[]), generic(p.clone(), NotTrue)]),
            Some(Clash::Grounded)
        );

        assert_eq!(
            closed_by(&[atom("p", True, Knowledge::Hard, &[]), generic(Formula::neg(p.clone()), PotTrue)]),
            Some(Clash::GroundedNegation)
        );

        assert_eq!(
            closed_by(&[atom("p", NotPotTrue, Knowledge::Hard, &[]), generic(Formula::neg(p.clone()), NotTrue)]),
            Some(Clash::GroundedNegation)
        );

        assert_eq!(
            closed_by(&[atom("p", NotTrue, Knowledge::Hard, &[]), generic(Formula::neg(p), NotTrue)]),
            None
        );
    }

    #[test]
    fn generic_against_generic() {
        use Sign::*;

        let p = || Formula::atom("p");
        let q = || Formula::atom("q");

        assert_eq!(closed_by(&[generic(p(), PotTrue), generic(p(), NotPotTrue)]), Some(Clash::Generic));
        assert_eq!(closed_by(&[generic(p(), PotTrue), generic(p(), True)]), None);

        assert_eq!(
            closed_by(&[generic(Formula::and(p(), q()), True), generic(q(), NotPotTrue)]),
            Some(Clash::Conjunct)
        );

        assert_eq!(
            closed_by(&[generic(Formula::imp(p(), q()), NotTrue), generic(q(), True)]),
            Some(Clash::Consequent)
        );
        assert_eq!(
            closed_by(&[generic(Formula::imp(p(), q()), True), generic(q(), True)]),
            None
        );
    }

    #[test]
    fn open_branch_collects_atoms_and_generics() {
        use Sign::*;

        let branch = [
            Rc::new(Formula::and(Formula::atom("a"), Formula::atom("b")).signed(True, Knowledge::Hard).settled()),
            atom("b", True, Knowledge::Hard, &[]),
            atom("a", True, Knowledge::Hard, &[]),
            generic(Formula::atom("p"), NotPotTrue),
        ];

        let Verdict::Open(m) = check(&branch) else {
            panic!("Branch should be open")
        };

        assert_eq!(m.hard().len(), 2);
        assert_eq!(m.just().len(), 1);
        assert!(m.soft().is_empty());
    }
}
