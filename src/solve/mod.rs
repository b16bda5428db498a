use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::formula::{Formula, SymbolGen};
use crate::model::Interpretation;

mod closure;
mod ions;
mod rules;

pub use closure::{Clash, Verdict};
pub use rules::{apply, is_branching, rule_for, Expansion, Rule};

/// How pending formulas are queued on a branch.
///
/// Formulas classified as branching are placed after all others, so that
/// every branch is split as late as possible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BranchingPolicy {
    /// A fixed list of connective/sign pairs. Never branching: the generic
    /// ion, and anything quantified is judged by its connective alone.
    #[default]
    SignTable,
    /// Branching exactly when the formula's rule yields two alternatives.
    RuleShape,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SolverConfig {
    pub branching: BranchingPolicy,
}

/// Counters for the latest run of the solver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Rule applications, terminal ones included.
    pub steps: usize,
    pub splits: usize,
    pub open: usize,
    pub closed: usize,
}

#[derive(Debug, Clone)]
struct Node {
    formula: Rc<Formula>,
    expanded: bool,
}

impl From<Formula> for Node {
    fn from(f: Formula) -> Self {
        let expanded = f.is_expanded();

        Self {
            formula: Rc::new(f),
            expanded,
        }
    }
}

/// One path through the tableau.
///
/// Cloning a branch copies its expansion markers but shares the formulas.
#[derive(Debug, Clone, Default)]
struct Branch {
    nodes: Vec<Node>,
}

impl Branch {
    /// Add derived formulas: non-branching ones ahead of everything already
    /// present, branching ones behind it.
    fn merge(&mut self, new: Vec<Formula>, policy: BranchingPolicy) {
        let (branching, plain): (Vec<_>, Vec<_>) = new.into_iter()
            .partition(|f| is_branching(f, policy));

        self.nodes.splice(0..0, plain.into_iter().map(Node::from));
        self.nodes.extend(branching.into_iter().map(Node::from));
    }

    /// The first formula not yet expanded.
    fn next_pending(&self) -> Option<usize> {
        self.nodes.iter().position(|n| !n.expanded)
    }

    fn formulas(&self) -> Vec<Rc<Formula>> {
        self.nodes.iter().map(|n| Rc::clone(&n.formula)).collect()
    }
}

/// Analytic tableau solver.
///
/// A solver owns the symbol generator, so justification labels keep
/// increasing across every branch (and every call) of one solver.
#[derive(Debug, Default)]
pub struct Solver {
    config: SolverConfig,
    symbols: SymbolGen,
    stats: Stats,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            symbols: SymbolGen::new(),
            stats: Stats::default(),
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Compute every interpretation of a set of signed formulas, one per open
    /// branch, in left-to-right branch order.
    ///
    /// An empty result means the formulas have no model.
    pub fn solve(&mut self, formulas: Vec<Formula>) -> Vec<Interpretation> {
        self.stats = Stats::default();

        let mut root = Branch::default();
        root.merge(formulas, self.config.branching);

        debug!("Solving {} premise(s) with {:?}", root.nodes.len(), self.config.branching);

        let models = self.expand(root);

        debug!(
            "Finished after {} step(s): {} split(s), {} open and {} closed branch(es)",
            self.stats.steps, self.stats.splits, self.stats.open, self.stats.closed
        );

        models
    }

    fn expand(&mut self, mut branch: Branch) -> Vec<Interpretation> {
        while let Some(i) = branch.next_pending() {
            branch.nodes[i].expanded = true;

            let f = Rc::clone(&branch.nodes[i].formula);
            let expansion = apply(&f, &mut self.symbols);

            self.stats.steps += 1;

            match expansion {
                Expansion::Terminal => continue,
                Expansion::Extend(l) => {
                    trace!("{f} => {}", render(&l));
                    branch.merge(l, self.config.branching);
                }
                Expansion::Split(l, r) => {
                    debug!("Splitting on {f}");
                    trace!("{f} => {} | {}", render(&l), render(&r));
                    self.stats.splits += 1;

                    let mut left = branch.clone();
                    left.merge(l, self.config.branching);
                    branch.merge(r, self.config.branching);

                    let mut models = self.expand(left);
                    models.extend(self.expand(branch));

                    return models
                }
            }
        }

        match closure::check(&branch.formulas()) {
            Verdict::Open(m) => {
                trace!("Open branch: {m}");
                self.stats.open += 1;
                vec![m]
            }
            Verdict::Closed(clash) => {
                debug!("Closed branch ({clash:?})");
                self.stats.closed += 1;
                vec![]
            }
        }
    }
}

fn render(l: &[Formula]) -> String {
    l.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use regex::Regex;

    use super::*;
    use crate::formula::*;
    use crate::model::ModelOrdering;
    use crate::parse::Document;

    macro_rules! solve {
        ($s:literal) => {
            solve!($s, BranchingPolicy::SignTable)
        };
        ($s:literal, $policy:expr) => {{
            let doc = Document::parse($s).expect("Failed to parse test premises");
            Solver::new(SolverConfig { branching: $policy }).solve(doc.into_formulas())
        }};
    }

    fn rendered(models: &[Interpretation]) -> Vec<String> {
        models.iter().map(ToString::to_string).collect()
    }

    /// Every literal of every model, independent of expansion order.
    ///
    /// Witness labels depend on the order symbols are minted in, so they are
    /// erased.
    fn canonical(models: &[Interpretation]) -> Vec<Vec<String>> {
        let label = Regex::new(r"j[0-9]+").unwrap();

        let mut out: Vec<Vec<String>> = models.iter()
            .map(|m| {
                let mut l: Vec<String> = [m.hard(), m.just(), m.soft()]
                    .into_iter()
                    .flatten()
                    .map(|f| label.replace_all(&f.to_string(), "j").into_owned())
                    .collect();
                l.sort();
                l.dedup();
                l
            })
            .collect();

        out.sort();
        out.dedup();
        out
    }

    #[test]
    fn empty_input_has_no_model() {
        assert!(Solver::default().solve(vec![]).is_empty());
    }

    #[test]
    fn single_atom() {
        assert_eq!(rendered(&solve!("a")), ["<{⊨ a}, {}, {}>"]);
    }

    #[test]
    fn disjunction_splits_left_first() {
        assert_eq!(
            rendered(&solve!("T a | b")),
            ["<{⊨ a}, {}, {}>", "<{⊨ b}, {}, {}>"]
        );
    }

    #[test]
    fn contradiction() {
        assert!(solve!("T a; NT a").is_empty());
        assert!(solve!("a & -a").is_empty());
        assert!(solve!("T False").is_empty());
        assert!(solve!("NPT bot(a)").is_empty());
    }

    #[test]
    fn disjunctive_syllogism() {
        assert_eq!(rendered(&solve!("T a | b; NT a")), ["<{⊭ a,⊨ b}, {}, {}>"]);
    }

    #[test]
    fn heart_ion() {
        let models = solve!("T *1(p, q)");

        assert_eq!(
            rendered(&models),
            ["<{}, {J ⊨ p}, {⊨₅ q}>", "<{}, {J ⊭ p}, {}>"]
        );
    }

    #[test]
    fn existential_witnesses_are_fresh() {
        let models = solve!("NT *3(p, q)");

        assert_eq!(rendered(&models), ["<{}, {j1 ⊫ p}, {⊭₅ q}>"]);
    }

    #[test]
    fn nogood_shorthand() {
        assert_eq!(rendered(&solve!("T *0(p, False)")), ["<{}, {J ⊯ p}, {}>"]);
        assert_eq!(rendered(&solve!("T *(p, False)")), ["<{}, {-* p}, {}>"]);
    }

    #[test]
    fn generic_justification_closes_against_hard_knowledge() {
        assert!(solve!("T *(p, False); T p").is_empty());
        assert_eq!(solve!("T *(p, False); NT p").len(), 1);
    }

    #[test]
    fn generic_ion() {
        let models = solve!("T *(p, q)");

        assert_eq!(
            rendered(&models),
            ["<{}, {+* p}, {⊨₅ q}>", "<{}, {-* p}, {}>"]
        );
    }

    #[test]
    fn justification_ordering_prefers_positive_justifications() {
        let models = solve!("T *1(p, q)");
        let o = ModelOrdering::new(&models);

        assert!(o.precedes_justification(0, 1));
        assert!(!o.precedes_justification(1, 0));

        let minimal = o.justification_minimal();
        assert_eq!(minimal.len(), 1);
        assert_eq!(minimal[0].to_string(), models[0].to_string());

        let minimal = o.warrant_minimal();
        assert_eq!(minimal.len(), 1);
        assert_eq!(minimal[0].to_string(), models[0].to_string());
    }

    #[test]
    fn hard_knowledge_contradicts_deeper_justification() {
        let models = solve!("T *1(bird, flies); T bird");

        assert_eq!(rendered(&models), ["<{⊨ bird}, {J ⊨ bird}, {⊨₅ flies}>"]);
    }

    #[test]
    fn implication_with_antecedent() {
        let models = solve!("T a -> b; T a");

        assert_eq!(rendered(&models), ["<{⊨ a,⊨ b}, {}, {}>"]);
    }

    #[test]
    fn symbols_increase_across_branches() {
        let mut solver = Solver::default();
        let doc = Document::parse("T ~*3(p, q) | ~*4(r, s)").unwrap();

        let models = solver.solve(doc.into_formulas());

        assert_eq!(
            rendered(&models),
            ["<{}, {j1 ⊫ p}, {⊭₅ q}>", "<{}, {j2 ⊨ r}, {⊭₅ s}>"]
        );
        assert_eq!(solver.stats().splits, 1);
        assert_eq!(solver.stats().open, 2);
    }

    #[test]
    fn non_branching_formulas_go_first() {
        // The conjunction is expanded before the disjunction splits, so the
        // closed right branch never duplicates its work.
        let mut solver = Solver::default();
        let doc = Document::parse("T a | b; T c & -b").unwrap();

        let models = solver.solve(doc.into_formulas());

        assert_eq!(rendered(&models), ["<{⊨ a,⊯ b,⊨ c}, {}, {}>"]);
        assert_eq!(solver.stats().splits, 1);
        assert_eq!(solver.stats().closed, 1);
    }

    #[test]
    fn splits_nested_in_ions() {
        // Each side of the outer split expands the inner generic ion on its
        // own, and the generic justifications it adds stay in the model.
        for policy in [BranchingPolicy::SignTable, BranchingPolicy::RuleShape] {
            assert_eq!(
                rendered(&solve!("T *5(a, *(a, a))", policy)),
                [
                    "<{}, {j1 ⊨ a,+* a}, {⊨₅ a}>",
                    "<{}, {j1 ⊨ a,-* a}, {}>",
                    "<{}, {J ⊯ a}, {}>",
                ]
            );

            assert_eq!(
                rendered(&solve!("PT (-(b | a) ! *(b, False))", policy)),
                ["<{⊭ a,⊭ b}, {}, {}>", "<{}, {+/* b}, {}>"]
            );
        }
    }

    #[test]
    fn stats_cover_the_latest_run() {
        let mut solver = Solver::default();

        solver.solve(Document::parse("T a | b; NT a").unwrap().into_formulas());
        let first = solver.stats();
        assert_eq!((first.splits, first.open, first.closed), (1, 1, 1));

        solver.solve(Document::parse("T a | b; NT a").unwrap().into_formulas());
        assert_eq!(solver.stats(), first);

        solver.solve(Document::parse("T a").unwrap().into_formulas());
        assert_eq!(solver.stats(), Stats { steps: 1, splits: 0, open: 1, closed: 0 });
    }

    #[test]
    fn rule_shape_policy() {
        let listed = solve!("PT a | b; T c", BranchingPolicy::SignTable);
        let shaped = solve!("PT a | b; T c", BranchingPolicy::RuleShape);

        assert_eq!(rendered(&listed), rendered(&shaped));
        assert_eq!(rendered(&shaped), ["<{⊫ a,⊨ c}, {}, {}>", "<{⊫ b,⊨ c}, {}, {}>"]);
    }

    fn arb_premise() -> impl Strategy<Value = Formula> {
        let sign = prop::sample::select(Sign::ALL.to_vec());
        let leaf = prop_oneof![
            4 => "[a-c]".prop_map(|s: String| Formula::atom(s)),
            1 => Just(Formula::atom("False")),
        ];

        let formula = leaf.prop_recursive(3, 16, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(Formula::neg),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::and(l, r)),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::or(l, r)),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::imp(l, r)),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::binary(BinaryOp::Bang, l, r)),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::ion(Ion::Generic, l, r)),
                (0..=Digit::MAX, inner.clone(), inner)
                    .prop_map(|(d, l, r)| Formula::ion(Ion::digit(d).unwrap(), l, r)),
            ]
        });

        (formula, sign).prop_map(|(f, s)| f.signed(s, Knowledge::Hard))
    }

    /// Swap the operands of every disjunction and conjunction.
    fn mirrored(f: &Formula) -> Formula {
        let g = match f.kind() {
            Kind::Atomic(name) => Formula::atom(name.clone()),
            Kind::Unary(op, g) => Formula::unary(*op, mirrored(g)),
            Kind::Binary(op @ (BinaryOp::Or | BinaryOp::And), l, r) => Formula::binary(*op, mirrored(r), mirrored(l)),
            Kind::Binary(op, l, r) => Formula::binary(*op, mirrored(l), mirrored(r)),
        };

        g.signed(f.sign(), f.knowledge())
    }

    proptest! {
        #[test]
        fn branch_order_does_not_matter(premises in prop::collection::vec(arb_premise(), 1..4)) {
            let swapped: Vec<_> = premises.iter().map(mirrored).collect();

            let models = Solver::default().solve(premises);
            let swapped = Solver::default().solve(swapped);

            prop_assert_eq!(canonical(&models), canonical(&swapped));
        }

        #[test]
        fn policies_agree_on_models(premises in prop::collection::vec(arb_premise(), 1..4)) {
            let listed = Solver::new(SolverConfig { branching: BranchingPolicy::SignTable })
                .solve(premises.clone());
            let shaped = Solver::new(SolverConfig { branching: BranchingPolicy::RuleShape })
                .solve(premises);

            prop_assert_eq!(canonical(&listed), canonical(&shaped));
        }

        #[test]
        fn models_are_consistent(premises in prop::collection::vec(arb_premise(), 1..4)) {
            let models = Solver::default().solve(premises);

            for m in &models {
                for (i, a) in m.hard().iter().enumerate() {
                    for b in &m.hard()[i + 1..] {
                        prop_assert!(!(a.same_shape(b) && a.sign().contradicts(b.sign())));
                    }
                }
            }
        }
    }
}
