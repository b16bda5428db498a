use std::rc::Rc;

use crate::formula::Formula;

use super::Interpretation;

/// Preference orderings over the models of one solve.
///
/// Each model gets a positive and a negative justification basis: its
/// justifications split by sign, plus every hard literal whose shape is
/// justified (with the same polarity) in any model.
pub struct ModelOrdering<'a> {
    models: &'a [Interpretation],
    pos: Vec<Vec<Rc<Formula>>>,
    neg: Vec<Vec<Rc<Formula>>>,
}

impl<'a> ModelOrdering<'a> {
    pub fn new(models: &'a [Interpretation]) -> Self {
        let (mut pos, mut neg): (Vec<Vec<Rc<Formula>>>, Vec<Vec<Rc<Formula>>>) = models.iter()
            .map(|m| m.just().iter().cloned().partition(|f| f.sign().is_positive()))
            .unzip();

        for (i, m) in models.iter().enumerate() {
            for f in m.hard() {
                let bases = if f.sign().is_positive() { &mut pos } else { &mut neg };

                if bases.iter().flatten().any(|g| f.same_shape(g)) {
                    bases[i].push(Rc::clone(f));
                }
            }
        }

        Self { models, pos, neg }
    }

    /// Whether model `i` precedes model `j` in the justification ordering:
    /// `i` justifies at least the positive, and at most the negative, of what
    /// `j` justifies.
    pub fn precedes_justification(&self, i: usize, j: usize) -> bool {
        self.pos[j].iter().all(|f| is_member(f, &self.pos[i]))
            && self.neg[i].iter().all(|f| is_member(f, &self.neg[j]))
    }

    /// Whether model `i` precedes model `j` in the warrant ordering.
    pub fn precedes_warrant(&self, i: usize, j: usize) -> bool {
        let (mi, mj) = (&self.models[i], &self.models[j]);

        self.precedes_justification(i, j)
            && mi.hard().iter().all(|f| is_signed_member(f, mj.hard()))
            && mj.soft().iter().all(|f| is_signed_member(f, mi.soft()))
    }

    pub fn justification_minimal(&self) -> Vec<&'a Interpretation> {
        self.minimal(|i, j| self.precedes_justification(i, j))
    }

    pub fn warrant_minimal(&self) -> Vec<&'a Interpretation> {
        self.minimal(|i, j| self.precedes_warrant(i, j))
    }

    /// Models not strictly preceded by any other, in input order.
    fn minimal(&self, precedes: impl Fn(usize, usize) -> bool) -> Vec<&'a Interpretation> {
        self.minimal_indices(precedes)
            .into_iter()
            .map(|i| &self.models[i])
            .collect()
    }

    fn minimal_indices(&self, precedes: impl Fn(usize, usize) -> bool) -> Vec<usize> {
        let n = self.models.len();

        (0..n)
            .filter(|&i| !(0..n).any(|j| j != i && precedes(j, i) && !precedes(i, j)))
            .collect()
    }
}

fn is_member(f: &Formula, l: &[Rc<Formula>]) -> bool {
    l.iter().any(|g| f.same_shape(g))
}

fn is_signed_member(f: &Formula, l: &[Rc<Formula>]) -> bool {
    l.iter().any(|g| f.same_signed_shape(g))
}
