use std::fmt;
use std::rc::Rc;

use crate::formula::{Formula, Knowledge};

mod ordering;

pub use ordering::ModelOrdering;

/// The literals of one open branch, partitioned by knowledge level.
///
/// Each part is sorted by variable name (ignoring case), with compound
/// generic justifications after every atom. Duplicates are kept; they are
/// only collapsed when rendering.
#[derive(Debug, Clone)]
pub struct Interpretation {
    hard: Vec<Rc<Formula>>,
    just: Vec<Rc<Formula>>,
    soft: Vec<Rc<Formula>>,
}

impl Interpretation {
    pub fn new(literals: impl IntoIterator<Item = Rc<Formula>>) -> Self {
        let mut hard = vec![];
        let mut just = vec![];
        let mut soft = vec![];

        for f in literals {
            match f.knowledge() {
                Knowledge::Hard => hard.push(f),
                Knowledge::Soft => soft.push(f),
                _ => just.push(f),
            }
        }

        for part in [&mut hard, &mut just, &mut soft] {
            part.sort_by_cached_key(|f| sort_key(f));
        }

        Self { hard, just, soft }
    }

    pub fn hard(&self) -> &[Rc<Formula>] {
        &self.hard
    }

    pub fn just(&self) -> &[Rc<Formula>] {
        &self.just
    }

    pub fn soft(&self) -> &[Rc<Formula>] {
        &self.soft
    }

    /// Hard literals, one per variable name.
    pub fn distinct_hard(&self) -> Vec<&Formula> {
        distinct_by(&self.hard, same_name)
    }

    /// Justifications, without adjacent signed duplicates.
    pub fn distinct_just(&self) -> Vec<&Formula> {
        distinct_by(&self.just, Formula::matches)
    }

    /// Soft literals, one per variable name.
    pub fn distinct_soft(&self) -> Vec<&Formula> {
        distinct_by(&self.soft, same_name)
    }

    /// The three parts as rendered strings, in the order hard, justification, soft.
    pub fn rendered(&self) -> [Vec<String>; 3] {
        [
            self.distinct_hard().into_iter().map(ToString::to_string).collect(),
            self.distinct_just().into_iter().map(render_just).collect(),
            self.distinct_soft().into_iter().map(ToString::to_string).collect(),
        ]
    }
}

fn sort_key(f: &Formula) -> (bool, String) {
    match f.name() {
        Some(s) => (false, s.to_lowercase()),
        None => (true, String::new()),
    }
}

fn same_name(f: &Formula, g: &Formula) -> bool {
    matches!((f.name(), g.name()), (Some(a), Some(b)) if a.eq_ignore_ascii_case(b))
}

/// Drop every element equal (under `eq`) to its predecessor in the sorted list.
fn distinct_by(l: &[Rc<Formula>], eq: impl Fn(&Formula, &Formula) -> bool) -> Vec<&Formula> {
    l.iter()
        .enumerate()
        .filter(|(i, f)| *i == 0 || !eq(f, &l[i - 1]))
        .map(|(_, f)| f.as_ref())
        .collect()
}

fn render_just(f: &Formula) -> String {
    if f.is_generic() {
        f.to_generic_string()
    } else {
        f.to_string()
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [hard, just, soft] = self.rendered();

        write!(f, "<{{{}}}, {{{}}}, {{{}}}>", hard.join(","), just.join(","), soft.join(","))
    }
}
