//! Library module. Exports the parser, solver and model orderings for the
//! command-line front end and for fuzz testing.
pub mod config;
pub mod formula;
pub mod model;
pub mod parse;
pub mod report;
pub mod solve;

pub use formula::{BinaryOp, Digit, Formula, Ion, JustSymbol, Kind, Knowledge, Quantifier, Sign, SymbolGen, UnaryOp};
pub use model::{Interpretation, ModelOrdering};
pub use parse::{parse_formula, parse_sentence, Document, ParseError, SentenceError, SentenceErrors};
pub use solve::{BranchingPolicy, Solver, SolverConfig};
