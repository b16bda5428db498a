#![no_main]

extern crate ionic;

use libfuzzer_sys::fuzz_target;
use libfuzzer_sys::arbitrary;

use ionic::*;

#[derive(Debug, arbitrary::Arbitrary)]
struct ArbPremises<'a> {
    inner: Vec<&'a str>,
    rule_shape: bool,
}

fuzz_target!(|data: ArbPremises| {
    // Branch count grows exponentially with input size.
    if data.inner.len() > 6 || data.inner.iter().map(|s| s.len()).sum::<usize>() > 256 {
        return;
    }

    let Ok(doc) = Document::parse(&data.inner.join("\n")) else {
        return;
    };

    let branching = if data.rule_shape {
        BranchingPolicy::RuleShape
    } else {
        BranchingPolicy::SignTable
    };

    let models = Solver::new(SolverConfig { branching }).solve(doc.into_formulas());
    let ordering = ModelOrdering::new(&models);

    assert!(models.is_empty() || !ordering.justification_minimal().is_empty());
    assert!(models.is_empty() || !ordering.warrant_minimal().is_empty());
});
