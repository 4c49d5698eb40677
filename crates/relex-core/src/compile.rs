//! Orchestration of the compile pipeline: rules are joined into one
//! expression `(p₀)#₀ | (p₁)#₁ | …` where each `#ᵢ` is a rule marker
//! carrying the rule's action, then driven through postfix, AST, position
//! calculus, subset construction, minimization and the dead-state sweep.

use log::{debug, trace};

use crate::dfa::positions::PositionTable;
use crate::dfa::{build, minimize, Dfa};
use crate::error::{CompileError, SpecError};
use crate::regex::{ast, postfix, tokenize, Op, RawSymbol};
use crate::spec::Rule;

/// Compiles an ordered rule list into the minimized recognizer.
pub fn compile(rules: &[Rule]) -> Result<Dfa, CompileError> {
    if rules.is_empty() {
        return Err(SpecError::EmptyRules.into());
    }

    let raw = combine(rules);
    let postfix_expr = postfix::to_postfix(&raw)?;
    trace!("postfix: {}", postfix::render(&postfix_expr));

    let ast = ast::from_postfix(&postfix_expr)?;
    let table = PositionTable::compute(&ast);
    trace!("position table:\n{table}");

    let dfa = build::build(&table);
    debug!(
        "subset construction: {} states over {} input symbols",
        dfa.len(),
        table.alphabet().len()
    );

    let mut dfa = minimize::minimize(&dfa);
    debug!("minimized: {} states", dfa.len());

    let removed = dfa.remove_dead_states();
    if removed > 0 {
        debug!("removed {removed} dead states");
    }
    trace!("dfa:\n{dfa}");

    Ok(dfa)
}

/// Joins every rule into one raw symbol stream, each pattern parenthesized
/// and tagged with its marker.
fn combine(rules: &[Rule]) -> Vec<RawSymbol> {
    let mut raw = Vec::new();
    for (index, rule) in rules.iter().enumerate() {
        if index > 0 {
            raw.push(RawSymbol::Op(Op::Alt));
        }
        raw.push(RawSymbol::Op(Op::LParen));
        raw.extend(tokenize(&rule.pattern));
        raw.push(RawSymbol::Op(Op::RParen));
        raw.push(RawSymbol::Marker {
            rule: index,
            action: rule.action.clone(),
        });
    }
    raw
}
