use log::debug;

use crate::config::CompilerOptions;
use crate::sexpr_parser::parse_lisp;

pub mod assembler;
pub mod clause_generator;
mod errors;
pub mod linearizer;
pub mod normalizer;
pub mod var_unifier;

pub use errors::SparqlQueryGeneratorError;
pub use normalizer::{binary_nesting, normalize};

use var_unifier::VariableUnifier;

/// Compile a Lisp logical form into a SPARQL query with default options.
pub fn compile(logical_form: &str) -> Result<String, SparqlQueryGeneratorError> {
    compile_with_options(logical_form, &CompilerOptions::default())
}

/// Full pipeline: normalize, parse, flatten superlative chains, linearize
/// into sub-formulas, generate clauses while unifying variables, assemble.
/// Pure function of its input; every failure is final (no partial output).
pub fn compile_with_options(
    logical_form: &str,
    options: &CompilerOptions,
) -> Result<String, SparqlQueryGeneratorError> {
    let normalized = normalize(logical_form)?;
    debug!("normalized logical form: {}", normalized);

    let expression = parse_lisp(&normalized)
        .map_err(|e| SparqlQueryGeneratorError::MalformedExpression(e.to_string()))?;
    let expression = normalizer::flatten_superlative(expression);

    let sub_formulas = linearizer::linearize(&expression)?;
    debug!("linearized into {} sub-formulas", sub_formulas.len());
    let question_var = sub_formulas.len() - 1;

    let mut unifier = VariableUnifier::new();
    let generated = clause_generator::generate(&sub_formulas, &mut unifier, options)?;

    Ok(assembler::assemble(generated, question_var, &unifier, options))
}
