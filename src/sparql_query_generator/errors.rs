use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SparqlQueryGeneratorError {
    #[error("Malformed logical form: {0}")]
    MalformedExpression(String),
    #[error(
        "Back-reference #{reference} in sub-formula {formula} does not resolve (only earlier sub-formula ids are valid)"
    )]
    UnresolvedVariableReference { reference: usize, formula: usize },
    #[error(
        "Unsupported operator '{0}' (allowed: JOIN, AND, ARGMAX, ARGMIN, COUNT, TC, le, lt, ge, gt)"
    )]
    UnsupportedOperator(String),
    #[error("Invalid typed literal '{0}' (no datatype local name after '^^')")]
    InvalidLiteralFormat(String),
    #[error("COUNT must be the outermost operator (sub-formula {0} already carries a unification)")]
    CountNotOutermost(usize),
}
