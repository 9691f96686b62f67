use std::fmt;

use super::errors::SparqlQueryGeneratorError;
use crate::sexpr_parser::Expression;

/// One operand of a linearized sub-formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// A relation id, entity id, typed literal, class name, or `#k`
    /// back-reference to an earlier sub-formula.
    Token(String),
    /// A relation wrapped in `(R ...)`. Reverse relations are never
    /// linearized on their own; they travel with their parent formula.
    Reverse(String),
}

impl Arg {
    /// The earlier sub-formula this operand points at, for `#k` tokens.
    pub fn back_reference(&self) -> Option<usize> {
        match self {
            Arg::Token(token) => token.strip_prefix('#').and_then(|k| k.parse().ok()),
            Arg::Reverse(_) => None,
        }
    }

    /// Whether this operand is a KB entity id (`m.` / `g.` prefix).
    pub fn is_entity(&self) -> bool {
        matches!(self, Arg::Token(token) if token.starts_with("m.") || token.starts_with("g."))
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Arg::Token(token) => Some(token),
            Arg::Reverse(_) => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Token(token) => f.write_str(token),
            Arg::Reverse(relation) => write!(f, "(R {})", relation),
        }
    }
}

/// A flattened formula in the three-address form the clause generator
/// consumes. Its id is its position in the linearized sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubFormula {
    pub operator: String,
    pub args: Vec<Arg>,
}

/// Convert a nested expression into an ordered arena of sub-formulas,
/// leaves first. Each compound child is replaced by a `#k` back-reference to
/// the sub-formula it produced, so the final element is always the root
/// (question) formula and every reference points backwards.
pub fn linearize(expression: &Expression) -> Result<Vec<SubFormula>, SparqlQueryGeneratorError> {
    let mut sub_formulas = Vec::new();
    linearize_into(expression, &mut sub_formulas)?;
    Ok(sub_formulas)
}

// Returns the id assigned to `expression` itself. The running id counter is
// simply the arena length, threaded through the recursion explicitly.
fn linearize_into(
    expression: &Expression,
    out: &mut Vec<SubFormula>,
) -> Result<usize, SparqlQueryGeneratorError> {
    let items = match expression {
        Expression::Application(items) if !items.is_empty() => items,
        Expression::Application(_) => {
            return Err(SparqlQueryGeneratorError::MalformedExpression(
                "empty application ()".to_string(),
            ))
        }
        Expression::Atom(token) => {
            return Err(SparqlQueryGeneratorError::MalformedExpression(format!(
                "expected an application, got bare token '{}'",
                token
            )))
        }
    };
    let operator = items[0]
        .atom()
        .ok_or_else(|| {
            SparqlQueryGeneratorError::MalformedExpression(format!(
                "operator position holds a compound expression: {}",
                items[0]
            ))
        })?
        .to_string();

    let mut args = Vec::with_capacity(items.len() - 1);
    for child in &items[1..] {
        let arg = match child {
            Expression::Atom(token) => Arg::Token(token.clone()),
            Expression::Application(inner) if inner.first().and_then(Expression::atom) == Some("R") => {
                match inner.as_slice() {
                    [_, Expression::Atom(relation)] => Arg::Reverse(relation.clone()),
                    _ => {
                        return Err(SparqlQueryGeneratorError::MalformedExpression(format!(
                            "R must wrap exactly one relation token: {}",
                            child
                        )))
                    }
                }
            }
            nested => {
                let id = linearize_into(nested, out)?;
                Arg::Token(format!("#{}", id))
            }
        };
        args.push(arg);
    }

    out.push(SubFormula { operator, args });
    Ok(out.len() - 1)
}
