use std::fmt;

/// A parsed s-expression: either an atomic token or an application of the
/// first element to the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Atom(String),
    Application(Vec<Expression>),
}

impl Expression {
    /// The token, when this expression is atomic.
    pub fn atom(&self) -> Option<&str> {
        match self {
            Expression::Atom(token) => Some(token),
            Expression::Application(_) => None,
        }
    }

    /// The operator token of an application, when its head is atomic.
    pub fn head(&self) -> Option<&str> {
        match self {
            Expression::Application(items) => items.first().and_then(Expression::atom),
            Expression::Atom(_) => None,
        }
    }

    /// Serialize back to the single-space Lisp text form. Inverse of parsing:
    /// `parse_lisp(e.to_lisp()) == e` for every well-formed expression.
    pub fn to_lisp(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Atom(token) => f.write_str(token),
            Expression::Application(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}
