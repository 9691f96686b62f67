use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, multispace0};
use nom::combinator::map;
use nom::multi::many0;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};

pub use ast::Expression;
pub use errors::SExpressionParsingError;

pub mod ast;
pub(crate) mod errors;

// A token is any run of characters up to whitespace or a paren. Relation ids,
// entity ids (m./g.), back-references (#k) and typed literals (value^^datatype)
// all fall out of this one rule since none of them may contain spaces.
fn parse_token(input: &str) -> IResult<&str, &str, SExpressionParsingError<'_>> {
    take_while1(|c: char| !c.is_whitespace() && c != '(' && c != ')')(input)
}

fn parse_application(input: &str) -> IResult<&str, Expression, SExpressionParsingError<'_>> {
    map(
        delimited(
            char('('),
            many0(preceded(multispace0, parse_expression)),
            preceded(multispace0, char(')')),
        ),
        Expression::Application,
    )
    .parse(input)
}

fn parse_expression(input: &str) -> IResult<&str, Expression, SExpressionParsingError<'_>> {
    alt((
        parse_application,
        map(parse_token, |token| Expression::Atom(token.to_string())),
    ))
    .parse(input)
}

/// Parse a complete Lisp logical form, requiring all input to be consumed.
pub fn parse_lisp(input: &str) -> Result<Expression, SExpressionParsingError<'_>> {
    match preceded(multispace0, parse_expression).parse(input) {
        Ok((remainder, expression)) => {
            let trimmed = remainder.trim();
            if !trimmed.is_empty() {
                return Err(SExpressionParsingError {
                    errors: vec![
                        (remainder, "Unexpected tokens after expression"),
                        (trimmed, "Unparsed input"),
                    ],
                });
            }
            Ok(expression)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e),
        Err(nom::Err::Incomplete(_)) => Err(SExpressionParsingError {
            errors: vec![(input, "Incomplete expression")],
        }),
    }
}
