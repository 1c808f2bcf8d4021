use super::{
    Error,
    Expression,
    Operator,
    Program,
};
use super::define;

use std::cmp::Ordering;
use std::fmt;

use nom::{
    IResult,
    Parser,
    character::complete::{
        digit1,
        multispace0,
    },
    bytes::complete::tag,
    branch::alt,
    combinator::{
        eof,
        map,
        map_res,
        opt,
        recognize,
    },
    error::{
        context,
        ContextError,
        ErrorKind,
        FromExternalError,
        ParseError as NomParseError,
    },
    sequence::{
        pair,
        preceded,
        terminated,
    },
};

pub type ParseResult<'a, T> = IResult<&'a str, T, GrammarError<'a>>;

/// Why a rule did not match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expectation {
    /// Labels of the tokens that would have been accepted at that point.
    Expected(Vec<&'static str>),
    NumberOutOfRange,
    UnknownOperator(String),
    /// More than `define::MAX_DEPTH` lists open at once.
    TooDeep,
}

/// Error type threaded through the combinators.
///
/// Alternatives that fail keep the error that got furthest into the input;
/// alternatives failing at the same place merge their expected tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarError<'a> {
    pub input: &'a str,
    pub expectation: Expectation,
}

impl<'a> GrammarError<'a> {
    pub fn expected(input: &'a str, labels: Vec<&'static str>) -> Self {
        GrammarError { input, expectation: Expectation::Expected(labels) }
    }

    fn is_unlabelled(&self) -> bool {
        matches!(&self.expectation, Expectation::Expected(labels) if labels.is_empty())
    }
}

impl<'a> NomParseError<&'a str> for GrammarError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        GrammarError::expected(input, Vec::new())
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn or(self, other: Self) -> Self {
        // Less remaining input means the failure happened further along.
        match self.input.len().cmp(&other.input.len()) {
            Ordering::Less => self,
            Ordering::Greater => other,
            Ordering::Equal => match (self.expectation, other.expectation) {
                (Expectation::Expected(mut labels), Expectation::Expected(more)) => {
                    for label in more {
                        if !labels.contains(&label) {
                            labels.push(label);
                        }
                    }
                    GrammarError::expected(self.input, labels)
                },
                (Expectation::Expected(_), expectation) | (expectation, _) => {
                    GrammarError { input: self.input, expectation }
                },
            },
        }
    }
}

impl<'a> ContextError<&'a str> for GrammarError<'a> {
    fn add_context(input: &'a str, label: &'static str, other: Self) -> Self {
        if other.is_unlabelled() {
            GrammarError::expected(input, vec![label])
        } else {
            other
        }
    }
}

impl<'a> FromExternalError<&'a str, Error> for GrammarError<'a> {
    fn from_external_error(input: &'a str, _kind: ErrorKind, e: Error) -> Self {
        let expectation = match e {
            Error::UnknownOperator(symbol) => Expectation::UnknownOperator(symbol),
            _ => Expectation::Expected(Vec::new()),
        };
        GrammarError { input, expectation }
    }
}

/// A failed parse of a whole line, located in the source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub source: String,
    pub line: usize,
    pub column: usize,
    /// `None` when the failure is at end of input.
    pub found: Option<char>,
    pub expectation: Expectation,
}

impl ParseError {
    fn new(source: &str, input: &str, error: GrammarError<'_>) -> Self {
        let offset = input.len() - error.input.len();
        let consumed = &input[..offset];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        ParseError {
            source: source.to_owned(),
            line,
            column,
            found: error.input.chars().next(),
            expectation: error.expectation,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: error: ", self.source, self.line, self.column)?;
        match &self.expectation {
            Expectation::Expected(labels) => match labels.split_last() {
                None => f.write_str("unexpected input")?,
                Some((last, [])) => write!(f, "expected {}", last)?,
                Some((last, init)) => write!(f, "expected {} or {}", init.join(", "), last)?,
            },
            Expectation::NumberOutOfRange => f.write_str("number does not fit in 64 bits")?,
            Expectation::UnknownOperator(symbol) => write!(f, "unknown operator '{}'", symbol)?,
            Expectation::TooDeep => {
                write!(f, "expressions nested deeper than {} levels", define::MAX_DEPTH)?
            },
        }
        match self.found {
            Some(c) => write!(f, " at '{}'", c),
            None => f.write_str(" at end of input"),
        }
    }
}

impl std::error::Error for ParseError {}

pub fn program_all_consuming(source: &str, input: &str) -> Result<Program, ParseError> {
    match program(input) {
        Ok((_, program)) => Ok(program),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError::new(source, input, e)),
        Err(nom::Err::Incomplete(_)) => {
            let end = &input[input.len()..];
            Err(ParseError::new(source, input, GrammarError::expected(end, Vec::new())))
        },
    }
}

/// `lispy : /^/ <operator> <expr>+ /$/ | /^/ <expr> /$/`
pub fn program(s: &str) -> ParseResult<'_, Program> {
    map(
        terminated(
            alt((
                map(
                    pair(operator, operands(0, end_of_input)),
                    |(operator, operands)| Expression::apply(operator, operands),
                ),
                expression,
            )),
            end_of_input,
        ),
        |expression| Program { expression },
    )(s)
}

/// `expr : <number> | '(' <operator> <expr>+ ')'`
pub fn expression(s: &str) -> ParseResult<'_, Expression> {
    nested_expression(s, 0)
}

fn nested_expression<'a>(s: &'a str, depth: usize) -> ParseResult<'a, Expression> {
    alt((
        number,
        move |s: &'a str| list(s, depth),
    ))(s)
}

/// `depth` counts the lists already open around this one.
pub fn list(s: &str, depth: usize) -> ParseResult<'_, Expression> {
    let (rest, _) = symbol("'('", tag(define::LEFT_PARENTHESIS))(s)?;
    if depth >= define::MAX_DEPTH {
        let start = &s[s.len() - rest.len() - define::LEFT_PARENTHESIS.len()..];
        return Err(nom::Err::Failure(GrammarError {
            input: start,
            expectation: Expectation::TooDeep,
        }));
    }
    map(
        terminated(
            pair(operator, operands(depth + 1, right_parenthesis)),
            right_parenthesis,
        ),
        |(operator, operands)| Expression::apply(operator, operands),
    )(rest)
}

/// `number : /-?[0-9]+/`
pub fn number(s: &str) -> ParseResult<'_, Expression> {
    let (rest, literal) = symbol(
        define::NODE_NUMBER,
        recognize(pair(opt(tag(define::NEGATIVE_SIGN)), digit1)),
    )(s)?;
    match literal.parse::<i64>() {
        Ok(number) => Ok((rest, Expression::Number(number))),
        // Recoverable, so a top-level `-9223372036854775808` can still be
        // read as one literal rather than `-` applied to an overflowing one.
        Err(_) => {
            let start = s.trim_start_matches(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
            Err(nom::Err::Error(GrammarError {
                input: start,
                expectation: Expectation::NumberOutOfRange,
            }))
        },
    }
}

pub fn operator(s: &str) -> ParseResult<'_, Operator> {
    preceded(
        multispace0,
        map_res(
            recognize(alt((
                context("'+'", tag(define::ADD)),
                context("'-'", tag(define::SUB)),
                context("'*'", tag(define::MUL)),
                context("'/'", tag(define::DIV)),
                context("'%'", tag(define::REM)),
                context("'^'", tag(define::POW)),
                context("\"min\"", tag(define::MIN)),
                context("\"max\"", tag(define::MAX)),
            ))),
            |symbol: &str| symbol.parse::<Operator>(),
        ),
    )(s)
}

fn right_parenthesis(s: &str) -> ParseResult<'_, &str> {
    symbol("')'", tag(define::RIGHT_PARENTHESIS))(s)
}

fn end_of_input(s: &str) -> ParseResult<'_, &str> {
    symbol("end of input", eof)(s)
}

/// Skips leading whitespace and labels the token for error reporting.
fn symbol<'a, O, F>(label: &'static str, parser: F) -> impl FnMut(&'a str) -> ParseResult<'a, O>
where
    F: Parser<&'a str, O, GrammarError<'a>>,
{
    preceded(multispace0, context(label, parser))
}

/// `<expr>+` up to (not including) `close`.
///
/// When an operand fails to parse the error also lists what `close` expected,
/// so an unterminated list reports both.
fn operands<'a, O, F>(
    depth: usize,
    mut close: F,
) -> impl FnMut(&'a str) -> ParseResult<'a, Vec<Expression>>
where
    F: Parser<&'a str, O, GrammarError<'a>>,
{
    move |s: &'a str| {
        let (mut rest, first) = nested_expression(s, depth)?;
        let mut operands = vec![first];
        loop {
            match nested_expression(rest, depth) {
                Ok((remaining, operand)) => {
                    operands.push(operand);
                    rest = remaining;
                },
                Err(nom::Err::Error(e)) => {
                    return match close.parse(rest) {
                        Ok(_) => Ok((rest, operands)),
                        Err(nom::Err::Error(other)) => Err(nom::Err::Error(e.or(other))),
                        Err(err) => Err(err),
                    };
                },
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn num(n: i64) -> Expression {
        Expression::Number(n)
    }

    fn parse(input: &str) -> Result<Program, ParseError> {
        program_all_consuming(define::SOURCE_STDIN, input)
    }

    #[test]
    fn top_level_without_parenthesis() {
        assert_eq!(
            parse("+ 1 2").unwrap(),
            Program { expression: Expression::apply(Operator::Add, vec![num(1), num(2)]) }
        );
        assert_eq!(
            parse("max 5 3 8").unwrap(),
            Program { expression: Expression::apply(Operator::Max, vec![num(5), num(3), num(8)]) }
        );
    }

    #[test]
    fn top_level_bare_expression() {
        assert_eq!(
            parse("( + 1 2 )").unwrap(),
            Program { expression: Expression::apply(Operator::Add, vec![num(1), num(2)]) }
        );
        assert_eq!(parse("  42 ").unwrap(), Program { expression: num(42) });
    }

    #[test]
    fn nested_lists() {
        assert_eq!(
            parse("( * ( + 1 2 ) ( - 4 1 ) )").unwrap().expression,
            Expression::apply(
                Operator::Mul,
                vec![
                    Expression::apply(Operator::Add, vec![num(1), num(2)]),
                    Expression::apply(Operator::Sub, vec![num(4), num(1)]),
                ]
            )
        );
    }

    #[test]
    fn minus_sign_versus_operator() {
        // Leading `-` is the operator at the start of a line or list
        assert_eq!(
            parse("-5").unwrap().expression,
            Expression::apply(Operator::Sub, vec![num(5)])
        );
        assert_eq!(
            parse("(-5 2)").unwrap().expression,
            Expression::apply(Operator::Sub, vec![num(5), num(2)])
        );
        assert_eq!(
            parse("+ -5 2").unwrap().expression,
            Expression::apply(Operator::Add, vec![num(-5), num(2)])
        );
        assert_eq!(expression("-17"), Ok(("", num(-17))));
    }

    #[test]
    fn keywords_and_whitespace() {
        assert_eq!(
            parse("\tmin(max 1 2)\r\n  7\n").unwrap().expression,
            Expression::apply(
                Operator::Min,
                vec![Expression::apply(Operator::Max, vec![num(1), num(2)]), num(7)]
            )
        );
    }

    #[test]
    fn unterminated_list() {
        let e = parse("( + 1").unwrap_err();
        assert_eq!(e.line, 1);
        assert_eq!(e.column, 6);
        assert_eq!(e.found, None);
        assert_eq!(e.expectation, Expectation::Expected(vec!["number", "'('", "')'"]));
        assert_eq!(
            e.to_string(),
            "<stdin>:1:6: error: expected number, '(' or ')' at end of input"
        );
    }

    #[test]
    fn missing_operator() {
        let e = parse("( 1 2 )").unwrap_err();
        assert_eq!(e.column, 3);
        assert_eq!(e.found, Some('1'));
        match e.expectation {
            Expectation::Expected(labels) => {
                assert_eq!(labels.len(), 8);
                assert_eq!(labels[0], "'+'");
                assert_eq!(labels[7], "\"max\"");
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn trailing_input() {
        let e = parse("( + 1 2 ) x").unwrap_err();
        assert_eq!(e.column, 11);
        assert_eq!(e.found, Some('x'));
        assert_eq!(e.expectation, Expectation::Expected(vec!["end of input"]));
    }

    #[test]
    fn unknown_symbol_after_operands() {
        let e = parse("+ 1 &").unwrap_err();
        assert_eq!(
            e.to_string(),
            "<stdin>:1:5: error: expected number, '(' or end of input at '&'"
        );
    }

    #[test]
    fn empty_line() {
        let e = parse("").unwrap_err();
        assert_eq!(e.column, 1);
        assert_eq!(e.found, None);
        match e.expectation {
            Expectation::Expected(labels) => {
                assert_eq!(labels.len(), 10);
                assert!(labels.contains(&"number"));
                assert!(labels.contains(&"'('"));
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn number_out_of_range() {
        let e = parse("+ 1 99999999999999999999").unwrap_err();
        assert_eq!(e.column, 5);
        assert_eq!(e.expectation, Expectation::NumberOutOfRange);
        assert!(parse("+ 1 -9223372036854775808").is_ok());
    }

    #[test]
    fn smallest_number_at_top_level() {
        assert_eq!(parse("-9223372036854775808").unwrap().expression, num(i64::MIN));
        assert_eq!(
            parse("-9223372036854775809").unwrap_err().expectation,
            Expectation::NumberOutOfRange
        );
    }

    fn nested(depth: usize) -> String {
        format!("+ 1 {}1{}", "(+ 1 ".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn nesting_limit() {
        assert!(parse(&nested(define::MAX_DEPTH)).is_ok());

        let e = parse(&nested(define::MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(e.expectation, Expectation::TooDeep);
        assert_eq!(e.column, 5 + 5 * define::MAX_DEPTH);
        assert_eq!(e.found, Some('('));
        assert_eq!(
            e.to_string(),
            format!("<stdin>:1:{}: error: expressions nested deeper than 256 levels at '('", e.column)
        );
        assert_eq!(parse(&nested(20000)).unwrap_err().expectation, Expectation::TooDeep);
    }

    #[test]
    fn operator_symbols() {
        assert_eq!(operator("  min 1"), Ok((" 1", Operator::Min)));
        assert_eq!(operator("%2"), Ok(("2", Operator::Rem)));
        let e = operator("avg").unwrap_err();
        match e {
            nom::Err::Error(GrammarError { expectation: Expectation::Expected(labels), .. }) => {
                assert_eq!(labels.len(), 8);
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_operator_message() {
        let error = GrammarError::from_external_error(
            "avg 1",
            ErrorKind::MapRes,
            Error::UnknownOperator("avg".to_owned()),
        );
        let e = ParseError::new(define::SOURCE_STDIN, "avg 1", error);
        assert_eq!(e.to_string(), "<stdin>:1:1: error: unknown operator 'avg' at 'a'");
    }

    #[test]
    fn error_on_later_line() {
        let e = parse("+ 1\n  )").unwrap_err();
        assert_eq!((e.line, e.column), (2, 3));
    }
}
