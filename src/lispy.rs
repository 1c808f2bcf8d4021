pub mod builtin;
pub mod define;
pub mod display;
pub mod error;
pub mod eval;
pub mod parser;
pub mod repl;

use std::str::FromStr;

pub use error::{Error, Result};

/// The top-level `lispy` node: the whole input line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Program {
    pub expression: Expression,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expression {
    Number(i64),
    Application(Application),
}

/// An operator applied to one or more operands, `( op e1 e2 ... )`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Application {
    pub operator: Operator,
    pub operands: Vec<Expression>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Min,
    Max,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Rem,
        Operator::Pow,
        Operator::Min,
        Operator::Max,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => define::ADD,
            Operator::Sub => define::SUB,
            Operator::Mul => define::MUL,
            Operator::Div => define::DIV,
            Operator::Rem => define::REM,
            Operator::Pow => define::POW,
            Operator::Min => define::MIN,
            Operator::Max => define::MAX,
        }
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| Error::UnknownOperator(s.to_owned()))
    }
}

impl Expression {
    pub fn apply(operator: Operator, operands: Vec<Expression>) -> Self {
        Expression::Application(Application { operator, operands })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn operator_from_symbol() {
        assert_eq!("min".parse::<Operator>(), Ok(Operator::Min));
        assert_eq!("^".parse::<Operator>(), Ok(Operator::Pow));
        for op in Operator::ALL {
            assert_eq!(op.symbol().parse::<Operator>(), Ok(op));
        }
    }

    #[test]
    fn unknown_operator() {
        assert_eq!(
            "avg".parse::<Operator>(),
            Err(Error::UnknownOperator("avg".to_owned()))
        );
    }

    #[test]
    fn respond_to_line() {
        use repl::{respond, Mode};

        assert_eq!(respond(define::SOURCE_STDIN, "+ 1 2 (* 3 4)", Mode::Evaluate), Ok("15".to_owned()));
        assert!(matches!(
            respond(define::SOURCE_STDIN, "+ 1 (", Mode::Evaluate),
            Err(Error::Parse(_))
        ));
        assert_eq!(
            respond(define::SOURCE_STDIN, "/ 1 0", Mode::Evaluate),
            Err(Error::DivisionByZero)
        );
    }
}
