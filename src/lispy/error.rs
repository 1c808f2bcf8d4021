use std::fmt;

use super::parser::ParseError;
use super::Operator;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Parse(ParseError),
    UnknownOperator(String),
    MissingOperand(Operator),
    DivisionByZero,
    Overflow { operator: Operator },
}

impl Error {
    pub fn description(&self) -> String {
        match self {
            Self::Parse(e) => e.to_string(),
            Self::UnknownOperator(op) => format!("Unknown operator '{}'", op),
            Self::MissingOperand(op) => {
                format!("Operator '{}' needs at least one operand", op.symbol())
            }
            Self::DivisionByZero => "Attempted to divide by 0".into(),
            Self::Overflow { operator } => {
                format!("Integer overflow evaluating '{}'", operator.symbol())
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}
