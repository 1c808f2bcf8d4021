use super::{
    Application,
    Error,
    Expression,
    Operator,
    Program,
    Result,
};
use super::builtin;

pub fn eval_program(program: &Program) -> Result<i64> {
    eval(&program.expression)
}

pub fn eval(expr: &Expression) -> Result<i64> {
    match expr {
        Expression::Number(number) => Ok(*number),
        Expression::Application(application) => apply(application),
    }
}

/// Reduces `( op e1 e2 ... )` left to right.
///
/// `-` with a single operand is negation; any other operator with a single
/// operand yields that operand.
pub fn apply(application: &Application) -> Result<i64> {
    let operator = application.operator;
    let (first, rest) = application
        .operands
        .split_first()
        .ok_or(Error::MissingOperand(operator))?;

    if operator == Operator::Sub && rest.is_empty() {
        return builtin::negate(eval(first)?);
    }

    let mut accumulator = eval(first)?;
    for operand in rest {
        accumulator = operator.apply(accumulator, eval(operand)?)?;
    }
    Ok(accumulator)
}
