use super::{
    Error,
    Operator,
    Result,
};

impl Operator {
    /// Folds one more operand into the accumulator.
    pub fn apply(self, accumulator: i64, operand: i64) -> Result<i64> {
        match self {
            Operator::Add => checked(self, accumulator.checked_add(operand)),
            Operator::Sub => checked(self, accumulator.checked_sub(operand)),
            Operator::Mul => checked(self, accumulator.checked_mul(operand)),
            Operator::Div => divide(accumulator, operand),
            Operator::Rem => remainder(accumulator, operand),
            Operator::Pow => power(accumulator, operand),
            Operator::Min => Ok(if operand < accumulator { operand } else { accumulator }),
            Operator::Max => Ok(if operand > accumulator { operand } else { accumulator }),
        }
    }
}

fn checked(operator: Operator, result: Option<i64>) -> Result<i64> {
    result.ok_or(Error::Overflow { operator })
}

pub fn negate(x: i64) -> Result<i64> {
    checked(Operator::Sub, x.checked_neg())
}

/// Truncating division.
pub fn divide(x: i64, y: i64) -> Result<i64> {
    if y == 0 {
        return Err(Error::DivisionByZero);
    }
    checked(Operator::Div, x.checked_div(y))
}

/// Remainder with the sign of the dividend.
pub fn remainder(x: i64, y: i64) -> Result<i64> {
    if y == 0 {
        return Err(Error::DivisionByZero);
    }
    // i64::MIN % -1 is 0, only the intermediate quotient overflows
    Ok(x.wrapping_rem(y))
}

/// Exact integer power by repeated squaring.
///
/// A negative exponent gives the truncated real result, so only bases of
/// magnitude one survive it.
pub fn power(base: i64, exponent: i64) -> Result<i64> {
    if exponent < 0 {
        return match base {
            0 => Err(Error::DivisionByZero),
            1 => Ok(1),
            -1 => Ok(if exponent % 2 == 0 { 1 } else { -1 }),
            _ => Ok(0),
        };
    }

    let mut result: i64 = 1;
    let mut base = base;
    let mut exponent = exponent as u64;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = checked(Operator::Pow, result.checked_mul(base))?;
        }
        exponent >>= 1;
        if exponent > 0 {
            base = checked(Operator::Pow, base.checked_mul(base))?;
        }
    }
    Ok(result)
}
