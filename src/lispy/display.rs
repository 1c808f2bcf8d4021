use std::fmt::{self, Display, Formatter};

use super::define;
use super::{
    Application,
    Expression,
    Operator,
    Program,
};

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Indented dump of the parse tree, one node per line.
pub struct Tree<'a>(&'a Program);

impl Program {
    pub fn tree(&self) -> Tree<'_> {
        Tree(self)
    }
}

impl Display for Tree<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(define::NODE_PROGRAM)?;
        match &self.0.expression {
            Expression::Application(application) => write_application(f, application, 1),
            number => write_node(f, number, 1),
        }
    }
}

fn write_node(f: &mut Formatter<'_>, expr: &Expression, depth: usize) -> fmt::Result {
    match expr {
        Expression::Number(n) => {
            write!(f, "\n{:indent$}{} '{}'", "", define::NODE_NUMBER, n, indent = depth * 2)
        },
        Expression::Application(application) => {
            write!(f, "\n{:indent$}{}", "", define::NODE_EXPRESSION, indent = depth * 2)?;
            write_application(f, application, depth + 1)
        },
    }
}

fn write_application(f: &mut Formatter<'_>, application: &Application, depth: usize) -> fmt::Result {
    write!(
        f,
        "\n{:indent$}{} '{}'",
        "",
        define::NODE_OPERATOR,
        application.operator,
        indent = depth * 2
    )?;
    for operand in &application.operands {
        write_node(f, operand, depth)?;
    }
    Ok(())
}
