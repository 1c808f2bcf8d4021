// Special
pub static LEFT_PARENTHESIS: &str = "(";
pub static RIGHT_PARENTHESIS: &str = ")";
pub static NEGATIVE_SIGN: &str = "-";

// Operator
pub static ADD: &str = "+";
pub static SUB: &str = "-";
pub static MUL: &str = "*";
pub static DIV: &str = "/";
pub static REM: &str = "%";
pub static POW: &str = "^";
pub static MIN: &str = "min";
pub static MAX: &str = "max";

// Parse tree node kinds
pub static NODE_PROGRAM: &str = "lispy";
pub static NODE_EXPRESSION: &str = "expr";
pub static NODE_OPERATOR: &str = "operator";
pub static NODE_NUMBER: &str = "number";

// Source names
pub static SOURCE_STDIN: &str = "<stdin>";
pub static SOURCE_ARGUMENT: &str = "<eval>";

// Repl
pub static VERSION: &str = "0.0.0.0.4";
pub static PROMPT: &str = "lispy> ";
pub static EXIT_HINT: &str = "Press Ctrl+c to Exit";

pub static MAX_DEPTH: usize = 256;
