use super::{
    Error,
    eval,
    parser,
};
use super::define;

use std::io::{
    BufRead,
    Write,
};

use anyhow::Result;
use rustyline::{
    error::ReadlineError,
    DefaultEditor,
};

/// Where the repl gets its lines from.
pub trait LineReader {
    /// Shows `prompt` and blocks for one line, without its line terminator.
    /// `Ok(None)` once the input is exhausted or the user interrupted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Best effort; readers without history ignore it.
    fn add_history(&mut self, _line: &str) {}
}

/// Line editing with in-memory history, for terminals.
pub struct Editor {
    editor: DefaultEditor,
}

impl Editor {
    pub fn new() -> Result<Self> {
        Ok(Editor { editor: DefaultEditor::new()? })
    }
}

impl LineReader for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        self.editor.add_history_entry(line).ok();
    }
}

/// Reads from any buffered input and writes the prompt itself, for pipes.
pub struct Plain<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Plain<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Plain { input, output }
    }
}

impl<R: BufRead, W: Write> LineReader for Plain<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;
        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            return Ok(None);
        }
        // Invalid UTF-8 becomes U+FFFD and fails to parse like any other junk.
        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        let len = line.trim_end_matches(|c| c == '\n' || c == '\r').len();
        line.truncate(len);
        Ok(Some(line))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Evaluate,
    /// Print the parse tree instead of the value.
    Tree,
}

pub struct Repl<R, W> {
    reader: R,
    output: W,
    mode: Mode,
}

impl<R: LineReader, W: Write> Repl<R, W> {
    pub fn new(reader: R, output: W, mode: Mode) -> Self {
        Repl { reader, output, mode }
    }

    pub fn banner(&mut self) -> Result<()> {
        writeln!(self.output, "Lispy Version {}", define::VERSION)?;
        writeln!(self.output, "{}\n", define::EXIT_HINT)?;
        Ok(())
    }

    /// Loops until the reader runs dry. Parse and evaluation errors are
    /// printed and the loop carries on; only reader and output failures end it
    /// with an error.
    pub fn run(&mut self) -> Result<()> {
        while let Some(line) = self.reader.read_line(define::PROMPT)? {
            self.reader.add_history(&line);
            match respond(define::SOURCE_STDIN, &line, self.mode) {
                Ok(text) => writeln!(self.output, "{}", text)?,
                Err(e) => writeln!(self.output, "{}", diagnostic(&e))?,
            }
            self.output.flush()?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.output)
    }
}

/// The text printed for one input line.
pub fn respond(source: &str, line: &str, mode: Mode) -> super::Result<String> {
    let program = parser::program_all_consuming(source, line)?;
    match mode {
        Mode::Evaluate => Ok(eval::eval_program(&program)?.to_string()),
        Mode::Tree => Ok(program.tree().to_string()),
    }
}

/// Parse errors print as the grammar reports them, everything else gets a
/// prefix.
pub fn diagnostic(error: &Error) -> String {
    match error {
        Error::Parse(e) => e.to_string(),
        e => format!("Error: {}", e),
    }
}
