mod lispy;
use lispy::define;
use lispy::repl::{
    self,
    Editor,
    Mode,
    Plain,
    Repl,
};
use std::io::{
    self,
    IsTerminal,
};
use std::process::ExitCode;
use clap::{
    Arg,
    App,
};

fn main() -> ExitCode {
    let matches = App::new("lispy")
        .version(define::VERSION)
        .about("Evaluate prefix-notation integer arithmetic")
        .arg(Arg::with_name("eval")
             .short("e")
             .long("eval")
             .value_name("EXPR")
             .help("Evaluate one expression and exit")
             .takes_value(true)
             .allow_hyphen_values(true))
        .arg(Arg::with_name("ast")
             .long("ast")
             .help("Print the parse tree instead of the value")
             .takes_value(false))
        .get_matches();
    let mode = if matches.is_present("ast") {
        Mode::Tree
    } else {
        Mode::Evaluate
    };

    if let Some(input) = matches.value_of("eval") {
        return match repl::respond(define::SOURCE_ARGUMENT, input, mode) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            },
            Err(e) => {
                eprintln!("{}", repl::diagnostic(&e));
                ExitCode::FAILURE
            },
        };
    }

    let result = if io::stdin().is_terminal() {
        Editor::new().and_then(|editor| interact(editor, mode))
    } else {
        interact(Plain::new(io::stdin().lock(), io::stdout()), mode)
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        },
    }
}

fn interact<R: repl::LineReader>(reader: R, mode: Mode) -> anyhow::Result<()> {
    let mut repl = Repl::new(reader, io::stdout(), mode);
    repl.banner()?;
    repl.run()
}
