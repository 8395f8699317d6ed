use std::{
    fs,
    io::{BufRead, Write},
};

use chemlang::{Interpreter, parse_source, run_with};
use clap::Parser;

/// chemlang is an interpreted language for chemistry homework: numbers
/// carry units, significant figures and chemical formulas, and `->`
/// converts between them, through molar masses and balanced reactions
/// when needed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a script to run. Starts the interactive REPL when omitted.
    script: Option<String>,

    /// Print the last value the script produced.
    #[arg(short, long)]
    pipe_mode: bool,
}

fn main() {
    let args = Args::parse();

    match args.script {
        Some(path) => run_script(&path, args.pipe_mode),
        None => repl(),
    }
}

fn run_script(path: &str, pipe_mode: bool) {
    let source = fs::read_to_string(path).unwrap_or_else(|_| {
        eprintln!("Failed to read the input file '{path}'. Perhaps this file does not exist?");
        std::process::exit(1);
    });

    let mut interpreter = Interpreter::new();
    match run_with(&source, &mut interpreter) {
        Ok(result) => {
            if pipe_mode && let Some(value) = result {
                println!("{value}");
            }
        },
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        },
    }
}

/// The interactive loop. Bindings persist across entries; an entry keeps
/// accumulating lines while the parser reports incomplete input (or while
/// the user is typing an indented block), and errors never kill the
/// session.
fn repl() {
    println!("chemlang repl. Enter statements, Ctrl-D to exit.");

    let mut interpreter = Interpreter::new();
    let stdin = std::io::stdin();
    let mut entry = String::new();

    loop {
        print!("{}", if entry.is_empty() { ">>> " } else { "... " });
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {},
        }

        let blank = line.trim().is_empty();
        let indented = !blank && line.starts_with([' ', '\t']);
        entry.push_str(&line);

        if entry.trim().is_empty() {
            entry.clear();
            continue;
        }

        // An indented line continues a block; a blank line forces the
        // entry to run as-is.
        if indented && !blank {
            continue;
        }
        if !blank && incomplete(&entry) {
            continue;
        }

        match run_with(&entry, &mut interpreter) {
            Ok(Some(value)) => println!("{value}"),
            Ok(None) => {},
            Err(error) => eprintln!("{error}"),
        }
        entry.clear();
    }
}

/// Whether the entry so far parses as an unfinished construct, meaning the
/// REPL should keep reading lines.
fn incomplete(entry: &str) -> bool {
    match parse_source(entry) {
        Ok(_) => false,
        Err(failure) => failure.errors.iter().any(chemlang::error::ParseError::is_incomplete_input),
    }
}
