use std::{env, fs::read_to_string, path::PathBuf, process::exit, str::FromStr, time::Instant};

use idolscript::{
    compile, errors::errors::Error, parser::parser::Matcher, Artifact, Stage,
};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: idolscript <file> <stage>");
        eprintln!("Stages: parsed, analyzed, optimized, js");
        exit(2);
    }

    let file_path = PathBuf::from(&args[1]);
    let stage = match Stage::from_str(&args[2]) {
        Ok(stage) => stage,
        Err(message) => {
            eprintln!("Usage error: {message}");
            exit(2);
        }
    };

    let source = match read_to_string(&file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {error}", file_path.display());
            exit(1);
        }
    };

    let start = Instant::now();
    let matcher = Matcher::new();
    let artifact = match compile(&matcher, &source, stage) {
        Ok(artifact) => artifact,
        Err(error) => {
            display_error(&error, &file_path, &source);
            exit(1);
        }
    };
    eprintln!("Compiled in {:?}", start.elapsed());

    match artifact {
        Artifact::Parsed(_) => println!("Syntax is ok"),
        Artifact::Analyzed(program) | Artifact::Optimized(program) => {
            println!("{}", pretty_print(format!("{:?}", program)));
        }
        Artifact::Js(js) => println!("{js}"),
    }
}

/// Re-indents a debug-formatted tree so nesting is readable.
fn pretty_print(string: String) -> String {
    let mut result = String::new();
    let mut indent = 0;
    let mut ignore_next_space = false;

    for c in string.chars() {
        match c {
            '{' | '(' | '[' => {
                indent += 1;
                result.push(c);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                ignore_next_space = c == '{';
            }
            '}' | ')' | ']' => {
                indent -= 1;
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                result.push(c);
            }
            ',' => {
                result.push(c);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                ignore_next_space = true;
            }
            ' ' if ignore_next_space => {
                ignore_next_space = false;
            }
            _ => result.push(c),
        }
    }

    result
}

fn display_error(error: &Error, file: &PathBuf, source: &str) {
    /*
        Error: SyntaxError (Unexpected token `*`)
        -> final.idol
           |
        20 | idol a = * 1
           | ---------^
    */

    let offset = error.get_span().start as usize;
    let (line_number, line_text, column) = line_at_offset(source, offset);

    let line_str = line_number.to_string();
    let padding = line_str.len() + 2;

    println!("Error: {} ({})", error.get_error_name(), error.get_message());
    println!("-> {}", file.display());
    println!("{:>padding$}", "|");

    let trimmed = line_text.trim_start_matches(' ');
    let removed = line_text.len() - trimmed.len();
    println!("{} | {}", line_str, trimmed.trim_end());

    let arrows = column.saturating_sub(removed) + 1;
    println!("{:>padding$} {:->arrows$}", "|", "^");
}

/// The 1-based line number, line text and 0-based column containing a
/// byte offset.
fn line_at_offset(source: &str, offset: usize) -> (usize, &str, usize) {
    let mut line_start = 0;
    for (number, line) in source.lines().enumerate() {
        let line_end = line_start + line.len();
        if offset <= line_end {
            return (number + 1, line, offset - line_start);
        }
        line_start = line_end + 1;
    }
    (source.lines().count().max(1), "", 0)
}
