use clap::Parser;
use jogo::{lexer::Pos, Builtins, Config, Interpreter, TurtleCmd};
use std::{path::PathBuf, process::exit};

#[derive(Parser)]
struct Args {
    input: PathBuf,

    /// Print the token stream instead of running the program.
    #[arg(long)]
    tokens: bool,

    /// Print the parsed program instead of running it.
    #[arg(long)]
    ast: bool,

    /// How deeply procedure calls may nest.
    #[arg(long, default_value_t = Config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

/// The source line containing `pos`, with a caret under the offending column.
fn excerpt(input: &str, pos: Pos) -> String {
    let Some(line) = input.lines().nth(pos.line.saturating_sub(1) as usize) else {
        return String::new();
    };
    format!("{line}\n{}^\n", " ".repeat(pos.column.saturating_sub(1)))
}

pub fn main() {
    pretty_env_logger::init();
    let args = Args::parse();
    let input = match std::fs::read_to_string(&args.input) {
        Ok(x) => x,
        Err(e) => {
            println!(
                "Failed to open input file {}: {}",
                args.input.into_os_string().to_string_lossy(),
                e
            );
            exit(1);
        }
    };

    if args.tokens {
        match jogo::lexer::tokenize(&input) {
            Ok(tokens) => {
                for tok in tokens {
                    println!("{}\t{}", tok.pos, tok);
                }
            }
            Err(e) => {
                print!("{}", excerpt(&input, e.pos()));
                println!("Lexical error at {e}");
                exit(1);
            }
        }
        return;
    }

    let config = Config {
        max_depth: args.max_depth,
    };
    let interp = Interpreter::new(Builtins::default(), config);
    let prog = match interp.parse(&input) {
        Ok(prog) => prog,
        Err(e) => {
            if let Some(pos) = e.pos() {
                print!("{}", excerpt(&input, pos));
            }
            println!("{e}");
            exit(1);
        }
    };

    if args.ast {
        print!("{prog}");
        return;
    }

    let mut turtle: Vec<TurtleCmd> = Vec::new();
    let res = interp.exec(&mut turtle, &prog);
    for cmd in &turtle {
        println!("{cmd}");
    }
    if let Err(e) = res {
        println!("{e}");
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpts() {
        let source = "fd 1\nrepeat 4 [fd 1 rt\n";
        let err = jogo::parse(source, &Builtins::default()).unwrap_err();
        let pos = err.pos().unwrap();
        assert_eq!(excerpt(source, pos), "repeat 4 [fd 1 rt\n                 ^\n");

        let err = jogo::lexer::tokenize("fd 1 rt 9$0").unwrap_err();
        assert_eq!(excerpt("fd 1 rt 9$0", err.pos()), "fd 1 rt 9$0\n         ^\n");

        let end = Pos {
            offset: 0,
            line: 7,
            column: 1,
        };
        assert_eq!(excerpt(source, end), "");
    }
}
