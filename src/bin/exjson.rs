//! Command-line driver around the library's parse/validate/eval surface.
//!
//! A thin external collaborator: it reads a file or stdin, dispatches to
//! the requested library entry point, and prints text. None of the core
//! engine lives here.
//!
//! ```text
//! exjson [--compact|--validate|--eval|--tree] [--iterative] [FILE]
//! ```
//! With no `FILE`, reads from stdin. Default mode is pretty-printing the
//! parsed JSON; `--eval` instead parses the input as exJSON and prints
//! the evaluated result.

use exjson::exjson as ex;
use exjson::util::Code;
use exjson::value::{EnvArena, Value, ValueArena};
use exjson::{api, json};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Pretty,
    Compact,
    Validate,
    Eval,
    Tree,
}

struct Args {
    mode: Mode,
    iterative: bool,
    trace: bool,
    path: Option<String>,
}

fn parse_args() -> Args {
    let mut mode = Mode::Pretty;
    let mut iterative = false;
    let mut trace = false;
    let mut path = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--pretty" => mode = Mode::Pretty,
            "--compact" => mode = Mode::Compact,
            "--validate" => mode = Mode::Validate,
            "--eval" => mode = Mode::Eval,
            "--tree" => mode = Mode::Tree,
            "--iterative" => iterative = true,
            "--trace" => trace = true,
            other => path = Some(other.to_string()),
        }
    }
    Args {
        mode,
        iterative,
        trace,
        path,
    }
}

fn read_input(path: &Option<String>) -> io::Result<Vec<u8>> {
    match path {
        Some(p) => fs::read(p),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn main() -> ExitCode {
    let args = parse_args();
    let bytes = match read_input(&args.path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("exjson: could not read input: {err}");
            return ExitCode::FAILURE;
        }
    };

    match args.mode {
        Mode::Validate => match api::validate(&bytes) {
            Ok(()) => {
                println!("{}", exjson::ErrorCode::NoError);
                ExitCode::SUCCESS
            }
            Err(err) => {
                report(&bytes, &err);
                ExitCode::FAILURE
            }
        },
        Mode::Eval => run_eval(&bytes),
        Mode::Pretty | Mode::Compact | Mode::Tree => {
            run_parse(&bytes, args.mode, args.iterative, args.trace)
        }
    }
}

fn run_parse(bytes: &[u8], mode: Mode, iterative: bool, trace: bool) -> ExitCode {
    let log = if trace {
        exjson::util::Log::Verbose("exjson")
    } else {
        exjson::util::Log::None
    };
    let doc = if iterative {
        json::parse_iterative(bytes)
    } else {
        json::parse_traced(bytes, log)
    };
    match doc {
        Ok(doc) => {
            match mode {
                Mode::Compact => println!("{}", json::to_string_compact(&doc.arena, doc.root)),
                Mode::Tree => {
                    if let Err(err) = api::print_tree(&doc.arena, doc.root) {
                        eprintln!("exjson: {err}");
                        return ExitCode::FAILURE;
                    }
                }
                _ => println!("{}", api::stringify(&doc.arena, doc.root)),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(bytes, &err);
            ExitCode::FAILURE
        }
    }
}

fn run_eval(bytes: &[u8]) -> ExitCode {
    let mut pos = json::scanner::skip_whitespace(bytes, 0);
    if pos >= bytes.len() {
        eprintln!("exjson: no data to evaluate");
        return ExitCode::FAILURE;
    }
    let mut arena = ValueArena::new(bytes);
    let mut envs = EnvArena::new();
    let global = ex::create_global_env(&mut envs);
    let mut last = arena.alloc(Value::Null);

    while pos < bytes.len() {
        let (form, end) = match ex::sexpr::parse_form(bytes, pos, &mut arena) {
            Ok(result) => result,
            Err(err) => {
                report(bytes, &err);
                return ExitCode::FAILURE;
            }
        };
        last = ex::eval_top_level(&mut arena, &mut envs, form, global);
        pos = json::scanner::skip_whitespace(bytes, end);
    }

    println!("{}", json::to_string_compact(&arena, last));
    ExitCode::SUCCESS
}

fn report(source: &[u8], err: &exjson::ParseError) {
    let code = Code::new(source);
    let position = code.obtain_position(err.pointer);
    eprintln!("exjson: {}", err.at_position(position));
}
