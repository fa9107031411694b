use py2c::language::decode::program_from_value;
use py2c::language::translate::translate_program;
use py2c::tools::diagnostics::{report_decode_error, report_io_error, report_json_error};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::Path;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: ./py2c <ast.json>");
        std::process::exit(1);
    }
    let filename = &args[1];
    if !filename.ends_with(".json") {
        eprintln!("Invalid file extension. Only .json AST dumps are allowed.");
        std::process::exit(1);
    }

    let path = Path::new(filename);
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            report_io_error(path, &err);
            std::process::exit(1);
        }
    };
    let value: Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(err) => {
            report_json_error(path, &err);
            std::process::exit(1);
        }
    };
    let program = match program_from_value(&value) {
        Ok(program) => program,
        Err(err) => {
            report_decode_error(path, err);
            std::process::exit(1);
        }
    };

    print!("{}", translate_program(&program));
}
