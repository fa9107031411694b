use crate::language::errors::DecodeError;
use miette::Report;
use std::path::Path;

pub fn report_decode_error(path: &Path, error: DecodeError) {
    eprintln!("{} does not hold a translatable program", path.display());
    eprintln!("{:?}", Report::new(error));
}

pub fn report_json_error(path: &Path, error: &serde_json::Error) {
    eprintln!("Failed to parse {}: {}", path.display(), error);
}

pub fn report_io_error(path: &Path, error: &std::io::Error) {
    eprintln!("Failed to access {}: {}", path.display(), error);
}
