use miette::Diagnostic;
use thiserror::Error;

/// Violations of the input contract: the program root must be a JSON object
/// carrying a `body` array of statement nodes. Everything below the root is
/// decoded best-effort and never fails.
#[derive(Clone, Debug, Error, Diagnostic)]
pub enum DecodeError {
    #[error("program root is not a JSON object")]
    #[diagnostic(help(
        "expected the JSON dump of a module node, e.g. {{\"_type\": \"Module\", \"body\": [...]}}"
    ))]
    RootNotObject,

    #[error("program root has no statement list")]
    #[diagnostic(help("the root object must carry a \"body\" array of statement nodes"))]
    MissingBody,
}
