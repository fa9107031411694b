use std::fmt;

/// The C types a source value can resolve to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CType {
    Double,
    CharPtr,
    Int,
    Struct(String),
}

/// Fallback for names with no binding and for parameter slots whose call-site
/// evidence is missing or conflicting.
pub const NUMERIC_DEFAULT: CType = CType::Double;

/// Fallback for every expression shape the resolver has no rule for.
pub const TEXT_DEFAULT: CType = CType::CharPtr;

impl CType {
    pub fn c_name(&self) -> &str {
        match self {
            CType::Double => "double",
            CType::CharPtr => "char*",
            CType::Int => "int",
            CType::Struct(name) => name,
        }
    }

    /// printf format token used by `print` lowering.
    pub fn print_format(&self) -> &'static str {
        match self {
            CType::CharPtr => "%s",
            _ => "%f",
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}
