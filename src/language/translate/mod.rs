mod class;
mod emit;
mod expr;
mod func;
mod harvest;
mod resolve;
mod scopes;
mod stmt;

#[cfg(test)]
mod tests;

use crate::language::ast::{Node, Program};
use crate::language::types::CType;
use harvest::{harvest, Evidence};
use resolve::{resolve_type, ResolveCtx};
use scopes::ScopeStack;
use std::collections::HashSet;

/// Translates one program to C text. Never fails: everything the engine
/// cannot express degrades to an inline comment at the point of failure.
pub fn translate_program(program: &Program) -> String {
    let evidence = harvest(&program.body);
    let mut translator = Translator::new(evidence);
    let main_body = translator.lower_block(&program.body, 1);
    translator.assemble(&main_body)
}

pub(crate) struct Translator {
    evidence: Evidence,
    scopes: ScopeStack,
    structs: StructRegistry,
    /// Struct and method definitions, in discovery order.
    struct_defs: Vec<String>,
    /// Free-function definitions, in discovery order.
    fn_defs: Vec<String>,
    /// Functions translated with the output-slot convention.
    slot_fns: HashSet<String>,
    /// Receiver parameter name of the method currently being lowered.
    receiver: Option<String>,
    /// Whether return statements currently lower to output-slot writes.
    in_slot_fn: bool,
    uses_pow: bool,
}

impl Translator {
    pub(crate) fn new(evidence: Evidence) -> Self {
        Self {
            evidence,
            scopes: ScopeStack::new(),
            structs: StructRegistry::default(),
            struct_defs: Vec::new(),
            fn_defs: Vec::new(),
            slot_fns: HashSet::new(),
            receiver: None,
            in_slot_fn: false,
            uses_pow: false,
        }
    }

    pub(crate) fn resolve(&self, node: Option<&Node>) -> CType {
        resolve_type(
            &ResolveCtx {
                scopes: &self.scopes,
                structs: &self.structs,
                slot_fns: &self.slot_fns,
            },
            node,
        )
    }
}

/// Classes already lowered to struct definitions. Doubles as the
/// constructor-call discriminator: a call to a registered name is a
/// constructor, anything else is an ordinary function.
#[derive(Default)]
pub(crate) struct StructRegistry {
    structs: Vec<StructDef>,
}

pub(crate) struct StructDef {
    pub name: String,
    pub fields: Vec<(String, CType)>,
}

impl StructRegistry {
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.structs.iter().any(|def| def.name == name)
    }

    pub(crate) fn field_type(&self, struct_name: &str, field: &str) -> Option<&CType> {
        self.structs
            .iter()
            .find(|def| def.name == struct_name)?
            .fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, ty)| ty)
    }

    pub(crate) fn insert(&mut self, def: StructDef) {
        self.structs.push(def);
    }
}

/// Marker for a construct the engine cannot express in C. Carries what was
/// encountered and, when the input recorded one, the source line. The caller
/// decides where to splice the fallback comment.
#[derive(Clone, Debug)]
pub(crate) struct Unsupported {
    pub what: String,
    pub line: Option<u64>,
}

impl Unsupported {
    pub(crate) fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            line: None,
        }
    }

    pub(crate) fn node(kind: &str, line: Option<u64>) -> Self {
        Self {
            what: format!("node: {kind}"),
            line,
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self.line {
            Some(line) => format!("{} (line {line})", self.what),
            None => self.what.clone(),
        }
    }
}

/// Expression lowering either yields C text or the unsupported marker.
pub(crate) type Lowered = Result<String, Unsupported>;

pub(crate) fn padding(indent: usize) -> String {
    "    ".repeat(indent)
}

pub(crate) fn comment(indent: usize, text: &str) -> String {
    format!("{}// {}\n", padding(indent), text)
}

pub(crate) fn unsupported_comment(indent: usize, marker: &Unsupported) -> String {
    comment(indent, &format!("unsupported {}", marker.describe()))
}
