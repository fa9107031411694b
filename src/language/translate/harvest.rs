//! Call-site evidence, gathered in one full-tree walk before any code is
//! emitted. Argument types are resolved against an empty context: at harvest
//! time no declaration has been seen, so only constant shapes and the
//! defaulting policies apply.

use super::resolve::{resolve_type, ResolveCtx};
use super::scopes::ScopeStack;
use super::StructRegistry;
use crate::language::ast::Node;
use crate::language::types::{CType, NUMERIC_DEFAULT, TEXT_DEFAULT};
use std::collections::{HashMap, HashSet};

/// Immutable snapshot of argument-type vectors per callable name, one vector
/// per observed call site in traversal order. The ordinary table fixes
/// function parameter types; the constructor table fixes `__init__`
/// parameter and struct field types.
#[derive(Debug, Default)]
pub(crate) struct Evidence {
    calls: HashMap<String, Vec<Vec<CType>>>,
    ctor_calls: HashMap<String, Vec<Vec<CType>>>,
}

impl Evidence {
    pub(crate) fn call_sites(&self, name: &str) -> &[Vec<CType>] {
        self.calls.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn ctor_sites(&self, name: &str) -> &[Vec<CType>] {
        self.ctor_calls.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Type of one function parameter slot: a single agreeing type across
    /// all call sites fixes it; conflicting or absent evidence falls back to
    /// the numeric default.
    pub(crate) fn param_type(&self, name: &str, index: usize) -> CType {
        slot_type(self.call_sites(name), index).unwrap_or(NUMERIC_DEFAULT)
    }

    /// Same intersection for a constructor parameter slot, with the text
    /// default as the fallback.
    pub(crate) fn ctor_param_type(&self, name: &str, index: usize) -> CType {
        slot_type(self.ctor_sites(name), index).unwrap_or(TEXT_DEFAULT)
    }
}

fn slot_type(sites: &[Vec<CType>], index: usize) -> Option<CType> {
    let mut found: Option<&CType> = None;
    for site in sites {
        let Some(ty) = site.get(index) else {
            continue;
        };
        match found {
            None => found = Some(ty),
            Some(prev) if prev == ty => {}
            Some(_) => return None,
        }
    }
    found.cloned()
}

pub(crate) fn harvest(body: &[Node]) -> Evidence {
    let scopes = ScopeStack::new();
    let structs = StructRegistry::default();
    let slot_fns = HashSet::new();
    let ctx = ResolveCtx {
        scopes: &scopes,
        structs: &structs,
        slot_fns: &slot_fns,
    };
    let mut evidence = Evidence::default();
    for node in body {
        visit(&mut evidence, &ctx, node);
    }
    log::debug!(
        "harvested call evidence for {} callables across the tree",
        evidence.calls.len()
    );
    evidence
}

fn visit(evidence: &mut Evidence, ctx: &ResolveCtx<'_>, node: &Node) {
    if let Node::Call {
        func: Some(func),
        args,
    } = node
    {
        if let Node::Name { id } = func.as_ref() {
            let vector: Vec<CType> = args.iter().map(|arg| resolve_type(ctx, Some(arg))).collect();
            evidence
                .ctor_calls
                .entry(id.clone())
                .or_default()
                .push(vector.clone());
            evidence.calls.entry(id.clone()).or_default().push(vector);
        }
    }
    // Descend into every child regardless of kind, so call sites nested in
    // other calls' arguments are seen too.
    node.for_each_child(&mut |child| visit(evidence, ctx, child));
}
