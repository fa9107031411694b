use super::scopes::ScopeStack;
use super::StructRegistry;
use crate::language::ast::{Literal, Node};
use crate::language::types::{CType, NUMERIC_DEFAULT, TEXT_DEFAULT};

/// Everything type resolution may consult. The harvester resolves against an
/// empty context (no declarations are known yet); the translator passes its
/// live state.
pub(crate) struct ResolveCtx<'a> {
    pub scopes: &'a ScopeStack,
    pub structs: &'a StructRegistry,
    pub slot_fns: &'a std::collections::HashSet<String>,
}

/// Best-known C type of an expression. Deterministic and side-effect-free;
/// used both while harvesting call evidence and while deciding declaration
/// types during translation.
///
/// Rules, in priority order: constant shape, scope binding (absent names
/// default numeric, since declarations usually precede uses), constructor
/// calls, output-slot function calls, receiver fields. Everything else is
/// the text default.
pub(crate) fn resolve_type(ctx: &ResolveCtx<'_>, node: Option<&Node>) -> CType {
    let Some(node) = node else {
        return TEXT_DEFAULT;
    };
    match node {
        Node::Constant { value } => match value {
            Literal::Int(_) | Literal::Float(_) => NUMERIC_DEFAULT,
            Literal::Str(_) => TEXT_DEFAULT,
            _ => TEXT_DEFAULT,
        },
        Node::Name { id } => ctx
            .scopes
            .lookup(id)
            .cloned()
            .unwrap_or(NUMERIC_DEFAULT),
        Node::Call {
            func: Some(func), ..
        } => {
            if let Node::Name { id } = func.as_ref() {
                if ctx.structs.contains(id) {
                    return CType::Struct(id.clone());
                }
                if ctx.slot_fns.contains(id) {
                    return NUMERIC_DEFAULT;
                }
            }
            TEXT_DEFAULT
        }
        Node::Attribute { value, attr } => match resolve_type(ctx, Some(value)) {
            CType::Struct(struct_name) => ctx
                .structs
                .field_type(&struct_name, attr)
                .cloned()
                .unwrap_or(TEXT_DEFAULT),
            _ => TEXT_DEFAULT,
        },
        _ => TEXT_DEFAULT,
    }
}
