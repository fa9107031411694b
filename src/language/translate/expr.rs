use super::*;
use crate::language::ast::{BinaryOperator, CompareOperator, Literal};

impl Translator {
    pub(super) fn lower_expr(&mut self, node: &Node) -> Lowered {
        match node {
            Node::Name { id } => Ok(id.clone()),
            Node::Constant { value } => lower_literal(value),
            Node::BinOp { left, op, right } => {
                let left = self.lower_expr(left)?;
                let right = self.lower_expr(right)?;
                match op {
                    BinaryOperator::Add => Ok(format!("({left} + {right})")),
                    BinaryOperator::Sub => Ok(format!("({left} - {right})")),
                    BinaryOperator::Mult => Ok(format!("({left} * {right})")),
                    BinaryOperator::Div => Ok(format!("({left} / {right})")),
                    BinaryOperator::Mod => Ok(format!("({left} % {right})")),
                    BinaryOperator::Pow => {
                        self.uses_pow = true;
                        Ok(format!("pow({left}, {right})"))
                    }
                    BinaryOperator::Other(name) => {
                        Err(Unsupported::new(format!("binary operator: {name}")))
                    }
                }
            }
            Node::Compare {
                left,
                ops,
                comparators,
            } => {
                if ops.len() != 1 || comparators.len() != 1 {
                    return Err(Unsupported::new("chained comparison"));
                }
                let symbol = match (&ops[0], ops[0].c_symbol()) {
                    (_, Some(symbol)) => symbol,
                    (CompareOperator::Other(name), None) => {
                        return Err(Unsupported::new(format!("comparison operator: {name}")))
                    }
                    (_, None) => return Err(Unsupported::new("comparison operator")),
                };
                let left = self.lower_expr(left)?;
                let right = self.lower_expr(&comparators[0])?;
                Ok(format!("{left} {symbol} {right}"))
            }
            Node::Attribute { value, attr } => {
                let base = self.lower_expr(value)?;
                if self.receiver.as_deref() == Some(base.as_str()) {
                    Ok(format!("{base}->{attr}"))
                } else {
                    Ok(format!("{base}.{attr}"))
                }
            }
            Node::Call { func, args } => self.lower_call_expr(func.as_deref(), args),
            Node::List { elts } => {
                let mut rendered = Vec::with_capacity(elts.len());
                for elt in elts {
                    rendered.push(self.lower_expr(elt)?);
                }
                Ok(format!("{{{}}}", rendered.join(", ")))
            }
            Node::Dict { .. } => Err(Unsupported::new("dict literal")),
            Node::Await { .. } => Err(Unsupported::new("await expression")),
            Node::Unsupported { kind, line } => Err(Unsupported::node(kind, *line)),
            other => Err(Unsupported::new(format!("node: {}", other.kind()))),
        }
    }

    fn lower_call_expr(&mut self, func: Option<&Node>, args: &[Node]) -> Lowered {
        let Some(func) = func else {
            return Err(Unsupported::new("call without callee"));
        };
        match func {
            // Instance method: lowered to a free function on the receiver's
            // struct type, receiver address first.
            Node::Attribute { value, attr } => {
                let Node::Name { id: recv } = value.as_ref() else {
                    return Err(Unsupported::new(format!(
                        "method call on {}",
                        value.kind()
                    )));
                };
                let Some(CType::Struct(struct_name)) = self.scopes.lookup(recv).cloned() else {
                    return Err(Unsupported::new(format!("method call on `{recv}`")));
                };
                // Inside a method the receiver is already a pointer.
                let recv_arg = if self.receiver.as_deref() == Some(recv.as_str()) {
                    recv.clone()
                } else {
                    format!("&{recv}")
                };
                let mut call_args = vec![recv_arg];
                for arg in args {
                    call_args.push(self.lower_expr(arg)?);
                }
                Ok(format!("{struct_name}_{attr}({})", call_args.join(", ")))
            }
            Node::Name { id } => {
                if self.structs.contains(id) {
                    return Err(Unsupported::new(format!(
                        "constructor `{id}` in expression position"
                    )));
                }
                if self.slot_fns.contains(id) {
                    return Err(Unsupported::new(format!(
                        "call to `{id}` in expression position"
                    )));
                }
                let mut call_args = Vec::with_capacity(args.len());
                for arg in args {
                    call_args.push(self.lower_expr(arg)?);
                }
                Ok(format!("{id}({})", call_args.join(", ")))
            }
            other => Err(Unsupported::new(format!("call through {}", other.kind()))),
        }
    }
}

fn lower_literal(literal: &Literal) -> Lowered {
    match literal {
        Literal::Int(value) => Ok(value.to_string()),
        Literal::Float(value) => Ok(format_float(*value)),
        Literal::Str(text) => Ok(format!("\"{}\"", escape_c(text))),
        Literal::Bool(true) => Ok("1".to_string()),
        Literal::Bool(false) => Ok("0".to_string()),
        Literal::None => Err(Unsupported::new("None constant")),
    }
}

fn format_float(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || text.contains('e') {
        text
    } else {
        format!("{text}.0")
    }
}

fn escape_c(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}
