//! Conversion from the JSON dump of a Python `ast` tree into the node model.
//!
//! Only the program root can fail to decode. Below the root every unknown or
//! malformed node becomes [`Node::Unsupported`], so one bad statement never
//! aborts a whole-program translation.

use crate::language::ast::{
    BinaryOperator, CompareOperator, ExceptHandler, ImportAlias, Literal, Node, Program, WithItem,
};
use crate::language::errors::DecodeError;
use serde_json::{Map, Value};

type Object = Map<String, Value>;

pub fn program_from_value(value: &Value) -> Result<Program, DecodeError> {
    let root = value.as_object().ok_or(DecodeError::RootNotObject)?;
    let body = root
        .get("body")
        .and_then(Value::as_array)
        .ok_or(DecodeError::MissingBody)?;
    Ok(Program {
        body: body.iter().map(node_from_value).collect(),
    })
}

pub fn node_from_value(value: &Value) -> Node {
    let Some(obj) = value.as_object() else {
        return Node::Unsupported {
            kind: "<non-object>".to_string(),
            line: None,
        };
    };
    let line = line_of(obj);
    let Some(kind) = obj.get("_type").and_then(Value::as_str) else {
        return Node::Unsupported {
            kind: "<untagged>".to_string(),
            line,
        };
    };
    match kind {
        "Module" => Node::Module {
            body: node_list(obj, "body"),
        },
        "Assign" => Node::Assign {
            targets: node_list(obj, "targets"),
            value: opt_node(obj, "value"),
        },
        "Call" => Node::Call {
            func: opt_node(obj, "func"),
            args: node_list(obj, "args"),
        },
        "FunctionDef" => match str_field(obj, "name") {
            Some(name) => Node::FunctionDef {
                name,
                params: param_names(obj),
                body: node_list(obj, "body"),
            },
            None => unsupported(kind, line),
        },
        "ClassDef" => match str_field(obj, "name") {
            Some(name) => Node::ClassDef {
                name,
                body: node_list(obj, "body"),
            },
            None => unsupported(kind, line),
        },
        "Return" => Node::Return {
            value: opt_node(obj, "value"),
        },
        "Expr" => match opt_node(obj, "value") {
            Some(value) => Node::ExprStmt { value },
            None => unsupported(kind, line),
        },
        "If" => match opt_node(obj, "test") {
            Some(test) => Node::If {
                test,
                body: node_list(obj, "body"),
                orelse: node_list(obj, "orelse"),
            },
            None => unsupported(kind, line),
        },
        "For" => match (opt_node(obj, "target"), opt_node(obj, "iter")) {
            (Some(target), Some(iter)) => Node::For {
                target,
                iter,
                body: node_list(obj, "body"),
            },
            _ => unsupported(kind, line),
        },
        "While" => match opt_node(obj, "test") {
            Some(test) => Node::While {
                test,
                body: node_list(obj, "body"),
            },
            None => unsupported(kind, line),
        },
        "Break" => Node::Break,
        "Continue" => Node::Continue,
        "Pass" => Node::Pass,
        "List" => Node::List {
            elts: node_list(obj, "elts"),
        },
        "Dict" => Node::Dict {
            keys: nullable_node_list(obj, "keys"),
            values: node_list(obj, "values"),
        },
        "Attribute" => match (opt_node(obj, "value"), str_field(obj, "attr")) {
            (Some(value), Some(attr)) => Node::Attribute { value, attr },
            _ => unsupported(kind, line),
        },
        "Name" => match str_field(obj, "id") {
            Some(id) => Node::Name { id },
            None => unsupported(kind, line),
        },
        "Constant" => literal_node(obj, line),
        "Import" => Node::Import {
            names: aliases(obj),
        },
        "ImportFrom" => Node::ImportFrom {
            module: str_field(obj, "module"),
            names: aliases(obj),
        },
        "With" => Node::With {
            items: with_items(obj),
            body: node_list(obj, "body"),
        },
        "Try" => Node::Try {
            body: node_list(obj, "body"),
            handlers: handlers(obj),
            orelse: node_list(obj, "orelse"),
            finalbody: node_list(obj, "finalbody"),
        },
        "AsyncFunctionDef" => match str_field(obj, "name") {
            Some(name) => Node::AsyncFunctionDef {
                name,
                body: node_list(obj, "body"),
            },
            None => unsupported(kind, line),
        },
        "Await" => match opt_node(obj, "value") {
            Some(value) => Node::Await { value },
            None => unsupported(kind, line),
        },
        "Compare" => match opt_node(obj, "left") {
            Some(left) => Node::Compare {
                left,
                ops: compare_ops(obj),
                comparators: node_list(obj, "comparators"),
            },
            None => unsupported(kind, line),
        },
        "BinOp" => match (opt_node(obj, "left"), opt_node(obj, "right")) {
            (Some(left), Some(right)) => Node::BinOp {
                left,
                op: binary_op(obj),
                right,
            },
            _ => unsupported(kind, line),
        },
        _ => Node::Unsupported {
            kind: kind.to_string(),
            line,
        },
    }
}

fn unsupported(kind: &str, line: Option<u64>) -> Node {
    Node::Unsupported {
        kind: kind.to_string(),
        line,
    }
}

fn line_of(obj: &Object) -> Option<u64> {
    obj.get("lineno").and_then(Value::as_u64)
}

fn str_field(obj: &Object, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(String::from)
}

fn opt_node(obj: &Object, key: &str) -> Option<Box<Node>> {
    obj.get(key)
        .filter(|value| !value.is_null())
        .map(|value| Box::new(node_from_value(value)))
}

fn node_list(obj: &Object, key: &str) -> Vec<Node> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|nodes| nodes.iter().map(node_from_value).collect())
        .unwrap_or_default()
}

fn nullable_node_list(obj: &Object, key: &str) -> Vec<Option<Node>> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .map(|value| (!value.is_null()).then(|| node_from_value(value)))
                .collect()
        })
        .unwrap_or_default()
}

fn literal_node(obj: &Object, line: Option<u64>) -> Node {
    let value = match obj.get("value") {
        None | Some(Value::Null) => Literal::None,
        Some(Value::Bool(flag)) => Literal::Bool(*flag),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(int) => Literal::Int(int),
            None => match number.as_f64() {
                Some(float) => Literal::Float(float),
                None => return unsupported("Constant", line),
            },
        },
        Some(Value::String(text)) => Literal::Str(text.clone()),
        Some(_) => return unsupported("Constant", line),
    };
    Node::Constant { value }
}

/// Parameter names of a function node: `args.args[].arg` in the input shape.
fn param_names(obj: &Object) -> Vec<String> {
    obj.get("args")
        .and_then(Value::as_object)
        .and_then(|args| args.get("args"))
        .and_then(Value::as_array)
        .map(|params| {
            params
                .iter()
                .filter_map(|param| param.get("arg").and_then(Value::as_str).map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn aliases(obj: &Object) -> Vec<ImportAlias> {
    obj.get("names")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(|alias| {
                    let alias = alias.as_object()?;
                    Some(ImportAlias {
                        name: str_field(alias, "name")?,
                        asname: str_field(alias, "asname"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn with_items(obj: &Object) -> Vec<WithItem> {
    obj.get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let item = item.as_object()?;
                    Some(WithItem {
                        context: item
                            .get("context_expr")
                            .map(node_from_value)
                            .unwrap_or_else(|| unsupported("withitem", None)),
                        alias: item
                            .get("optional_vars")
                            .filter(|value| !value.is_null())
                            .map(node_from_value),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn handlers(obj: &Object) -> Vec<ExceptHandler> {
    obj.get("handlers")
        .and_then(Value::as_array)
        .map(|handlers| {
            handlers
                .iter()
                .filter_map(|handler| {
                    let handler = handler.as_object()?;
                    Some(ExceptHandler {
                        ty: handler
                            .get("type")
                            .filter(|value| !value.is_null())
                            .map(node_from_value),
                        body: node_list(handler, "body"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn binary_op(obj: &Object) -> BinaryOperator {
    match op_kind(obj, "op").as_deref() {
        Some("Add") => BinaryOperator::Add,
        Some("Sub") => BinaryOperator::Sub,
        Some("Mult") => BinaryOperator::Mult,
        Some("Div") => BinaryOperator::Div,
        Some("Mod") => BinaryOperator::Mod,
        Some("Pow") => BinaryOperator::Pow,
        Some(other) => BinaryOperator::Other(other.to_string()),
        None => BinaryOperator::Other("<unknown>".to_string()),
    }
}

fn compare_ops(obj: &Object) -> Vec<CompareOperator> {
    obj.get("ops")
        .and_then(Value::as_array)
        .map(|ops| {
            ops.iter()
                .map(|op| {
                    match op
                        .as_object()
                        .and_then(|op| op.get("_type"))
                        .and_then(Value::as_str)
                    {
                        Some("Gt") => CompareOperator::Gt,
                        Some("Lt") => CompareOperator::Lt,
                        Some("Eq") => CompareOperator::Eq,
                        Some("NotEq") => CompareOperator::NotEq,
                        Some("GtE") => CompareOperator::GtE,
                        Some("LtE") => CompareOperator::LtE,
                        Some(other) => CompareOperator::Other(other.to_string()),
                        None => CompareOperator::Other("<unknown>".to_string()),
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

fn op_kind(obj: &Object, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_object)
        .and_then(|op| op.get("_type"))
        .and_then(Value::as_str)
        .map(String::from)
}
