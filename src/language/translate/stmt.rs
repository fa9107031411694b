use super::*;
use crate::language::ast::{ExceptHandler, ImportAlias, WithItem};

impl Translator {
    pub(super) fn lower_block(&mut self, body: &[Node], indent: usize) -> String {
        let mut out = String::new();
        for node in body {
            out.push_str(&self.lower_stmt(node, indent));
        }
        out
    }

    /// Total statement dispatch: every node kind produces text (possibly a
    /// fallback comment, possibly nothing for definitions, which land in the
    /// definition buffers instead).
    pub(super) fn lower_stmt(&mut self, node: &Node, indent: usize) -> String {
        match node {
            Node::Assign { targets, value } => {
                self.lower_assign(targets, value.as_deref(), indent)
            }
            Node::FunctionDef { name, params, body } => {
                self.lower_function_def(name, params, body)
            }
            Node::ClassDef { name, body } => self.lower_class_def(name, body),
            Node::Return { value } => self.lower_return(value.as_deref(), indent),
            Node::ExprStmt { value } => self.lower_expr_stmt(value, indent),
            Node::If { test, body, orelse } => self.lower_if(test, body, orelse, indent),
            Node::For { target, iter, body } => self.lower_for(target, iter, body, indent),
            Node::While { test, body } => self.lower_while(test, body, indent),
            Node::Break => format!("{}break;\n", padding(indent)),
            Node::Continue => format!("{}continue;\n", padding(indent)),
            Node::Pass => comment(indent, "pass"),
            Node::Import { names } => lower_import(names, indent),
            Node::ImportFrom { module, names } => lower_import_from(module.as_deref(), names, indent),
            Node::With { items, body } => self.lower_with(items, body, indent),
            Node::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => self.lower_try(body, handlers, orelse, finalbody, indent),
            Node::AsyncFunctionDef { name, .. } => comment(
                indent,
                &format!("async def {name}(...) not supported, rewrite as a sync function"),
            ),
            Node::Module { .. } => unsupported_comment(indent, &Unsupported::node("Module", None)),
            Node::Unsupported { kind, line } => {
                unsupported_comment(indent, &Unsupported::node(kind, *line))
            }
            // Expression kinds in statement position become expression
            // statements.
            other => match self.lower_expr(other) {
                Ok(text) => format!("{}{text};\n", padding(indent)),
                Err(marker) => unsupported_comment(indent, &marker),
            },
        }
    }

    fn lower_expr_stmt(&mut self, value: &Node, indent: usize) -> String {
        if let Node::Call {
            func: Some(func),
            args,
        } = value
        {
            if let Node::Name { id } = func.as_ref() {
                // A call to an output-slot function is fully generated by the
                // assignment that owns the slot wiring; nothing to emit here.
                if self.slot_fns.contains(id) {
                    return String::new();
                }
                if id == "print" {
                    return self.lower_print(args, indent);
                }
            }
        }
        match self.lower_expr(value) {
            Ok(text) => format!("{}{text};\n", padding(indent)),
            Err(marker) => unsupported_comment(indent, &marker),
        }
    }

    fn lower_print(&mut self, args: &[Node], indent: usize) -> String {
        let pad = padding(indent);
        if args.is_empty() {
            return format!("{pad}printf(\"\\n\");\n");
        }
        let mut tokens = Vec::with_capacity(args.len());
        let mut rendered = Vec::with_capacity(args.len());
        for arg in args {
            match self.lower_expr(arg) {
                Ok(text) => {
                    tokens.push(self.resolve(Some(arg)).print_format());
                    rendered.push(text);
                }
                Err(marker) => {
                    return comment(indent, &format!("unsupported print ({})", marker.describe()))
                }
            }
        }
        format!(
            "{pad}printf(\"{}\\n\", {});\n",
            tokens.join(" "),
            rendered.join(", ")
        )
    }

    fn lower_assign(&mut self, targets: &[Node], value: Option<&Node>, indent: usize) -> String {
        let pad = padding(indent);
        let Some(target) = targets.first() else {
            return comment(indent, "unsupported assignment (no target)");
        };
        match target {
            // Field write through the method receiver's storage handle.
            Node::Attribute { value: base, attr } => {
                let receiver = self.receiver.clone();
                if let (Some(recv), Node::Name { id }) = (receiver.as_deref(), base.as_ref()) {
                    if id == recv {
                        let Some(value) = value else {
                            return comment(indent, "unsupported assignment (missing value)");
                        };
                        return match self.lower_expr(value) {
                            Ok(text) => format!("{pad}{recv}->{attr} = {text};\n"),
                            Err(marker) => comment(
                                indent,
                                &format!("unsupported assignment ({})", marker.describe()),
                            ),
                        };
                    }
                }
                comment(indent, "unsupported assignment (attribute target)")
            }
            Node::Name { id: name } => {
                let Some(value) = value else {
                    return comment(indent, "unsupported assignment (missing value)");
                };
                if let Node::Call {
                    func: Some(func),
                    args,
                } = value
                {
                    if let Node::Name { id: callee } = func.as_ref() {
                        if self.structs.contains(callee) {
                            return self.lower_ctor_assign(name, callee, args, indent);
                        }
                        if self.slot_fns.contains(callee) {
                            return self.lower_slot_assign(name, callee, args, indent);
                        }
                    }
                }
                let ty = self.resolve(Some(value));
                match self.lower_expr(value) {
                    Ok(text) => {
                        if self.scopes.declared_here(name) {
                            format!("{pad}{name} = {text};\n")
                        } else {
                            self.scopes.declare(name, ty.clone());
                            format!("{pad}{} {name} = {text};\n", ty.c_name())
                        }
                    }
                    Err(marker) => comment(
                        indent,
                        &format!("unsupported assignment ({})", marker.describe()),
                    ),
                }
            }
            other => comment(
                indent,
                &format!("unsupported assignment (target: {})", other.kind()),
            ),
        }
    }

    /// `name = ClassName(args...)`: struct-typed local plus a separate
    /// initializer call taking the new local's address.
    fn lower_ctor_assign(
        &mut self,
        name: &str,
        class_name: &str,
        args: &[Node],
        indent: usize,
    ) -> String {
        let pad = padding(indent);
        let mut call_args = vec![format!("&{name}")];
        for arg in args {
            match self.lower_expr(arg) {
                Ok(text) => call_args.push(text),
                Err(marker) => {
                    return comment(indent, &format!("unsupported call ({})", marker.describe()))
                }
            }
        }
        let mut out = String::new();
        if !self.scopes.declared_here(name) {
            self.scopes
                .declare(name, CType::Struct(class_name.to_string()));
            out.push_str(&format!("{pad}{class_name} {name};\n"));
        }
        out.push_str(&format!(
            "{pad}{class_name}___init__({});\n",
            call_args.join(", ")
        ));
        out
    }

    /// `name = slotfn(args...)`: numeric local plus a call passing the
    /// local's address as the final argument.
    fn lower_slot_assign(
        &mut self,
        name: &str,
        callee: &str,
        args: &[Node],
        indent: usize,
    ) -> String {
        let pad = padding(indent);
        let mut call_args = Vec::with_capacity(args.len() + 1);
        for arg in args {
            match self.lower_expr(arg) {
                Ok(text) => call_args.push(text),
                Err(marker) => {
                    return comment(indent, &format!("unsupported call ({})", marker.describe()))
                }
            }
        }
        call_args.push(format!("&{name}"));
        let mut out = String::new();
        if !self.scopes.declared_here(name) {
            self.scopes.declare(name, CType::Double);
            out.push_str(&format!("{pad}double {name};\n"));
        }
        out.push_str(&format!("{pad}{callee}({});\n", call_args.join(", ")));
        out
    }

    fn lower_return(&mut self, value: Option<&Node>, indent: usize) -> String {
        let pad = padding(indent);
        match value {
            Some(value) => match self.lower_expr(value) {
                Ok(text) => {
                    if self.in_slot_fn {
                        format!("{pad}*result = {text};\n")
                    } else {
                        format!("{pad}return {text};\n")
                    }
                }
                Err(marker) => comment(
                    indent,
                    &format!("unsupported return ({})", marker.describe()),
                ),
            },
            None => format!("{pad}return;\n"),
        }
    }

    fn lower_if(&mut self, test: &Node, body: &[Node], orelse: &[Node], indent: usize) -> String {
        let pad = padding(indent);
        let test_text = match self.lower_expr(test) {
            Ok(text) => text,
            Err(marker) => {
                return comment(
                    indent,
                    &format!("unsupported if condition ({})", marker.describe()),
                )
            }
        };
        let body_text = self.lower_block(body, indent + 1);
        let mut out = format!("{pad}if ({test_text}) {{\n{body_text}{pad}}}\n");
        match orelse {
            [] => {}
            // A single nested If re-emits as a chained else-if instead of an
            // extra nesting level.
            [Node::If {
                test: nested_test,
                body: nested_body,
                orelse: nested_orelse,
            }] => {
                let chained = self.lower_if(nested_test, nested_body, nested_orelse, indent);
                out.push_str(&format!("{pad}else {}", chained.trim_start()));
            }
            _ => {
                let else_body = self.lower_block(orelse, indent + 1);
                out.push_str(&format!("{pad}else {{\n{else_body}{pad}}}\n"));
            }
        }
        out
    }

    fn lower_while(&mut self, test: &Node, body: &[Node], indent: usize) -> String {
        let pad = padding(indent);
        let test_text = match self.lower_expr(test) {
            Ok(text) => text,
            Err(marker) => {
                return comment(
                    indent,
                    &format!("unsupported while condition ({})", marker.describe()),
                )
            }
        };
        let body_text = self.lower_block(body, indent + 1);
        format!("{pad}while ({test_text}) {{\n{body_text}{pad}}}\n")
    }

    /// Counted loops over a `range` construct only; one argument is the
    /// exclusive bound from zero, two are start and exclusive bound.
    fn lower_for(&mut self, target: &Node, iter: &Node, body: &[Node], indent: usize) -> String {
        let pad = padding(indent);
        let Node::Name { id: var } = target else {
            return comment(indent, "unsupported for loop");
        };
        let Node::Call {
            func: Some(func),
            args,
        } = iter
        else {
            return comment(indent, "unsupported for loop");
        };
        let is_range = matches!(func.as_ref(), Node::Name { id } if id == "range");
        if !is_range || args.is_empty() || args.len() > 2 {
            return comment(indent, "unsupported for loop");
        }
        let (start_node, end_node) = match args[..] {
            [ref end] => (None, end),
            [ref start, ref end] => (Some(start), end),
            _ => unreachable!(),
        };
        let start = match start_node {
            Some(node) => match self.lower_expr(node) {
                Ok(text) => text,
                Err(_) => return comment(indent, "unsupported for loop"),
            },
            None => "0".to_string(),
        };
        let end = match self.lower_expr(end_node) {
            Ok(text) => text,
            Err(_) => return comment(indent, "unsupported for loop"),
        };
        let header_var = if self.scopes.declared_here(var) {
            var.clone()
        } else {
            self.scopes.declare(var, CType::Int);
            format!("int {var}")
        };
        let body_text = self.lower_block(body, indent + 1);
        format!(
            "{pad}for ({header_var} = {start}; {var} < {end}; {var}++) {{\n{body_text}{pad}}}\n"
        )
    }

    fn lower_with(&mut self, items: &[WithItem], body: &[Node], indent: usize) -> String {
        let pad = padding(indent);
        let mut out = String::new();
        for item in items {
            let context = match self.lower_expr(&item.context) {
                Ok(text) => text,
                Err(marker) => format!("<{}>", marker.describe()),
            };
            match &item.alias {
                Some(alias) => {
                    let alias = match self.lower_expr(alias) {
                        Ok(text) => text,
                        Err(marker) => format!("<{}>", marker.describe()),
                    };
                    out.push_str(&format!("{pad}// with {context} as {alias} {{\n"));
                }
                None => out.push_str(&format!("{pad}// with {context} {{\n")),
            }
        }
        out.push_str(&self.lower_block(body, indent + 1));
        out.push_str(&format!("{pad}// }}\n"));
        out
    }

    fn lower_try(
        &mut self,
        body: &[Node],
        handlers: &[ExceptHandler],
        orelse: &[Node],
        finalbody: &[Node],
        indent: usize,
    ) -> String {
        let pad = padding(indent);
        let mut out = format!("{pad}// try {{\n");
        out.push_str(&self.lower_block(body, indent + 1));
        out.push_str(&format!("{pad}// }}\n"));
        for handler in handlers {
            let ty = match &handler.ty {
                Some(ty) => match self.lower_expr(ty) {
                    Ok(text) => text,
                    Err(marker) => format!("<{}>", marker.describe()),
                },
                None => String::new(),
            };
            out.push_str(&format!("{pad}// except ({ty}) {{\n"));
            out.push_str(&self.lower_block(&handler.body, indent + 1));
            out.push_str(&format!("{pad}// }}\n"));
        }
        if !orelse.is_empty() {
            out.push_str(&format!("{pad}// else {{\n"));
            out.push_str(&self.lower_block(orelse, indent + 1));
            out.push_str(&format!("{pad}// }}\n"));
        }
        if !finalbody.is_empty() {
            out.push_str(&format!("{pad}// finally {{\n"));
            out.push_str(&self.lower_block(finalbody, indent + 1));
            out.push_str(&format!("{pad}// }}\n"));
        }
        out
    }
}

fn lower_import(names: &[ImportAlias], indent: usize) -> String {
    comment(indent, &format!("import {}", render_aliases(names)))
}

fn lower_import_from(module: Option<&str>, names: &[ImportAlias], indent: usize) -> String {
    comment(
        indent,
        &format!(
            "from {} import {}",
            module.unwrap_or_default(),
            render_aliases(names)
        ),
    )
}

fn render_aliases(names: &[ImportAlias]) -> String {
    names
        .iter()
        .map(|alias| match &alias.asname {
            Some(asname) => format!("{} as {}", alias.name, asname),
            None => alias.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
