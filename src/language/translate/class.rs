use super::*;
use crate::language::types::TEXT_DEFAULT;
use std::collections::HashMap;

impl Translator {
    /// Lowers a class to one struct definition plus one free function per
    /// method, all appended to the struct/method buffer; nothing inline.
    ///
    /// Field types are fixed in two rounds: receiver-attribute writes across
    /// the method bodies first, then constructor call-site evidence, which
    /// overrides the first round wherever a field shares a constructor
    /// parameter's name.
    pub(super) fn lower_class_def(&mut self, name: &str, body: &[Node]) -> String {
        let init_params = constructor_params(body);
        let ctor_types: HashMap<String, CType> = init_params
            .iter()
            .enumerate()
            .map(|(index, param)| (param.clone(), self.evidence.ctor_param_type(name, index)))
            .collect();

        let mut writes: Vec<(String, Option<&Node>)> = Vec::new();
        for stmt in body {
            if let Node::FunctionDef {
                params,
                body: method_body,
                ..
            } = stmt
            {
                let recv = params.first().map(String::as_str).unwrap_or("self");
                collect_receiver_writes(recv, method_body, &mut writes);
            }
        }
        let mut fields: Vec<(String, CType)> = Vec::new();
        for (field, value) in &writes {
            let ty = match value {
                Some(Node::Name { id }) if ctor_types.contains_key(id.as_str()) => {
                    ctor_types[id.as_str()].clone()
                }
                value => self.resolve(*value),
            };
            upsert_field(&mut fields, field, ty);
        }
        for (field, ty) in fields.iter_mut() {
            if let Some(ctor_ty) = ctor_types.get(field.as_str()) {
                *ty = ctor_ty.clone();
            }
        }

        // Register before lowering methods so receiver-field reads resolve.
        self.structs.insert(StructDef {
            name: name.to_string(),
            fields: fields.clone(),
        });
        let mut struct_text = String::from("typedef struct {\n");
        for (field, ty) in &fields {
            struct_text.push_str(&format!("    {} {field};\n", ty.c_name()));
        }
        struct_text.push_str(&format!("}} {name};\n"));
        self.struct_defs.push(struct_text);

        for stmt in body {
            if let Node::FunctionDef {
                name: method,
                params,
                body: method_body,
            } = stmt
            {
                self.lower_method(name, &fields, &ctor_types, method, params, method_body);
            }
        }
        log::debug!(
            "translated class `{name}` ({} fields, {} statements)",
            fields.len(),
            body.len()
        );
        String::new()
    }

    fn lower_method(
        &mut self,
        class_name: &str,
        fields: &[(String, CType)],
        ctor_types: &HashMap<String, CType>,
        method: &str,
        params: &[String],
        body: &[Node],
    ) {
        let recv = params
            .first()
            .cloned()
            .unwrap_or_else(|| "self".to_string());
        let mut signature = vec![format!("{class_name}* {recv}")];

        self.scopes.push();
        self.scopes
            .declare(&recv, CType::Struct(class_name.to_string()));
        for param in params.iter().skip(1) {
            let ty = fields
                .iter()
                .find(|(field, _)| field == param)
                .map(|(_, ty)| ty.clone())
                .or_else(|| ctor_types.get(param.as_str()).cloned())
                .unwrap_or(TEXT_DEFAULT);
            signature.push(format!("{} {param}", ty.c_name()));
            self.scopes.declare(param, ty);
        }

        let return_type = self.method_return_type(&recv, class_name, body);
        let saved_receiver = self.receiver.replace(recv.clone());
        let was_slot_fn = std::mem::replace(&mut self.in_slot_fn, false);
        let body_text = self.lower_block(body, 1);
        self.in_slot_fn = was_slot_fn;
        self.receiver = saved_receiver;
        self.scopes.pop();

        self.struct_defs.push(format!(
            "{return_type} {class_name}_{method}({}) {{\n{body_text}}}\n",
            signature.join(", ")
        ));
    }

    /// A method returning a direct receiver-field read mirrors that field's
    /// type; any other valued return goes through the resolver; no valued
    /// return means void.
    fn method_return_type(&self, recv: &str, class_name: &str, body: &[Node]) -> String {
        match first_valued_return(body) {
            Some(value) => {
                if let Node::Attribute { value: base, attr } = value {
                    if matches!(base.as_ref(), Node::Name { id } if id == recv) {
                        if let Some(ty) = self.structs.field_type(class_name, attr) {
                            return ty.c_name().to_string();
                        }
                    }
                }
                self.resolve(Some(value)).c_name().to_string()
            }
            None => "void".to_string(),
        }
    }
}

fn constructor_params(body: &[Node]) -> Vec<String> {
    body.iter()
        .find_map(|stmt| match stmt {
            Node::FunctionDef { name, params, .. } if name == "__init__" => {
                Some(params.iter().skip(1).cloned().collect())
            }
            _ => None,
        })
        .unwrap_or_default()
}

/// Receiver-attribute writes in a method body, through control flow but not
/// into nested definitions.
fn collect_receiver_writes<'a>(
    recv: &str,
    body: &'a [Node],
    out: &mut Vec<(String, Option<&'a Node>)>,
) {
    for stmt in body {
        match stmt {
            Node::Assign { targets, value } => {
                if let Some(Node::Attribute { value: base, attr }) = targets.first() {
                    if matches!(base.as_ref(), Node::Name { id } if id == recv) {
                        out.push((attr.clone(), value.as_deref()));
                    }
                }
            }
            Node::If { body, orelse, .. } => {
                collect_receiver_writes(recv, body, out);
                collect_receiver_writes(recv, orelse, out);
            }
            Node::For { body, .. } | Node::While { body, .. } | Node::With { body, .. } => {
                collect_receiver_writes(recv, body, out);
            }
            Node::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                collect_receiver_writes(recv, body, out);
                for handler in handlers {
                    collect_receiver_writes(recv, &handler.body, out);
                }
                collect_receiver_writes(recv, orelse, out);
                collect_receiver_writes(recv, finalbody, out);
            }
            _ => {}
        }
    }
}

fn upsert_field(fields: &mut Vec<(String, CType)>, name: &str, ty: CType) {
    match fields.iter_mut().find(|(field, _)| field == name) {
        Some(slot) => slot.1 = ty,
        None => fields.push((name.to_string(), ty)),
    }
}

/// First return statement carrying a value, looking through control flow.
fn first_valued_return(body: &[Node]) -> Option<&Node> {
    for stmt in body {
        match stmt {
            Node::Return { value: Some(value) } => return Some(value),
            Node::If { body, orelse, .. } => {
                if let Some(found) =
                    first_valued_return(body).or_else(|| first_valued_return(orelse))
                {
                    return Some(found);
                }
            }
            Node::For { body, .. } | Node::While { body, .. } | Node::With { body, .. } => {
                if let Some(found) = first_valued_return(body) {
                    return Some(found);
                }
            }
            Node::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                if let Some(found) = first_valued_return(body)
                    .or_else(|| {
                        handlers
                            .iter()
                            .find_map(|handler| first_valued_return(&handler.body))
                    })
                    .or_else(|| first_valued_return(orelse))
                    .or_else(|| first_valued_return(finalbody))
                {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}
