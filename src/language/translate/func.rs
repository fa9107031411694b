use super::*;

impl Translator {
    /// Lowers a free function into the free-function buffer; the statement
    /// itself emits nothing inline.
    ///
    /// Every function containing a return statement anywhere in its body is
    /// rewritten to the output-slot convention: a trailing `double* result`
    /// parameter, with each valued return lowered to a write through it.
    pub(super) fn lower_function_def(
        &mut self,
        name: &str,
        params: &[String],
        body: &[Node],
    ) -> String {
        let param_types: Vec<CType> = (0..params.len())
            .map(|index| self.evidence.param_type(name, index))
            .collect();
        let has_return = block_has_return(body);

        self.scopes.push();
        let mut signature = Vec::with_capacity(params.len() + 1);
        for (param, ty) in params.iter().zip(&param_types) {
            signature.push(format!("{} {param}", ty.c_name()));
            self.scopes.declare(param, ty.clone());
        }
        if has_return {
            signature.push("double* result".to_string());
        }

        let was_slot_fn = std::mem::replace(&mut self.in_slot_fn, has_return);
        let saved_receiver = self.receiver.take();
        let body_text = self.lower_block(body, 1);
        self.in_slot_fn = was_slot_fn;
        self.receiver = saved_receiver;
        self.scopes.pop();

        self.fn_defs.push(format!(
            "void {name}({}) {{\n{body_text}}}\n",
            signature.join(", ")
        ));
        // Registered only now, so self-recursive calls in the body resolved
        // as ordinary names.
        if has_return {
            self.slot_fns.insert(name.to_string());
        }
        log::debug!(
            "translated function `{name}` ({} params, output slot: {has_return})",
            params.len()
        );
        String::new()
    }
}

/// Whether a body returns, looking through control flow but not into nested
/// function or class definitions.
pub(super) fn block_has_return(body: &[Node]) -> bool {
    body.iter().any(|node| match node {
        Node::Return { .. } => true,
        Node::If { body, orelse, .. } => block_has_return(body) || block_has_return(orelse),
        Node::For { body, .. } | Node::While { body, .. } | Node::With { body, .. } => {
            block_has_return(body)
        }
        Node::Try {
            body,
            handlers,
            orelse,
            finalbody,
        } => {
            block_has_return(body)
                || handlers.iter().any(|handler| block_has_return(&handler.body))
                || block_has_return(orelse)
                || block_has_return(finalbody)
        }
        _ => false,
    })
}
