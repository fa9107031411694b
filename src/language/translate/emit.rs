use super::Translator;

impl Translator {
    /// Final assembly, in fixed order: header block, struct and method
    /// definitions, free functions, then the program entry holding the
    /// translated top-level statements.
    pub(super) fn assemble(&self, main_body: &str) -> String {
        let mut out = String::new();
        out.push_str("#include <stdio.h>\n");
        if self.uses_pow {
            out.push_str("#include <math.h>\n");
        }
        out.push('\n');
        for def in &self.struct_defs {
            out.push_str(def);
            out.push('\n');
        }
        for def in &self.fn_defs {
            out.push_str(def);
            out.push('\n');
        }
        out.push_str("int main() {\n");
        out.push_str(main_body);
        out.push_str("    return 0;\n}\n");
        out
    }
}
