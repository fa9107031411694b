use super::*;
use crate::language::decode::{node_from_value, program_from_value};
use crate::language::types::{CType, NUMERIC_DEFAULT, TEXT_DEFAULT};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn program(body: Vec<Value>) -> Program {
    program_from_value(&json!({"_type": "Module", "body": body})).expect("valid program root")
}

fn c_of(body: Vec<Value>) -> String {
    translate_program(&program(body))
}

fn name(id: &str) -> Value {
    json!({"_type": "Name", "id": id})
}

fn num(value: i64) -> Value {
    json!({"_type": "Constant", "value": value})
}

fn text(value: &str) -> Value {
    json!({"_type": "Constant", "value": value})
}

fn assign(target: &str, value: Value) -> Value {
    json!({"_type": "Assign", "targets": [name(target)], "value": value})
}

fn attr_assign(base: &str, attr: &str, value: Value) -> Value {
    json!({
        "_type": "Assign",
        "targets": [{"_type": "Attribute", "value": name(base), "attr": attr}],
        "value": value,
    })
}

fn call(func: &str, args: Vec<Value>) -> Value {
    json!({"_type": "Call", "func": name(func), "args": args})
}

fn method_call(recv: &str, method: &str, args: Vec<Value>) -> Value {
    json!({
        "_type": "Call",
        "func": {"_type": "Attribute", "value": name(recv), "attr": method},
        "args": args,
    })
}

fn expr_stmt(value: Value) -> Value {
    json!({"_type": "Expr", "value": value})
}

fn ret(value: Value) -> Value {
    json!({"_type": "Return", "value": value})
}

fn func_def(fn_name: &str, params: Vec<&str>, body: Vec<Value>) -> Value {
    let params: Vec<Value> = params
        .iter()
        .map(|param| json!({"_type": "arg", "arg": param}))
        .collect();
    json!({
        "_type": "FunctionDef",
        "name": fn_name,
        "args": {"args": params},
        "body": body,
    })
}

fn class_def(class_name: &str, body: Vec<Value>) -> Value {
    json!({"_type": "ClassDef", "name": class_name, "body": body})
}

fn binop(left: Value, op: &str, right: Value) -> Value {
    json!({"_type": "BinOp", "left": left, "op": {"_type": op}, "right": right})
}

fn compare(left: Value, op: &str, right: Value) -> Value {
    json!({
        "_type": "Compare",
        "left": left,
        "ops": [{"_type": op}],
        "comparators": [right],
    })
}

fn pass() -> Value {
    json!({"_type": "Pass"})
}

// --- resolver ---

#[test]
fn defaulting_policies_are_the_documented_constants() {
    assert_eq!(NUMERIC_DEFAULT, CType::Double);
    assert_eq!(TEXT_DEFAULT, CType::CharPtr);
}

#[test]
fn constants_resolve_by_literal_shape() {
    let translator = Translator::new(Evidence::default());
    let int = node_from_value(&json!({"_type": "Constant", "value": 3}));
    let float = node_from_value(&json!({"_type": "Constant", "value": 2.5}));
    let string = node_from_value(&json!({"_type": "Constant", "value": "hi"}));
    assert_eq!(translator.resolve(Some(&int)), CType::Double);
    assert_eq!(translator.resolve(Some(&float)), CType::Double);
    assert_eq!(translator.resolve(Some(&string)), CType::CharPtr);
}

#[test]
fn unbound_names_take_the_numeric_default() {
    let translator = Translator::new(Evidence::default());
    let unbound = node_from_value(&name("mystery"));
    assert_eq!(translator.resolve(Some(&unbound)), NUMERIC_DEFAULT);
}

#[test]
fn unresolvable_shapes_take_the_text_default() {
    let translator = Translator::new(Evidence::default());
    let attribute = node_from_value(&json!({
        "_type": "Attribute", "value": name("mystery"), "attr": "field",
    }));
    let arithmetic = node_from_value(&binop(num(1), "Add", num(2)));
    assert_eq!(translator.resolve(Some(&attribute)), TEXT_DEFAULT);
    assert_eq!(translator.resolve(Some(&arithmetic)), TEXT_DEFAULT);
    assert_eq!(translator.resolve(None), TEXT_DEFAULT);
}

// --- call-site evidence ---

#[test]
fn evidence_records_one_vector_per_call_site_in_order() {
    let program = program(vec![
        expr_stmt(call("f", vec![num(1)])),
        expr_stmt(call("f", vec![text("s")])),
    ]);
    let evidence = harvest(&program.body);
    assert_eq!(
        evidence.call_sites("f").to_vec(),
        vec![vec![CType::Double], vec![CType::CharPtr]]
    );
}

#[test]
fn evidence_sees_calls_nested_inside_other_calls() {
    let nested = json!({
        "_type": "Call",
        "func": name("g"),
        "args": [call("f", vec![num(1)])],
    });
    let program = program(vec![expr_stmt(nested)]);
    let evidence = harvest(&program.body);
    assert_eq!(evidence.call_sites("f").to_vec(), vec![vec![CType::Double]]);
    // The inner call is an unresolvable argument shape at harvest time.
    assert_eq!(evidence.call_sites("g").to_vec(), vec![vec![CType::CharPtr]]);
}

#[test]
fn conflicting_evidence_falls_back_per_table() {
    let program = program(vec![
        expr_stmt(call("f", vec![num(1)])),
        expr_stmt(call("f", vec![text("s")])),
    ]);
    let evidence = harvest(&program.body);
    assert_eq!(evidence.param_type("f", 0), NUMERIC_DEFAULT);
    assert_eq!(evidence.ctor_param_type("f", 0), TEXT_DEFAULT);
    // Absent evidence falls back the same way.
    assert_eq!(evidence.param_type("unseen", 0), NUMERIC_DEFAULT);
}

// --- functions and the output-slot convention ---

#[test]
fn function_without_return_keeps_the_plain_signature() {
    let c = c_of(vec![func_def("ping", vec![], vec![pass()])]);
    assert!(c.contains("void ping() {\n    // pass\n}\n"));
    assert!(!c.contains("result"));
}

#[test]
fn function_with_return_gains_the_output_slot() {
    let c = c_of(vec![
        func_def(
            "add",
            vec!["x", "y"],
            vec![ret(binop(name("x"), "Add", name("y")))],
        ),
        assign("c", call("add", vec![num(3), num(4)])),
    ]);
    assert!(c.contains("void add(double x, double y, double* result) {\n"));
    assert!(c.contains("    *result = (x + y);\n"));
    assert!(!c.contains("return (x + y);"));
    // The assignment owns the slot wiring.
    assert!(c.contains("    double c;\n    add(3, 4, &c);\n"));
}

#[test]
fn returns_inside_control_flow_still_use_the_slot() {
    let body = vec![
        json!({
            "_type": "If",
            "test": compare(name("x"), "Gt", num(0)),
            "body": [ret(num(1))],
            "orelse": [],
        }),
        ret(num(0)),
    ];
    let c = c_of(vec![func_def("sign", vec!["x"], body)]);
    assert!(c.contains("void sign(double x, double* result) {\n"));
    assert!(c.contains("        *result = 1;\n"));
    assert!(c.contains("    *result = 0;\n"));
}

#[test]
fn conflicting_call_sites_fix_the_parameter_to_the_numeric_default() {
    let c = c_of(vec![
        func_def("f", vec!["a"], vec![pass()]),
        expr_stmt(call("f", vec![num(1)])),
        expr_stmt(call("f", vec![text("s")])),
    ]);
    assert!(c.contains("void f(double a) {\n"));
    assert!(c.contains("    f(1);\n"));
    assert!(c.contains("    f(\"s\");\n"));
}

#[test]
fn statement_call_to_a_slot_function_is_suppressed() {
    let c = c_of(vec![
        func_def("give", vec![], vec![ret(num(42))]),
        expr_stmt(call("give", vec![])),
    ]);
    assert!(!c.contains("give();"));
}

// --- classes ---

#[test]
fn constructor_evidence_fixes_struct_fields_and_init_parameters() {
    let init = func_def(
        "__init__",
        vec!["self", "x", "y"],
        vec![
            attr_assign("self", "x", name("x")),
            attr_assign("self", "y", name("y")),
        ],
    );
    let c = c_of(vec![
        class_def("Point", vec![init]),
        assign("p", call("Point", vec![num(1), num(2)])),
        assign("q", call("Point", vec![num(3), num(4)])),
    ]);
    assert!(c.contains("typedef struct {\n    double x;\n    double y;\n} Point;\n"));
    assert!(c.contains("void Point___init__(Point* self, double x, double y) {\n"));
    assert!(c.contains("    self->x = x;\n"));
    assert!(c.contains("    Point p;\n    Point___init__(&p, 1, 2);\n"));
    assert!(c.contains("    Point q;\n    Point___init__(&q, 3, 4);\n"));
}

#[test]
fn conflicting_constructor_evidence_falls_back_to_the_text_default() {
    let init = func_def(
        "__init__",
        vec!["self", "x"],
        vec![attr_assign("self", "x", name("x"))],
    );
    let c = c_of(vec![
        class_def("Box", vec![init]),
        assign("a", call("Box", vec![num(1)])),
        assign("b", call("Box", vec![text("s")])),
    ]);
    assert!(c.contains("typedef struct {\n    char* x;\n} Box;\n"));
    assert!(c.contains("void Box___init__(Box* self, char* x) {\n"));
}

#[test]
fn field_reads_fix_method_return_types() {
    let init = func_def(
        "__init__",
        vec!["self", "start"],
        vec![attr_assign("self", "count", name("start"))],
    );
    let getter = func_def(
        "current",
        vec!["self"],
        vec![ret(json!({
            "_type": "Attribute", "value": name("self"), "attr": "count",
        }))],
    );
    let c = c_of(vec![
        class_def("Counter", vec![init, getter]),
        assign("c", call("Counter", vec![num(5)])),
    ]);
    assert!(c.contains("double Counter_current(Counter* self) {\n    return self->count;\n}\n"));
}

#[test]
fn methods_lower_to_free_functions_taking_the_receiver_address() {
    let init = func_def(
        "__init__",
        vec!["self", "start"],
        vec![attr_assign("self", "count", name("start"))],
    );
    let bump = func_def(
        "bump",
        vec!["self"],
        vec![attr_assign(
            "self",
            "count",
            binop(
                json!({"_type": "Attribute", "value": name("self"), "attr": "count"}),
                "Add",
                num(1),
            ),
        )],
    );
    let c = c_of(vec![
        class_def("Counter", vec![init, bump]),
        assign("c", call("Counter", vec![num(5)])),
        expr_stmt(method_call("c", "bump", vec![])),
    ]);
    assert!(c.contains("void Counter_bump(Counter* self) {\n"));
    assert!(c.contains("    self->count = (self->count + 1);\n"));
    assert!(c.contains("    Counter_bump(&c);\n"));
}

#[test]
fn method_calls_on_unknown_receivers_degrade() {
    let c = c_of(vec![expr_stmt(method_call("z", "say", vec![]))]);
    assert!(c.contains("// unsupported method call on `z`"));
}

// --- assignment ---

#[test]
fn reassignment_does_not_redeclare() {
    let c = c_of(vec![assign("a", num(3)), assign("a", num(4))]);
    assert!(c.contains("    double a = 3;\n    a = 4;\n"));
}

#[test]
fn a_function_local_does_not_collide_with_a_global() {
    let c = c_of(vec![
        assign("x", num(1)),
        func_def("g", vec![], vec![assign("x", text("s"))]),
    ]);
    assert!(c.contains("    double x = 1;\n"));
    assert!(c.contains("void g() {\n    char* x = \"s\";\n}\n"));
}

#[test]
fn dict_valued_assignment_degrades_to_a_comment() {
    let c = c_of(vec![assign(
        "d",
        json!({"_type": "Dict", "keys": [], "values": []}),
    )]);
    assert!(c.contains("    // unsupported assignment (dict literal)\n"));
}

#[test]
fn arithmetic_assignment_takes_the_text_default() {
    let c = c_of(vec![assign("y", binop(num(2), "Pow", num(3)))]);
    assert!(c.contains("    char* y = pow(2, 3);\n"));
    assert!(c.contains("#include <math.h>\n"));
}

#[test]
fn booleans_render_as_integers() {
    let c = c_of(vec![assign(
        "flag",
        json!({"_type": "Constant", "value": true}),
    )]);
    assert!(c.contains("    char* flag = 1;\n"));
}

// --- control flow ---

#[test]
fn range_loops_count_from_zero_or_the_given_start() {
    let c = c_of(vec![
        json!({
            "_type": "For",
            "target": name("i"),
            "iter": call("range", vec![num(5)]),
            "body": [pass()],
        }),
        json!({
            "_type": "For",
            "target": name("i"),
            "iter": call("range", vec![num(2), num(5)]),
            "body": [pass()],
        }),
    ]);
    assert!(c.contains("    for (int i = 0; i < 5; i++) {\n        // pass\n    }\n"));
    // Second loop reuses the binding without redeclaring.
    assert!(c.contains("    for (i = 2; i < 5; i++) {\n"));
}

#[test]
fn non_range_iterables_degrade() {
    let c = c_of(vec![json!({
        "_type": "For",
        "target": name("item"),
        "iter": name("items"),
        "body": [pass()],
    })]);
    assert!(c.contains("    // unsupported for loop\n"));
}

#[test]
fn elif_chains_flatten_to_else_if() {
    let inner = json!({
        "_type": "If",
        "test": compare(name("a"), "Gt", num(0)),
        "body": [pass()],
        "orelse": [pass()],
    });
    let c = c_of(vec![
        assign("a", num(3)),
        json!({
            "_type": "If",
            "test": compare(name("a"), "Gt", num(1)),
            "body": [pass()],
            "orelse": [inner],
        }),
    ]);
    let expected = concat!(
        "    if (a > 1) {\n",
        "        // pass\n",
        "    }\n",
        "    else if (a > 0) {\n",
        "        // pass\n",
        "    }\n",
        "    else {\n",
        "        // pass\n",
        "    }\n",
    );
    assert!(c.contains(expected), "missing chained else-if in:\n{c}");
}

#[test]
fn while_break_continue_translate_directly() {
    let c = c_of(vec![
        assign("a", num(0)),
        json!({
            "_type": "While",
            "test": compare(name("a"), "Lt", num(10)),
            "body": [
                json!({"_type": "Break"}),
                json!({"_type": "Continue"}),
            ],
        }),
    ]);
    assert!(c.contains("    while (a < 10) {\n        break;\n        continue;\n    }\n"));
}

#[test]
fn chained_comparisons_degrade() {
    let chained = json!({
        "_type": "Compare",
        "left": num(1),
        "ops": [{"_type": "Lt"}, {"_type": "Lt"}],
        "comparators": [num(2), num(3)],
    });
    let c = c_of(vec![assign("ok", chained)]);
    assert!(c.contains("    // unsupported assignment (chained comparison)\n"));
}

// --- print ---

#[test]
fn print_formats_arguments_by_resolved_type() {
    let c = c_of(vec![
        assign("x", num(3)),
        expr_stmt(call("print", vec![name("x"), text("done")])),
    ]);
    assert!(c.contains("    printf(\"%f %s\\n\", x, \"done\");\n"));
}

#[test]
fn empty_print_emits_a_bare_newline() {
    let c = c_of(vec![expr_stmt(call("print", vec![]))]);
    assert!(c.contains("    printf(\"\\n\");\n"));
}

// --- degrade paths ---

#[test]
fn unknown_kinds_render_as_comments_and_siblings_survive() {
    let c = c_of(vec![
        json!({"_type": "Delete", "lineno": 3}),
        assign("a", num(1)),
    ]);
    assert!(c.contains("    // unsupported node: Delete (line 3)\n"));
    assert!(c.contains("    double a = 1;\n"));
}

#[test]
fn unknown_kinds_nested_in_supported_constructs_degrade_in_place() {
    let c = c_of(vec![json!({
        "_type": "While",
        "test": compare(name("a"), "Lt", num(10)),
        "body": [
            json!({"_type": "Raise", "lineno": 7}),
            expr_stmt(call("print", vec![num(1)])),
        ],
    })]);
    assert!(c.contains("        // unsupported node: Raise (line 7)\n"));
    assert!(c.contains("        printf(\"%f\\n\", 1);\n"));
}

#[test]
fn unsupported_wrappers_keep_their_translated_bodies() {
    let with_stmt = json!({
        "_type": "With",
        "items": [{
            "_type": "withitem",
            "context_expr": call("open", vec![text("f")]),
            "optional_vars": name("fh"),
        }],
        "body": [assign("x", num(1))],
    });
    let try_stmt = json!({
        "_type": "Try",
        "body": [assign("y", num(2))],
        "handlers": [{
            "_type": "ExceptHandler",
            "type": name("ValueError"),
            "body": [pass()],
        }],
        "orelse": [],
        "finalbody": [assign("z", num(3))],
    });
    let c = c_of(vec![with_stmt, try_stmt]);
    assert!(c.contains("    // with open(\"f\") as fh {\n        double x = 1;\n    // }\n"));
    assert!(c.contains("    // try {\n        double y = 2;\n    // }\n"));
    assert!(c.contains("    // except (ValueError) {\n        // pass\n    // }\n"));
    assert!(c.contains("    // finally {\n        double z = 3;\n    // }\n"));
}

#[test]
fn imports_and_async_defs_render_as_comments() {
    let c = c_of(vec![
        json!({
            "_type": "Import",
            "names": [
                {"_type": "alias", "name": "os", "asname": null},
                {"_type": "alias", "name": "sys", "asname": "system"},
            ],
        }),
        json!({
            "_type": "ImportFrom",
            "module": "math",
            "names": [{"_type": "alias", "name": "sqrt", "asname": null}],
        }),
        json!({"_type": "AsyncFunctionDef", "name": "fetch", "body": [pass()]}),
    ]);
    assert!(c.contains("    // import os, sys as system\n"));
    assert!(c.contains("    // from math import sqrt\n"));
    assert!(c.contains("    // async def fetch(...) not supported, rewrite as a sync function\n"));
}

// --- emission order ---

#[test]
fn headers_come_first_and_math_is_opt_in() {
    let plain = c_of(vec![assign("a", num(1))]);
    assert!(plain.starts_with("#include <stdio.h>\n\n"));
    assert!(!plain.contains("math.h"));
}

#[test]
fn definitions_precede_the_entry_point() {
    let c = c_of(vec![
        func_def("ping", vec![], vec![pass()]),
        expr_stmt(call("ping", vec![])),
    ]);
    let fn_pos = c.find("void ping()").expect("function definition");
    let main_pos = c.find("int main() {").expect("entry point");
    assert!(fn_pos < main_pos);
    assert!(c.ends_with("    return 0;\n}\n"));
}
