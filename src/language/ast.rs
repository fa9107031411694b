#[derive(Clone, Debug)]
pub struct Program {
    pub body: Vec<Node>,
}

#[derive(Clone, Debug)]
pub enum Node {
    Module {
        body: Vec<Node>,
    },
    Assign {
        targets: Vec<Node>,
        value: Option<Box<Node>>,
    },
    Call {
        func: Option<Box<Node>>,
        args: Vec<Node>,
    },
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<Node>,
    },
    ClassDef {
        name: String,
        body: Vec<Node>,
    },
    Return {
        value: Option<Box<Node>>,
    },
    ExprStmt {
        value: Box<Node>,
    },
    If {
        test: Box<Node>,
        body: Vec<Node>,
        orelse: Vec<Node>,
    },
    For {
        target: Box<Node>,
        iter: Box<Node>,
        body: Vec<Node>,
    },
    While {
        test: Box<Node>,
        body: Vec<Node>,
    },
    Break,
    Continue,
    Pass,
    List {
        elts: Vec<Node>,
    },
    Dict {
        keys: Vec<Option<Node>>,
        values: Vec<Node>,
    },
    Attribute {
        value: Box<Node>,
        attr: String,
    },
    Name {
        id: String,
    },
    Constant {
        value: Literal,
    },
    Import {
        names: Vec<ImportAlias>,
    },
    ImportFrom {
        module: Option<String>,
        names: Vec<ImportAlias>,
    },
    With {
        items: Vec<WithItem>,
        body: Vec<Node>,
    },
    Try {
        body: Vec<Node>,
        handlers: Vec<ExceptHandler>,
        orelse: Vec<Node>,
        finalbody: Vec<Node>,
    },
    AsyncFunctionDef {
        name: String,
        body: Vec<Node>,
    },
    Await {
        value: Box<Node>,
    },
    Compare {
        left: Box<Node>,
        ops: Vec<CompareOperator>,
        comparators: Vec<Node>,
    },
    BinOp {
        left: Box<Node>,
        op: BinaryOperator,
        right: Box<Node>,
    },
    /// Any kind the decoder does not recognize. Kept in the tree so siblings
    /// still translate; renders as a comment naming the kind.
    Unsupported {
        kind: String,
        line: Option<u64>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    Pow,
    Other(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompareOperator {
    Gt,
    Lt,
    Eq,
    NotEq,
    GtE,
    LtE,
    Other(String),
}

impl CompareOperator {
    pub fn c_symbol(&self) -> Option<&'static str> {
        match self {
            CompareOperator::Gt => Some(">"),
            CompareOperator::Lt => Some("<"),
            CompareOperator::Eq => Some("=="),
            CompareOperator::NotEq => Some("!="),
            CompareOperator::GtE => Some(">="),
            CompareOperator::LtE => Some("<="),
            CompareOperator::Other(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImportAlias {
    pub name: String,
    pub asname: Option<String>,
}

#[derive(Clone, Debug)]
pub struct WithItem {
    pub context: Node,
    pub alias: Option<Node>,
}

#[derive(Clone, Debug)]
pub struct ExceptHandler {
    pub ty: Option<Node>,
    pub body: Vec<Node>,
}

impl Node {
    pub fn kind(&self) -> &str {
        match self {
            Node::Module { .. } => "Module",
            Node::Assign { .. } => "Assign",
            Node::Call { .. } => "Call",
            Node::FunctionDef { .. } => "FunctionDef",
            Node::ClassDef { .. } => "ClassDef",
            Node::Return { .. } => "Return",
            Node::ExprStmt { .. } => "Expr",
            Node::If { .. } => "If",
            Node::For { .. } => "For",
            Node::While { .. } => "While",
            Node::Break => "Break",
            Node::Continue => "Continue",
            Node::Pass => "Pass",
            Node::List { .. } => "List",
            Node::Dict { .. } => "Dict",
            Node::Attribute { .. } => "Attribute",
            Node::Name { .. } => "Name",
            Node::Constant { .. } => "Constant",
            Node::Import { .. } => "Import",
            Node::ImportFrom { .. } => "ImportFrom",
            Node::With { .. } => "With",
            Node::Try { .. } => "Try",
            Node::AsyncFunctionDef { .. } => "AsyncFunctionDef",
            Node::Await { .. } => "Await",
            Node::Compare { .. } => "Compare",
            Node::BinOp { .. } => "BinOp",
            Node::Unsupported { kind, .. } => kind,
        }
    }

    /// Visits every directly owned child node, in field order. Callers that
    /// need a full-tree walk recurse from their callback.
    pub fn for_each_child<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        match self {
            Node::Module { body }
            | Node::FunctionDef { body, .. }
            | Node::ClassDef { body, .. }
            | Node::AsyncFunctionDef { body, .. } => {
                for node in body {
                    f(node);
                }
            }
            Node::Assign { targets, value } => {
                for target in targets {
                    f(target);
                }
                if let Some(value) = value {
                    f(value);
                }
            }
            Node::Call { func, args } => {
                if let Some(func) = func {
                    f(func);
                }
                for arg in args {
                    f(arg);
                }
            }
            Node::Return { value } => {
                if let Some(value) = value {
                    f(value);
                }
            }
            Node::ExprStmt { value } | Node::Await { value } | Node::Attribute { value, .. } => {
                f(value);
            }
            Node::If { test, body, orelse } => {
                f(test);
                for node in body {
                    f(node);
                }
                for node in orelse {
                    f(node);
                }
            }
            Node::For { target, iter, body } => {
                f(target);
                f(iter);
                for node in body {
                    f(node);
                }
            }
            Node::While { test, body } => {
                f(test);
                for node in body {
                    f(node);
                }
            }
            Node::List { elts } => {
                for elt in elts {
                    f(elt);
                }
            }
            Node::Dict { keys, values } => {
                for key in keys.iter().flatten() {
                    f(key);
                }
                for value in values {
                    f(value);
                }
            }
            Node::With { items, body } => {
                for item in items {
                    f(&item.context);
                    if let Some(alias) = &item.alias {
                        f(alias);
                    }
                }
                for node in body {
                    f(node);
                }
            }
            Node::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                for node in body {
                    f(node);
                }
                for handler in handlers {
                    if let Some(ty) = &handler.ty {
                        f(ty);
                    }
                    for node in &handler.body {
                        f(node);
                    }
                }
                for node in orelse {
                    f(node);
                }
                for node in finalbody {
                    f(node);
                }
            }
            Node::Compare {
                left, comparators, ..
            } => {
                f(left);
                for comparator in comparators {
                    f(comparator);
                }
            }
            Node::BinOp { left, right, .. } => {
                f(left);
                f(right);
            }
            Node::Break
            | Node::Continue
            | Node::Pass
            | Node::Name { .. }
            | Node::Constant { .. }
            | Node::Import { .. }
            | Node::ImportFrom { .. }
            | Node::Unsupported { .. } => {}
        }
    }
}
