//! The fixed, closed built-in identifier table: union of every source
//! revision's built-in set.

use crate::sort::Sort;
use std::collections::HashMap;
use std::sync::LazyLock;

static BUILTINS: LazyLock<HashMap<&'static str, Sort>> = LazyLock::new(|| {
    use Sort::*;
    let mut m = HashMap::new();
    for name in [
        "add", "sub", "mul", "div", "mod", "head", "size", "lieq", "eq", "neq", "not", "bnot",
        "and", "band", "or", "bor", "xor", "bool", "lshift", "rshift", "lt", "leq", "gt", "geq",
        "if", "count", "contains", "get", "pow",
    ] {
        m.insert(name, Numeric);
    }
    for name in ["list", "tail", "cons", "append", "concat", "tif", "map"] {
        m.insert(name, Type);
    }
    m.insert("read", Numeric);
    m.insert("print", Null);
    m.insert("nan", Numeric);
    m
});

/// Looks up a built-in's declared return sort.
pub fn builtin_sort(name: &str) -> Option<Sort> {
    BUILTINS.get(name).copied()
}

/// Callees whose result is emitted as a main-body side-effect statement
/// rather than stored in a struct.
pub fn is_null_translating(name: &str) -> bool {
    name == "print"
}
