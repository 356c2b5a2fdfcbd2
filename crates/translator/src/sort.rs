//! The three-sort type system, plus the transient pending-sort state used
//! while a symbol table is still being built.

/// A VTA value's sort. `Null` is never stored in a variable; it only
/// classifies the result of a side-effecting top-level call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sort {
    Numeric,
    Type,
    Null,
}

impl Sort {
    /// The C++ member name a value of this sort is accessed through.
    pub fn member(self) -> &'static str {
        match self {
            Sort::Numeric => "value",
            Sort::Type => "type",
            Sort::Null => unreachable!("null-sort values are never referenced, only emitted"),
        }
    }

    pub fn is_type(self) -> bool {
        matches!(self, Sort::Type)
    }
}

/// A higher-order signature: a parameter or return position that is itself
/// a function, e.g. `num(x: num)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncSort {
    pub return_sort: Sort,
    pub params: Vec<DeclaredSort>,
}

/// The declared sort of a functional-literal parameter: either a plain
/// `Sort` or a nested functional sort for higher-order parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredSort {
    Plain(Sort),
    Func(FuncSort),
}

impl DeclaredSort {
    /// The sort a value of this declared type carries when referenced
    /// (a higher-order parameter is referenced via calls that return its
    /// declared return sort).
    pub fn return_sort(&self) -> Sort {
        match self {
            DeclaredSort::Plain(s) => *s,
            DeclaredSort::Func(f) => f.return_sort,
        }
    }
}

/// The pending state of a symbol-table slot before its right-hand side has
/// been parsed. Never appears in the final IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingSort {
    ValueNotSet,
    FunctionNotSet,
}
