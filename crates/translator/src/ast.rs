//! Typed intermediate representation produced by the parser and consumed
//! by the emitter.

use crate::sort::{DeclaredSort, Sort};

/// A parsed, sort-tagged expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rvalue {
    NumericLiteral(i64),
    /// Reference to a previous assignment, by its versioned name (`x_k`).
    VariableValue { versioned_name: String, sort: Sort },
    /// A functional-literal name used as a value while the symbol table
    /// still has it marked `FunctionNotSet`. `sort` is the FL's own
    /// declared return sort, known from the pre-pass FL table.
    PendingFunctionValue { versioned_name: String, sort: Sort },
    /// A parameter of an enclosing functional literal, or a free variable
    /// bound by an enclosing specialization.
    LocalVariable { name: String, declared: DeclaredSort },
    Call {
        callee: Callee,
        args: Vec<Rvalue>,
        sort: Sort,
    },
}

impl Rvalue {
    pub fn sort(&self) -> Sort {
        match self {
            Rvalue::NumericLiteral(_) => Sort::Numeric,
            Rvalue::VariableValue { sort, .. } => *sort,
            Rvalue::PendingFunctionValue { sort, .. } => *sort,
            Rvalue::LocalVariable { declared, .. } => declared.return_sort(),
            Rvalue::Call { sort, .. } => *sort,
        }
    }
}

/// Where a `Call`'s head identifier resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    Builtin(String),
    FunctionalLiteral(String),
    Local(String),
}

/// One parameter of a functional literal or specialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub declared: DeclaredSort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionalLiteral {
    pub name: String,
    pub return_sort: Sort,
    pub params: Vec<Param>,
    pub body: Rvalue,
}

/// Just the callable shape of a functional literal, known before its body
/// is parsed so that a recursive call inside the body can resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlSignature {
    pub return_sort: Sort,
    pub params: Vec<Param>,
}

/// A bound free variable or a concrete pattern position in a
/// specialization's left-hand side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecArg {
    FreeVariable { name: String, declared: DeclaredSort },
    Pattern(Rvalue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionalLiteralSpec {
    pub name: String,
    pub args: Vec<SpecArg>,
    pub body: Rvalue,
}

/// A plain assignment `x_k = E`, including the reserved `null = print(...)`
/// form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub versioned_name: String,
    pub is_null: bool,
    pub value: Rvalue,
}

/// One top-level declaration, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Assignment(Assignment),
    FunctionalLiteral(FunctionalLiteral),
    FunctionalLiteralSpec(FunctionalLiteralSpec),
}

/// A fully parsed VTA program: ordered declarations ready for codegen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}
