//! Code emitter: walks the typed IR and produces one C++
//! translation unit by concatenating the embedded fragments with generated
//! struct declarations and main-body statements.

use crate::ast::{Assignment, Callee, Declaration, FunctionalLiteral, FunctionalLiteralSpec, Param, Program, Rvalue, SpecArg};
use crate::builtins::is_null_translating;
use crate::fragments;
use crate::sort::{DeclaredSort, Sort};
use crate::symbols::purify_name;

/// Translates an `Rvalue` to its C++ text form. `in_template` marks that we
/// are emitting inside a functional-literal (or specialization) body, where
/// `typename` is required before a dependent type-valued member access.
fn translate_rvalue(value: &Rvalue, in_template: bool) -> String {
    match value {
        Rvalue::NumericLiteral(n) => n.to_string(),
        Rvalue::LocalVariable { name, .. } => name.clone(),
        Rvalue::PendingFunctionValue { versioned_name, .. } => purify_name(versioned_name),
        Rvalue::VariableValue { versioned_name, sort } => {
            format!("{versioned_name}::{}", sort.member())
        }
        Rvalue::Call { callee, args, sort } => {
            let args_str = args
                .iter()
                .map(|a| translate_rvalue(a, in_template))
                .collect::<Vec<_>>()
                .join(", ");
            let name = match callee {
                Callee::Builtin(id) => format!("__{id}"),
                Callee::FunctionalLiteral(id) => format!("_{id}"),
                Callee::Local(id) => id.clone(),
            };
            let templated = if args.is_empty() {
                name
            } else {
                format!("{name}<{args_str}>")
            };
            let typename_prefix = if in_template && sort.is_type() { "typename " } else { "" };
            format!("{typename_prefix}{templated}::{}", sort.member())
        }
    }
}

/// Renders one declared-sort slot as an unnamed template parameter, used
/// for the nested parameter list of a higher-order parameter's own sort.
fn translate_unnamed(declared: &DeclaredSort) -> String {
    match declared {
        DeclaredSort::Plain(Sort::Numeric) => "long long".to_string(),
        DeclaredSort::Plain(Sort::Type) => "typename".to_string(),
        DeclaredSort::Plain(Sort::Null) => unreachable!("null is never a parameter sort"),
        DeclaredSort::Func(f) => {
            let inner = f.params.iter().map(translate_unnamed).collect::<Vec<_>>().join(", ");
            format!("template<{inner}> typename")
        }
    }
}

/// Renders one named template parameter.
fn translate_param(param: &Param) -> String {
    match &param.declared {
        DeclaredSort::Plain(Sort::Numeric) => format!("long long {}", param.name),
        DeclaredSort::Plain(Sort::Type) => format!("typename {}", param.name),
        DeclaredSort::Plain(Sort::Null) => unreachable!("null is never a parameter sort"),
        DeclaredSort::Func(f) => {
            let inner = f.params.iter().map(translate_unnamed).collect::<Vec<_>>().join(", ");
            format!("template<{inner}> typename {}", param.name)
        }
    }
}

fn member_decl(sort: Sort, body: &str) -> String {
    match sort {
        Sort::Numeric => format!("static const long long value = {body};"),
        Sort::Type => format!("using type = {body};"),
        Sort::Null => unreachable!("null never reaches a struct member"),
    }
}

/// Returns (struct declaration, main-body statement); at most one is set.
fn emit_assignment(assignment: &Assignment) -> (Option<String>, Option<String>) {
    if assignment.is_null {
        let Rvalue::Call { callee: Callee::Builtin(id), args, .. } = &assignment.value else {
            unreachable!("parser guarantees a null assignment is a null-translating call");
        };
        debug_assert!(is_null_translating(id), "null assignment of non-null-translating builtin '{id}'");
        let args_str = args.iter().map(|a| translate_rvalue(a, false)).collect::<Vec<_>>().join(", ");
        return (None, Some(format!("    __print<{args_str}>();")));
    }
    let body = translate_rvalue(&assignment.value, false);
    let decl = format!(
        "struct {} {{ {} }};",
        assignment.versioned_name,
        member_decl(assignment.value.sort(), &body)
    );
    (Some(decl), None)
}

fn emit_functional_literal(fl: &FunctionalLiteral) -> String {
    let body = translate_rvalue(&fl.body, true);
    let member = member_decl(fl.return_sort, &body);
    if fl.params.is_empty() {
        format!("struct _{} {{ {member} }};", fl.name)
    } else {
        let params = fl.params.iter().map(translate_param).collect::<Vec<_>>().join(", ");
        format!("template<{params}> struct _{} {{ {member} }};", fl.name)
    }
}

fn emit_functional_literal_spec(spec: &FunctionalLiteralSpec) -> String {
    let mut template_parts = Vec::new();
    let mut pattern_parts = Vec::new();
    for arg in &spec.args {
        match arg {
            SpecArg::FreeVariable { name, declared } => {
                template_parts.push(translate_param(&Param {
                    name: name.clone(),
                    declared: declared.clone(),
                }));
                pattern_parts.push(name.clone());
            }
            SpecArg::Pattern(rvalue) => pattern_parts.push(translate_rvalue(rvalue, true)),
        }
    }
    let body = translate_rvalue(&spec.body, true);
    let member = member_decl(spec.body.sort(), &body);
    let template_str = if template_parts.is_empty() {
        "template<>".to_string()
    } else {
        format!("template<{}>", template_parts.join(", "))
    };
    format!(
        "{template_str} struct _{}<{}> {{ {member} }};",
        spec.name,
        pattern_parts.join(", ")
    )
}

/// Emits the full C++ translation unit for a parsed program.
pub fn emit(program: &Program) -> String {
    let mut decls = Vec::new();
    let mut main_stmts = Vec::new();

    for declaration in &program.declarations {
        match declaration {
            Declaration::Assignment(a) => {
                let (decl, stmt) = emit_assignment(a);
                decls.extend(decl);
                main_stmts.extend(stmt);
            }
            Declaration::FunctionalLiteral(fl) => decls.push(emit_functional_literal(fl)),
            Declaration::FunctionalLiteralSpec(fls) => decls.push(emit_functional_literal_spec(fls)),
        }
    }

    let main_fn = fragments::main_template().replace("{0}", &main_stmts.join("\n"));
    format!(
        "{}\n{}\n{}\n{}\n",
        fragments::header(),
        fragments::stdlib(),
        decls.join("\n"),
        main_fn
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_program;

    #[test]
    fn emits_print_call_into_main_body() {
        let program = parse_program("x = add(2, 3)\nnull = print(x)", "").unwrap();
        let cpp = emit(&program);
        assert!(cpp.contains("struct x_1 { static const long long value = __add<2, 3>::value; };"));
        assert!(cpp.contains("__print<x_1::value>();"));
    }

    #[test]
    fn emits_functional_literal_and_specialization() {
        let program = parse_program(
            "f = num(x: num) -> f(add(x, 1))\nf(900) = 0\nnull = print(f(1))",
            "",
        )
        .unwrap();
        let cpp = emit(&program);
        assert!(cpp.contains("template<long long x> struct _f { static const long long value = _f<__add<x, 1>::value>::value; };"));
        assert!(cpp.contains("template<> struct _f<900> { static const long long value = 0; };"));
        assert!(cpp.contains("__print<_f<1>::value>();"));
    }
}
