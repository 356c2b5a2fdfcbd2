//! Recursive-descent parser / type inferencer.

use crate::ast::{
    Assignment, Callee, Declaration, FlSignature, FunctionalLiteral, FunctionalLiteralSpec, Param,
    Program, Rvalue, SpecArg,
};
use crate::builtins::builtin_sort;
use crate::error::{VtaError, VtaResult};
use crate::lines::{split_lines, ClassifiedLine, LineKind};
use crate::sort::{DeclaredSort, FuncSort, PendingSort, Sort};
use crate::symbols::{is_valid_identifier, SlotState, SymbolTable, NULL_NAME};
use std::collections::HashMap;

/// Eager stdin token source for the `read` built-in: consumes
/// one whitespace-delimited token at a time from caller-supplied text.
pub struct StdinCursor<'a> {
    remaining: &'a str,
}

impl<'a> StdinCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        StdinCursor { remaining: text }
    }

    pub fn read_token(&mut self) -> Option<String> {
        let s = self.remaining.trim_start();
        if s.is_empty() {
            self.remaining = s;
            return None;
        }
        let end = s.find(char::is_whitespace).unwrap_or(s.len());
        let token = s[..end].to_string();
        self.remaining = &s[end..];
        Some(token)
    }
}

type Locals = HashMap<String, DeclaredSort>;
type FlTable = HashMap<String, FlSignature>;

/// Splits `s` at every top-level `,` (one not nested inside parens),
/// shared between call-argument lists and FL parameter lists.
fn split_call_args(s: &str) -> Vec<String> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for c in s.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    parts.push(current.trim().to_string());
    parts
}

fn parse_numeric_literal(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let digits = if bytes[0] == b'-' { &bytes[1..] } else { bytes };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    s.parse::<i64>().ok()
}

fn parse_sort_keyword(s: &str) -> VtaResult<Sort> {
    match s {
        "num" => Ok(Sort::Numeric),
        "type" => Ok(Sort::Type),
        other => Err(VtaError::parsing(format!(
            "expected 'num' or 'type' sort keyword, found '{other}'"
        ))),
    }
}

/// Parses a `name : sort_spec` list, shared by FL top-level signatures and
/// nested higher-order parameter sorts.
fn parse_param_list(s: &str) -> VtaResult<Vec<Param>> {
    split_call_args(s)
        .into_iter()
        .map(|piece| {
            let colon = piece
                .find(':')
                .ok_or_else(|| VtaError::parsing(format!("malformed parameter: '{piece}'")))?;
            let name = piece[..colon].trim().to_string();
            if !is_valid_identifier(&name) {
                return Err(VtaError::parsing(format!("invalid parameter name: '{name}'")));
            }
            let declared = parse_declared_sort(piece[colon + 1..].trim())?;
            Ok(Param { name, declared })
        })
        .collect()
}

/// Parses `num`, `type`, or a nested functional sort like `num(x: num)`.
fn parse_declared_sort(spec: &str) -> VtaResult<DeclaredSort> {
    match spec.find('(') {
        None => Ok(DeclaredSort::Plain(parse_sort_keyword(spec)?)),
        Some(open) => {
            let return_sort = parse_sort_keyword(spec[..open].trim())?;
            if !spec.ends_with(')') {
                return Err(VtaError::parsing(format!(
                    "unterminated functional sort: '{spec}'"
                )));
            }
            let params = parse_param_list(&spec[open + 1..spec.len() - 1])?;
            Ok(DeclaredSort::Func(FuncSort {
                return_sort,
                params: params.into_iter().map(|p| p.declared).collect(),
            }))
        }
    }
}

/// Parses a right-hand-side expression into a sort-tagged `Rvalue`,
/// following the resolution order locals -> numeric literal -> variables
/// -> call (locals -> FLs -> built-ins).
fn parse_rvalue(
    raw: &str,
    symbols: &SymbolTable,
    fls: &FlTable,
    locals: Option<&Locals>,
    stdin: &mut StdinCursor,
) -> VtaResult<Rvalue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VtaError::parsing("empty rvalue"));
    }

    if let Some(declared) = locals.and_then(|l| l.get(trimmed)) {
        return Ok(Rvalue::LocalVariable {
            name: trimmed.to_string(),
            declared: declared.clone(),
        });
    }

    if let Some(n) = parse_numeric_literal(trimmed) {
        return Ok(Rvalue::NumericLiteral(n));
    }

    if symbols.is_known(trimmed) {
        return match symbols.slot(trimmed).expect("checked is_known").state {
            SlotState::Assigned(sort) => Ok(Rvalue::VariableValue {
                versioned_name: symbols
                    .current_versioned_name(trimmed)
                    .expect("known variable has a versioned name"),
                sort,
            }),
            SlotState::Pending(PendingSort::FunctionNotSet) => Ok(Rvalue::PendingFunctionValue {
                versioned_name: trimmed.to_string(),
                sort: fls
                    .get(trimmed)
                    .expect("pre-pass registers every functional literal's signature")
                    .return_sort,
            }),
            SlotState::Pending(PendingSort::ValueNotSet) => Err(VtaError::translation(format!(
                "'{trimmed}' is referenced before its first assignment"
            ))),
        };
    }

    parse_call(trimmed, symbols, fls, locals, stdin)
}

fn parse_call(
    raw: &str,
    symbols: &SymbolTable,
    fls: &FlTable,
    locals: Option<&Locals>,
    stdin: &mut StdinCursor,
) -> VtaResult<Rvalue> {
    let open = raw
        .find('(')
        .ok_or_else(|| VtaError::parsing(format!("unknown rvalue type: '{raw}'")))?;
    if !raw.ends_with(')') {
        return Err(VtaError::parsing(format!("unbalanced parentheses in '{raw}'")));
    }
    let ident = raw[..open].trim();
    if ident.is_empty() || !is_valid_identifier(ident) {
        return Err(VtaError::parsing(format!("unknown rvalue type: '{raw}'")));
    }
    let args_str = &raw[open + 1..raw.len() - 1];

    if ident == "read" {
        let token = stdin
            .read_token()
            .ok_or_else(|| VtaError::translation("read: no more stdin tokens available"))?;
        let value = parse_numeric_literal(&token).ok_or_else(|| {
            VtaError::translation(format!("read: stdin token '{token}' is not numeric"))
        })?;
        return Ok(Rvalue::NumericLiteral(value));
    }

    let args = split_call_args(args_str)
        .iter()
        .map(|a| parse_rvalue(a, symbols, fls, locals, stdin))
        .collect::<VtaResult<Vec<_>>>()?;

    if let Some(declared) = locals.and_then(|l| l.get(ident)) {
        return Ok(Rvalue::Call {
            callee: Callee::Local(ident.to_string()),
            sort: declared.return_sort(),
            args,
        });
    }
    if let Some(sig) = fls.get(ident) {
        return Ok(Rvalue::Call {
            callee: Callee::FunctionalLiteral(ident.to_string()),
            sort: sig.return_sort,
            args,
        });
    }
    if let Some(sort) = builtin_sort(ident) {
        return Ok(Rvalue::Call {
            callee: Callee::Builtin(ident.to_string()),
            sort,
            args,
        });
    }
    Err(VtaError::parsing(format!("unknown rvalue type: '{ident}'")))
}

fn parse_assignment(
    line: &ClassifiedLine,
    symbols: &mut SymbolTable,
    fls: &FlTable,
    stdin: &mut StdinCursor,
) -> VtaResult<Assignment> {
    if line.left == NULL_NAME {
        let value = parse_rvalue(&line.right, symbols, fls, None, stdin)?;
        if value.sort() != Sort::Null {
            return Err(VtaError::translation(
                "'null' may only be assigned the result of a null-translating call",
            ));
        }
        Ok(Assignment {
            versioned_name: NULL_NAME.to_string(),
            is_null: true,
            value,
        })
    } else {
        let value = parse_rvalue(&line.right, symbols, fls, None, stdin)?;
        if value.sort() == Sort::Null {
            return Err(VtaError::translation(format!(
                "cannot assign a null-sort value to '{}'",
                line.left
            )));
        }
        let versioned_name = symbols.assign(&line.left, value.sort());
        Ok(Assignment {
            versioned_name,
            is_null: false,
            value,
        })
    }
}

/// Parses the declared signature (return sort + parameter list) of a
/// functional-literal-definition line, without touching its body. Used by
/// the pre-pass that populates the FL table before any body is parsed, so
/// a call to an FL textually *before* its definition still resolves.
fn parse_fl_signature(line: &ClassifiedLine) -> VtaResult<FlSignature> {
    let arrow = line
        .right
        .find("->")
        .ok_or_else(|| VtaError::parsing("functional literal is missing '->'"))?;
    let signature = line.right[..arrow].trim();
    let open = signature
        .find('(')
        .ok_or_else(|| VtaError::parsing("functional literal signature is missing '('"))?;
    let return_sort = parse_sort_keyword(signature[..open].trim())?;
    if !signature.ends_with(')') {
        return Err(VtaError::parsing("functional literal signature is missing ')'"));
    }
    let params = parse_param_list(&signature[open + 1..signature.len() - 1])?;
    Ok(FlSignature { return_sort, params })
}

fn parse_functional_literal(
    line: &ClassifiedLine,
    symbols: &SymbolTable,
    fls: &FlTable,
    stdin: &mut StdinCursor,
) -> VtaResult<FunctionalLiteral> {
    let arrow = line
        .right
        .find("->")
        .ok_or_else(|| VtaError::parsing("functional literal is missing '->'"))?;
    let body_str = line.right[arrow + 2..].trim();

    let sig = fls
        .get(&line.left)
        .expect("pre-pass registers every functional literal's signature")
        .clone();

    let locals: Locals = sig
        .params
        .iter()
        .map(|p| (p.name.clone(), p.declared.clone()))
        .collect();

    let body = parse_rvalue(body_str, symbols, fls, Some(&locals), stdin)?;
    if body.sort() != sig.return_sort {
        return Err(VtaError::translation(format!(
            "functional literal '{}' declares return sort {:?} but its body has sort {:?}",
            line.left,
            sig.return_sort,
            body.sort()
        )));
    }

    Ok(FunctionalLiteral {
        name: line.left.clone(),
        return_sort: sig.return_sort,
        params: sig.params,
        body,
    })
}

fn parse_functional_literal_spec(
    line: &ClassifiedLine,
    symbols: &SymbolTable,
    fls: &FlTable,
    stdin: &mut StdinCursor,
) -> VtaResult<FunctionalLiteralSpec> {
    let open = line
        .left
        .find('(')
        .ok_or_else(|| VtaError::parsing("specialization is missing '('"))?;
    let name = line.left[..open].trim().to_string();
    if !line.left.ends_with(')') {
        return Err(VtaError::parsing("specialization is missing ')'"));
    }
    let sig = fls
        .get(&name)
        .ok_or_else(|| VtaError::parsing(format!("specialization of unknown functional literal '{name}'")))?
        .clone();
    let args_str = &line.left[open + 1..line.left.len() - 1];
    let arg_strs = split_call_args(args_str);
    if arg_strs.len() != sig.params.len() {
        return Err(VtaError::parsing(format!(
            "specialization of '{name}' has {} argument(s), expected {}",
            arg_strs.len(),
            sig.params.len()
        )));
    }

    let mut locals: Locals = HashMap::new();
    let mut spec_args = Vec::with_capacity(arg_strs.len());
    for (arg_str, param) in arg_strs.iter().zip(&sig.params) {
        if arg_str.as_str() == param.name {
            locals.insert(param.name.clone(), param.declared.clone());
            spec_args.push(SpecArg::FreeVariable {
                name: param.name.clone(),
                declared: param.declared.clone(),
            });
        } else {
            let pattern = parse_rvalue(arg_str, symbols, fls, None, stdin)?;
            spec_args.push(SpecArg::Pattern(pattern));
        }
    }

    let body = parse_rvalue(&line.right, symbols, fls, Some(&locals), stdin)?;
    if body.sort() != sig.return_sort {
        return Err(VtaError::translation(format!(
            "specialization of '{name}' has sort {:?}, expected {:?}",
            body.sort(),
            sig.return_sort
        )));
    }

    Ok(FunctionalLiteralSpec {
        name,
        args: spec_args,
        body,
    })
}

/// Parses a complete VTA program, given the stdin text eager `read` calls
/// consume tokens from.
pub fn parse_program(source: &str, stdin_text: &str) -> VtaResult<Program> {
    let lines = split_lines(source)?;
    let mut symbols = SymbolTable::build(&lines)?;
    let mut stdin = StdinCursor::new(stdin_text);

    // Pre-pass: every FL's name and declared return sort must be known
    // before any right-hand side is parsed, so a call to an FL that
    // appears textually before its definition still resolves.
    let mut fls: FlTable = HashMap::new();
    for line in &lines {
        if line.kind == LineKind::FunctionalLiteralDef {
            fls.insert(line.left.clone(), parse_fl_signature(line)?);
        }
    }

    let mut declarations = Vec::with_capacity(lines.len());
    for line in &lines {
        let decl = match line.kind {
            LineKind::Assignment => {
                Declaration::Assignment(parse_assignment(line, &mut symbols, &fls, &mut stdin)?)
            }
            LineKind::FunctionalLiteralDef => Declaration::FunctionalLiteral(parse_functional_literal(
                line, &symbols, &fls, &mut stdin,
            )?),
            LineKind::FunctionalLiteralSpec => Declaration::FunctionalLiteralSpec(
                parse_functional_literal_spec(line, &symbols, &fls, &mut stdin)?,
            ),
        };
        declarations.push(decl);
    }
    Ok(Program { declarations })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_addition() {
        let program = parse_program("x = add(2, 3)\nnull = print(x)", "").unwrap();
        assert_eq!(program.declarations.len(), 2);
    }

    #[test]
    fn unknown_identifier_is_parsing_error() {
        let err = parse_program("x = y", "").unwrap_err();
        assert!(matches!(err, VtaError::Parsing(_)));
    }

    #[test]
    fn reassignment_bumps_version() {
        let program = parse_program("x = 1\nx = 2\nnull = print(x)", "").unwrap();
        match &program.declarations[2] {
            Declaration::Assignment(a) => match &a.value {
                Rvalue::Call { args, .. } => match &args[0] {
                    Rvalue::VariableValue { versioned_name, .. } => {
                        assert_eq!(versioned_name, "x_2");
                    }
                    other => panic!("expected VariableValue, got {other:?}"),
                },
                other => panic!("expected Call, got {other:?}"),
            },
            other => panic!("expected Assignment, got {other:?}"),
        }
    }

    #[test]
    fn eager_read_consumes_stdin_token() {
        let program = parse_program("y = read(0)\nnull = print(y)", "7").unwrap();
        match &program.declarations[0] {
            Declaration::Assignment(a) => assert_eq!(a.value, Rvalue::NumericLiteral(7)),
            other => panic!("expected Assignment, got {other:?}"),
        }
    }

    #[test]
    fn functional_literal_and_specialization_recursion() {
        let program = parse_program(
            "f = num(x: num) -> f(add(x, 1))\nf(900) = 0\nnull = print(f(1))",
            "",
        )
        .unwrap();
        assert_eq!(program.declarations.len(), 3);
    }

    #[test]
    fn fl_call_resolves_before_its_textual_definition() {
        let program = parse_program("x = g(2)\ng = num(p: num) -> add(p, 1)\nnull = print(x)", "").unwrap();
        match &program.declarations[0] {
            Declaration::Assignment(a) => match &a.value {
                Rvalue::Call { callee: Callee::FunctionalLiteral(name), .. } => assert_eq!(name, "g"),
                other => panic!("expected Call, got {other:?}"),
            },
            other => panic!("expected Assignment, got {other:?}"),
        }
    }

    #[test]
    fn local_shadows_variable_and_builtin() {
        // 'add' as a parameter name shadows the built-in inside the body.
        let program = parse_program("f = num(add: num) -> add", "").unwrap();
        match &program.declarations[0] {
            Declaration::FunctionalLiteral(fl) => {
                assert!(matches!(fl.body, Rvalue::LocalVariable { .. }));
            }
            other => panic!("expected FunctionalLiteral, got {other:?}"),
        }
    }

    #[test]
    fn null_rejects_non_null_rvalue() {
        let err = parse_program("null = add(1, 2)", "").unwrap_err();
        assert!(matches!(err, VtaError::Translation(_)));
    }
}
