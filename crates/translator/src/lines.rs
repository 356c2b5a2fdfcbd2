//! Line splitting and classification.

use crate::error::{VtaError, VtaResult};
use crate::lexer::tokenize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Assignment,
    FunctionalLiteralDef,
    FunctionalLiteralSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub kind: LineKind,
    pub left: String,
    pub right: String,
}

/// Splits source into non-blank, non-comment logical lines, each required
/// to contain exactly one `=`.
pub fn split_lines(source: &str) -> VtaResult<Vec<ClassifiedLine>> {
    let mut out = Vec::new();
    for raw in source.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let eq_count = trimmed.matches('=').count();
        if eq_count != 1 {
            return Err(VtaError::parsing(format!(
                "every line must contain exactly one assignment, found {eq_count} in: {trimmed}"
            )));
        }
        let idx = trimmed.find('=').expect("checked eq_count == 1 above");
        let left = trimmed[..idx].trim().to_string();
        let right = trimmed[idx + 1..].trim().to_string();
        out.push(classify(left, right)?);
    }
    Ok(out)
}

fn classify(left: String, right: String) -> VtaResult<ClassifiedLine> {
    let right_tokens = tokenize(&right);
    let has_arrow = right.contains("->");
    let starts_with_sort = right_tokens
        .first()
        .is_some_and(|t| t == "num" || t == "type");

    let kind = if has_arrow && starts_with_sort {
        LineKind::FunctionalLiteralDef
    } else if has_arrow {
        return Err(VtaError::parsing(
            "functional literal must start with 'type' or 'num'",
        ));
    } else if left.contains('(') && left.contains(')') {
        LineKind::FunctionalLiteralSpec
    } else {
        LineKind::Assignment
    };

    Ok(ClassifiedLine { kind, left, right })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_assignment() {
        let lines = split_lines("x = add(2, 3)").unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, LineKind::Assignment);
    }

    #[test]
    fn functional_literal_definition() {
        let lines = split_lines("f = num(x: num) -> add(x, 1)").unwrap();
        assert_eq!(lines[0].kind, LineKind::FunctionalLiteralDef);
    }

    #[test]
    fn functional_literal_specialization() {
        let lines = split_lines("f(900) = 0").unwrap();
        assert_eq!(lines[0].kind, LineKind::FunctionalLiteralSpec);
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let lines = split_lines("# a comment\n\nx = 1").unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn rejects_two_equals_signs() {
        let err = split_lines("x = y = 1").unwrap_err();
        assert!(matches!(err, VtaError::Parsing(_)));
    }

    #[test]
    fn rejects_bad_return_sort_keyword() {
        let err = split_lines("f = foo(x: num) -> x").unwrap_err();
        assert!(matches!(err, VtaError::Parsing(_)));
    }
}
