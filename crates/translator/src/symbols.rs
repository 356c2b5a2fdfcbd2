//! Symbol-table builder: a single pass over classified lines
//! that registers every bare-identifier left-hand side *before* any
//! right-hand side is parsed, so a later forward-reference can be told
//! apart from a genuinely unknown identifier.

use crate::error::{VtaError, VtaResult};
use crate::lines::{ClassifiedLine, LineKind};
use crate::sort::{PendingSort, Sort};
use std::collections::HashMap;

pub const NULL_NAME: &str = "null";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Pending(PendingSort),
    Assigned(Sort),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSlot {
    pub version: u32,
    pub state: SlotState,
}

/// Table of every plain-variable and functional-literal name mentioned as
/// a left-hand side anywhere in the source, plus (as parsing proceeds) each
/// variable's current version and sort.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    variables: HashMap<String, VariableSlot>,
}

pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric())
}

impl SymbolTable {
    /// Builds the table from classified lines. Does not parse any
    /// right-hand side.
    pub fn build(lines: &[ClassifiedLine]) -> VtaResult<Self> {
        let mut table = SymbolTable::default();
        for line in lines {
            match line.kind {
                LineKind::Assignment => {
                    if line.left == NULL_NAME {
                        continue;
                    }
                    table.register(&line.left, PendingSort::ValueNotSet)?;
                }
                LineKind::FunctionalLiteralDef => {
                    table.register(&line.left, PendingSort::FunctionNotSet)?;
                }
                LineKind::FunctionalLiteralSpec => {}
            }
        }
        Ok(table)
    }

    fn register(&mut self, name: &str, pending: PendingSort) -> VtaResult<()> {
        if !is_valid_identifier(name) {
            return Err(VtaError::parsing(format!("invalid identifier: '{name}'")));
        }
        self.variables
            .entry(name.to_string())
            .or_insert(VariableSlot {
                version: 0,
                state: SlotState::Pending(pending),
            });
        Ok(())
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn slot(&self, name: &str) -> Option<&VariableSlot> {
        self.variables.get(name)
    }

    /// Allocates the next version for `name` and marks it assigned at
    /// `sort`, returning the versioned C++ name (`x_k`).
    pub fn assign(&mut self, name: &str, sort: Sort) -> String {
        let slot = self.variables.entry(name.to_string()).or_insert(VariableSlot {
            version: 0,
            state: SlotState::Pending(PendingSort::ValueNotSet),
        });
        slot.version += 1;
        slot.state = SlotState::Assigned(sort);
        format!("{name}_{}", slot.version)
    }

    /// The current versioned name for a reference to `name` (its most
    /// recent assignment), or the bare name if it is still an
    /// unspecialized functional-literal (`FunctionNotSet` forever).
    pub fn current_versioned_name(&self, name: &str) -> Option<String> {
        self.variables.get(name).map(|slot| match slot.state {
            SlotState::Assigned(_) => format!("{name}_{}", slot.version),
            SlotState::Pending(_) => name.to_string(),
        })
    }
}

/// Drops a trailing `_<digits>` version suffix and prefixes with `_`, the
/// form used to reference a functional literal's emitted C++ template
/// struct (e.g. `f` becomes `_f`).
pub fn purify_name(versioned_name: &str) -> String {
    let base = match versioned_name.rfind('_') {
        Some(idx) if versioned_name[idx + 1..].chars().all(|c| c.is_ascii_digit())
            && idx + 1 < versioned_name.len() =>
        {
            &versioned_name[..idx]
        }
        _ => versioned_name,
    };
    format!("_{base}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::split_lines;

    #[test]
    fn registers_variables_and_fl_names() {
        let lines = split_lines("x = 1\nf = num(p: num) -> p").unwrap();
        let table = SymbolTable::build(&lines).unwrap();
        assert!(table.is_known("x"));
        assert!(table.is_known("f"));
        assert!(!table.is_known("y"));
    }

    #[test]
    fn null_is_not_registered() {
        let lines = split_lines("null = print(1)").unwrap();
        let table = SymbolTable::build(&lines).unwrap();
        assert!(!table.is_known("null"));
    }

    #[test]
    fn assign_increments_version() {
        let mut table = SymbolTable::default();
        assert_eq!(table.assign("x", Sort::Numeric), "x_1");
        assert_eq!(table.assign("x", Sort::Numeric), "x_2");
    }

    #[test]
    fn purify_strips_version_suffix() {
        assert_eq!(purify_name("x_3"), "_x");
        assert_eq!(purify_name("f"), "_f");
    }
}
