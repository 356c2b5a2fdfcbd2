//! Embeds the three opaque external C++ fragments into the translator
//! binary as `include_str!` constants.

use std::collections::HashMap;
use std::sync::LazyLock;

static FRAGMENTS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("header", include_str!("../fragments/header.cpp"));
    m.insert("stdlib", include_str!("../fragments/stdlib.cpp"));
    m.insert("main_template", include_str!("../fragments/main_template.cpp"));
    m
});

pub fn header() -> &'static str {
    FRAGMENTS["header"]
}

pub fn stdlib() -> &'static str {
    FRAGMENTS["stdlib"]
}

pub fn main_template() -> &'static str {
    FRAGMENTS["main_template"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_carry_the_documented_abi() {
        assert!(header().contains("__print"));
        assert!(stdlib().contains("__add"));
        assert!(main_template().contains("{0}"));
    }
}
