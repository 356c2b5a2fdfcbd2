//! Compiler invocation configuration, builder-pattern style.

const DEFAULT_CXX: &str = "g++";
const DEFAULT_TEMPLATE_DEPTH: u32 = 50_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileConfig {
    cxx: String,
    template_depth: u32,
    keep_cpp: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        CompileConfig {
            cxx: DEFAULT_CXX.to_string(),
            template_depth: DEFAULT_TEMPLATE_DEPTH,
            keep_cpp: false,
        }
    }
}

impl CompileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cxx(mut self, cxx: impl Into<String>) -> Self {
        self.cxx = cxx.into();
        self
    }

    pub fn with_template_depth(mut self, depth: u32) -> Self {
        self.template_depth = depth;
        self
    }

    pub fn with_keep_cpp(mut self, keep: bool) -> Self {
        self.keep_cpp = keep;
        self
    }

    pub fn cxx(&self) -> &str {
        &self.cxx
    }

    pub fn template_depth(&self) -> u32 {
        self.template_depth
    }

    pub fn keep_cpp(&self) -> bool {
        self.keep_cpp
    }

    /// The `-ftemplate-depth=<N>` flag this configuration asks the C++
    /// compiler to use.
    pub fn template_depth_flag(&self) -> String {
        format!("-ftemplate-depth={}", self.template_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = CompileConfig::new();
        assert_eq!(config.cxx(), "g++");
        assert_eq!(config.template_depth(), 50_000);
        assert_eq!(config.template_depth_flag(), "-ftemplate-depth=50000");
    }

    #[test]
    fn builder_overrides_apply() {
        let config = CompileConfig::new().with_cxx("clang++").with_template_depth(1_000);
        assert_eq!(config.cxx(), "clang++");
        assert_eq!(config.template_depth(), 1_000);
    }
}
