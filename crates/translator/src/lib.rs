//! VTA -> C++ template-metaprogramming translator.
//!
//! `translate` is the pure, synchronous core: source text and
//! caller-supplied stdin in, a C++ translation unit out. `compile` and
//! `run` shell out to an external C++ compiler.

pub mod ast;
pub mod builtins;
pub mod codegen;
pub mod config;
pub mod error;
pub mod fragments;
pub mod lexer;
pub mod lines;
pub mod parser;
pub mod sort;
pub mod symbols;

pub use ast::Program;
pub use config::CompileConfig;
pub use error::{VtaError, VtaResult};

use std::fmt;
use std::path::Path;
use std::process::Command;

/// Errors from the steps surrounding translation itself: invoking the
/// system C++ compiler and running the produced binary. Translation
/// failures (`VtaError`) are a distinct, smaller error domain;
/// this wraps them alongside the external-process failure modes.
#[derive(Debug)]
pub enum TranslatorError {
    Source(VtaError),
    Io(std::io::Error),
    /// The C++ compiler exited non-zero; payload is its stderr, forwarded
    /// verbatim.
    Compile(String),
}

impl fmt::Display for TranslatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslatorError::Source(e) => write!(f, "{e}"),
            TranslatorError::Io(e) => write!(f, "io error: {e}"),
            TranslatorError::Compile(stderr) => write!(f, "compile error: {stderr}"),
        }
    }
}

impl std::error::Error for TranslatorError {}

impl TranslatorError {
    /// The text to surface to a client as a task's `error` field: the bare
    /// message for a source error (no "parsing error:"/"translation error:"
    /// prefix), or the same text `Display` produces for the other variants.
    pub fn task_message(&self) -> String {
        match self {
            TranslatorError::Source(e) => e.message().to_string(),
            other => other.to_string(),
        }
    }
}

impl From<VtaError> for TranslatorError {
    fn from(e: VtaError) -> Self {
        TranslatorError::Source(e)
    }
}

impl From<std::io::Error> for TranslatorError {
    fn from(e: std::io::Error) -> Self {
        TranslatorError::Io(e)
    }
}

pub type TranslatorResult<T> = Result<T, TranslatorError>;

/// Parses `source` (consuming eager `read` calls from `stdin`) and emits
/// the corresponding C++ translation unit.
pub fn translate(source: &str, stdin: &str) -> VtaResult<String> {
    let program = parser::parse_program(source, stdin)?;
    Ok(codegen::emit(&program))
}

/// Translates `source` and writes the generated C++ to `cpp_path`.
pub fn translate_to_file(source: &str, stdin: &str, cpp_path: &Path) -> TranslatorResult<()> {
    let cpp = translate(source, stdin)?;
    std::fs::write(cpp_path, cpp)?;
    Ok(())
}

/// Invokes the configured C++ compiler on an already-written `.cpp` file,
/// producing `binary_path`. On a non-zero exit, the compiler's stderr is
/// captured and returned as `TranslatorError::Compile`.
pub fn compile(cpp_path: &Path, binary_path: &Path, config: &CompileConfig) -> TranslatorResult<()> {
    tracing::debug!(cxx = config.cxx(), ?cpp_path, ?binary_path, "invoking C++ compiler");
    let output = Command::new(config.cxx())
        .arg(cpp_path)
        .arg(config.template_depth_flag())
        .arg("-o")
        .arg(binary_path)
        .output()?;
    if !output.status.success() {
        return Err(TranslatorError::Compile(
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ));
    }
    Ok(())
}

/// Runs a compiled binary, forwarding `stdin` to its standard input and
/// returning its captured stdout. Callers needing a wall-clock timeout
/// wrap this in their own deadline (see `vta-service`'s
/// executor, which cannot be expressed here without pulling in an async
/// runtime this library otherwise has no use for).
pub fn run(binary_path: &Path, stdin: &str) -> TranslatorResult<String> {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(binary_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    if let Some(mut child_stdin) = child.stdin.take() {
        child_stdin.write_all(stdin.as_bytes())?;
    }
    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(TranslatorError::Compile(
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Translates, compiles, and runs `source` end to end, returning the
/// program's stdout. Intended for the `vtac run` CLI subcommand and for
/// translator-level integration tests; the HTTP task service reimplements
/// this sequence with its own timeout/worker-pool plumbing.
pub fn translate_compile_run(
    source: &str,
    stdin: &str,
    workdir: &Path,
    name: &str,
    config: &CompileConfig,
) -> TranslatorResult<String> {
    let cpp_path = workdir.join(format!("{name}.cpp"));
    let binary_path = workdir.join(name);
    translate_to_file(source, stdin, &cpp_path)?;
    compile(&cpp_path, &binary_path, config)?;
    let result = run(&binary_path, stdin);
    if !config.keep_cpp() {
        let _ = std::fs::remove_file(&cpp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_produces_declarations_and_main_call() {
        let cpp = translate("x = add(2, 3)\nnull = print(x)", "").unwrap();
        assert!(cpp.contains("struct x_1"));
        assert!(cpp.contains("int main()"));
    }

    fn g_plus_plus_available() -> bool {
        Command::new("g++").arg("--version").output().is_ok()
    }

    #[test]
    fn end_to_end_addition() {
        if !g_plus_plus_available() {
            eprintln!("skipping: g++ not available");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let config = CompileConfig::new();
        let stdout = translate_compile_run(
            "x = add(2, 3)\nnull = print(x)",
            "",
            dir.path(),
            "scenario_a",
            &config,
        )
        .unwrap();
        assert_eq!(stdout.trim(), "5");
    }

    #[test]
    fn end_to_end_eager_read() {
        if !g_plus_plus_available() {
            eprintln!("skipping: g++ not available");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let config = CompileConfig::new();
        let stdout = translate_compile_run(
            "y = read(0)\nnull = print(mul(y, y))",
            "7",
            dir.path(),
            "scenario_c",
            &config,
        )
        .unwrap();
        assert_eq!(stdout.trim(), "49");
    }

    #[test]
    fn end_to_end_functional_literal_recursion() {
        if !g_plus_plus_available() {
            eprintln!("skipping: g++ not available");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let config = CompileConfig::new();
        let stdout = translate_compile_run(
            "f = num(x: num) -> f(add(x, 1))\nf(900) = 0\nnull = print(f(1))",
            "",
            dir.path(),
            "scenario_e",
            &config,
        )
        .unwrap();
        assert_eq!(stdout.trim(), "0");
    }

    #[test]
    fn end_to_end_if_builtin() {
        if !g_plus_plus_available() {
            eprintln!("skipping: g++ not available");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let config = CompileConfig::new();
        let stdout = translate_compile_run(
            "null = print(if(lt(3, 5), 1, 2))",
            "",
            dir.path(),
            "scenario_f",
            &config,
        )
        .unwrap();
        assert_eq!(stdout.trim(), "1");
    }
}
