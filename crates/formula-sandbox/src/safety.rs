//! Pre-parse safety gate.
//!
//! A purely textual validator run before any lexing. The patterns here
//! define the documented attack surface: none of them has a legitimate
//! use inside the formula grammar, so matching input is rejected with
//! [`ErrorKind::Unsafe`] without paying any parse cost.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::EvalError;
use crate::value::ErrorKind;

/// Inputs longer than this are rejected outright.
pub const MAX_EXPRESSION_CHARS: usize = 10_000;

/// Capability identifiers blocked as whole words, plus constructor shapes
/// for stream/reader/writer types.
const CAPABILITY_PATTERNS: &[&str] = &[
    r"(?i)\bimport\b",
    r"(?i)\busing\s+System\s*\.\s*IO\b",
    r"(?i)\bProcess\b",
    r"(?i)\bAssembly\b",
    r"(?i)\bFile\b",
    r"(?i)\bDirectory\b",
    r"(?i)\bThread\b",
    r"(?i)\bTask\s*\.\s*Run\b",
    r"(?i)\bEnvironment\b",
    r"(?i)\bReflection\b",
    r"(?i)\bDllImport\b",
    r"(?i)\bConsole\b",
    r"(?i)\bWindow\b",
    r"(?i)\bRegistry\b",
    r"(?i)\bActivator\b",
    r"(?i)\bAppDomain\b",
    r"(?i)\bGC\s*\.\s*Collect\b",
    r"(?i)\bnew\s+\w*(?:Stream|Reader|Writer)\b",
];

/// Reflection call shapes.
const REFLECTION_PATTERNS: &[&str] = &[
    r"(?i)GetType\s*\(\s*\)",
    r"(?i)GetMethod\s*\(",
    r"(?i)GetProperty\s*\(",
    r"(?i)InvokeMember\s*\(",
    r"(?i)\bInvoke\s*\(",
    r"(?i)\.\s*CreateInstance\s*\(",
    r"(?i)\bType\s*\.\s*GetType\s*\(",
    r"(?i)\bSystem\s*\.\s*Reflection\b",
    r"(?i)\bthis\s*\.\s*GetType\s*\(",
];

/// Host-language injection shapes. Statement separators and braces are
/// checked directly; the rest are syntactic templates.
const INJECTION_PATTERNS: &[&str] = &[
    r"(?i)\bclass\s+[A-Za-z_]\w*",
    r"(?i)\bnamespace\s+[A-Za-z_]\w*",
    r"(?i)\bwhile\s*\(\s*true\s*\)",
    r"for\s*\(\s*;\s*;\s*\)",
    r"(?i)#\s*(?:region|endregion|if|else|endif)\b",
];

fn compiled_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        CAPABILITY_PATTERNS
            .iter()
            .chain(REFLECTION_PATTERNS)
            .chain(INJECTION_PATTERNS)
            .map(|src| Regex::new(src).expect("blocklist pattern must compile"))
            .collect()
    })
}

/// Validate an expression before parsing.
///
/// Returns `Err` with [`ErrorKind::Unsafe`] when the expression is too
/// long, contains a statement separator or brace, or matches any
/// blocklist pattern.
pub fn check(expression: &str) -> Result<(), EvalError> {
    let char_len = expression.chars().count();
    if char_len > MAX_EXPRESSION_CHARS {
        return Err(EvalError::new(
            ErrorKind::Unsafe,
            format!("expression exceeds {MAX_EXPRESSION_CHARS} characters (got {char_len})"),
        ));
    }

    if let Some(ch) = expression.chars().find(|c| matches!(c, ';' | '{' | '}')) {
        return Err(EvalError::new(
            ErrorKind::Unsafe,
            format!("character '{ch}' is not allowed in a formula"),
        ));
    }

    for pattern in compiled_patterns() {
        if let Some(m) = pattern.find(expression) {
            return Err(EvalError::new(
                ErrorKind::Unsafe,
                format!("blocked pattern: \"{}\"", m.as_str()),
            ));
        }
    }

    Ok(())
}
