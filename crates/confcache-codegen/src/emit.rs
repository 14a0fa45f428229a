//! Rendering of keys and leaf values into generated source text

use confcache_core::{Scalar, Text};

use crate::CodegenError;

/// Single-quoted string literal with `\` and `'` escaped.
pub fn single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Double-quoted string literal; `$` is escaped to prevent interpolation.
pub fn double_quoted(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$");
    format!("\"{}\"", escaped)
}

/// Literal texts verbatim, quoted ones through `quote`.
pub fn text(value: &Text, quote: fn(&str) -> String) -> String {
    match value {
        Text::Literal(code) => code.clone(),
        Text::Quoted(s) => quote(s),
    }
}

/// Render a leaf value; `path` names the assignment target for errors.
pub fn scalar(value: &Scalar, path: &str) -> Result<String, CodegenError> {
    let rendered = match value {
        Scalar::Null => "null".to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Integer(n) => n.to_string(),
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Float(f) if f.is_finite() => format!("{:?}", f),
        Scalar::Float(f) => {
            return Err(CodegenError::UnsupportedValue {
                path: path.to_string(),
                reason: format!("non-finite float {}", f),
            })
        }
        Scalar::Text(t) => text(t, single_quoted),
    };
    Ok(rendered)
}
