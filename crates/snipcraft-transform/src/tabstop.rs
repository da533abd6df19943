//! Plain tab-stop syntax and snippet escaping.

/// Wrap `text` as the default value of tab-stop `counter`: `${N:text}`.
pub fn tab_stop(text: &str, counter: i64) -> String {
    format!("${{{counter}:{text}}}")
}

/// Backslash-escape the characters snippet bodies treat specially: `$`, `\` and `}`.
pub fn escape_snippet_syntax(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '$' | '\\' | '}') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
