//! POSIX shell quoting.
//!
//! Every argument the converter emits that carries request data (method, URL,
//! header lines, body) goes through [`shell_quote`]. The result is a single
//! shell word that evaluates to exactly the input text.

/// Wrap `input` in single quotes, rewriting each embedded `'` as `'\''`.
///
/// Nothing else is touched: double quotes, `$`, backslashes and newlines are
/// all literal inside single quotes.
pub fn shell_quote(input: &str) -> String {
    let mut quoted = String::with_capacity(input.len() + 2);
    quoted.push('\'');
    for ch in input.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}
