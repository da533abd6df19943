//! Backslash escape decoding for replacement templates.
//!
//! Recognized sequences: `\\`, `\t`, `\n`, `\r`, `\f`, `\v`, `\xHH` and
//! `\uHHHH`. Anything else, including malformed hex escapes, is copied
//! through with its backslash. `$` references are left for the regex
//! replacement step.

/// Decode escape sequences in a single left-to-right pass.
///
/// `\\n` therefore yields a backslash followed by `n`, not a newline.
pub fn decode_escapes(template: &str) -> String {
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];
        if ch != '\\' || pos + 1 >= chars.len() {
            out.push(ch);
            pos += 1;
            continue;
        }

        let simple = match chars[pos + 1] {
            '\\' => Some('\\'),
            't' => Some('\t'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            'f' => Some('\u{000C}'),
            'v' => Some('\u{000B}'),
            _ => None,
        };
        if let Some(decoded) = simple {
            out.push(decoded);
            pos += 2;
            continue;
        }

        let hex_len = match chars[pos + 1] {
            'x' => 2,
            'u' => 4,
            _ => 0,
        };
        match hex_value(&chars, pos + 2, hex_len).and_then(char::from_u32) {
            Some(decoded) if hex_len > 0 => {
                out.push(decoded);
                pos += 2 + hex_len;
            }
            _ => {
                // Unknown escape: keep the backslash, the next char is handled normally.
                out.push('\\');
                pos += 1;
            }
        }
    }

    out
}

/// Parse exactly `len` hex digits starting at `start`.
fn hex_value(chars: &[char], start: usize, len: usize) -> Option<u32> {
    if len == 0 || start + len > chars.len() {
        return None;
    }
    chars[start..start + len]
        .iter()
        .try_fold(0u32, |acc, c| c.to_digit(16).map(|d| acc * 16 + d))
}
