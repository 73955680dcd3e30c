//! Lenient JSON repair for model output
//!
//! Fixes the two defects models produce most often:
//! - trailing commas before `]` or `}`
//! - literal newline, carriage-return and tab characters inside string literals
//!
//! The scan tracks string state, so layout whitespace between tokens is untouched.

/// Repair `text` so that a strict JSON parser has a chance of accepting it
#[must_use]
pub fn repair_json(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' if closes_after(&chars[i + 1..]) => {}
            _ => out.push(c),
        }
    }

    out
}

/// Whether the next non-whitespace character closes an array or object
fn closes_after(rest: &[char]) -> bool {
    rest.iter()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| matches!(c, ']' | '}'))
}
