//! Merge-tag substitution.
//!
//! Two tag forms over plain text:
//!
//! - `{{path.to.field}}` substitutes a scalar looked up in the merge data.
//! - `{{#key}}...{{/key}}` repeats the enclosed block once per element of
//!   the array bound to `key`, each element becoming the merge data for the
//!   block.
//!
//! Loops are expanded before scalars, so placeholders an element cannot
//! resolve get a second chance against the outer data. Anything still
//! unresolved after both passes stays in the output verbatim.

use serde_json::Value;

/// Expands a template against merge data.
///
/// Loop blocks are matched by scanning for the first `{{#key}}` and pairing
/// it with its closing tag, tracking open/close depth for the same key so
/// self-nested blocks pair correctly. A non-array or missing binding expands
/// to nothing; a loop start with no matching close discards the rest of the
/// text from the start tag on. Scalar paths split on `.` and walk the data;
/// strings, numbers, and booleans render, while missing values, `null`,
/// objects, and arrays leave the placeholder untouched.
#[must_use]
pub fn process_template(template: &str, data: &Value) -> String {
    let expanded = expand_loops(template, data);
    substitute_scalars(&expanded, data)
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_path_byte(b: u8) -> bool {
    is_key_byte(b) || b == b'.'
}

fn expand_loops(template: &str, data: &Value) -> String {
    let mut out = template.to_string();
    let mut scan = 0;
    while let Some(rel) = out[scan..].find("{{#") {
        let start = scan + rel;
        let key_start = start + 3;
        let Some(key_rel) = out[key_start..].find("}}") else {
            break;
        };
        let key_end = key_start + key_rel;
        let key = out[key_start..key_end].to_string();
        if key.is_empty() || !key.bytes().all(is_key_byte) {
            scan = key_start;
            continue;
        }

        let body_start = key_end + 2;
        let Some(close_start) = find_matching_close(&out, &key, body_start) else {
            // Unmatched loop start: nothing after it is emitted.
            out.truncate(start);
            break;
        };
        let close_end = close_start + key.len() + 5;

        let inner = out[body_start..close_start].to_string();
        let expanded = match data.get(&key) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| process_template(&inner, item))
                .collect::<String>(),
            _ => String::new(),
        };
        out.replace_range(start..close_end, &expanded);
        scan = start;
    }
    out
}

/// Finds the close tag pairing the open tag whose body starts at `from`,
/// counting further same-key opens so nesting balances.
fn find_matching_close(text: &str, key: &str, from: usize) -> Option<usize> {
    let open = format!("{{{{#{key}}}}}");
    let close = format!("{{{{/{key}}}}}");
    let mut depth = 1;
    let mut pos = from;
    loop {
        let close_rel = text[pos..].find(&close)?;
        match text[pos..].find(&open) {
            Some(open_rel) if open_rel < close_rel => {
                depth += 1;
                pos += open_rel + open.len();
            }
            _ => {
                if depth == 1 {
                    return Some(pos + close_rel);
                }
                depth -= 1;
                pos += close_rel + close.len();
            }
        }
    }
}

fn substitute_scalars(text: &str, data: &Value) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end_rel) = after.find("}}") else {
            break;
        };
        let token = &after[..end_rel];
        if token.is_empty()
            || token.starts_with('#')
            || token.starts_with('/')
            || !token.bytes().all(is_path_byte)
        {
            // Loop tags and malformed tokens pass through untouched.
            out.push_str(&rest[..start + 2]);
            rest = &rest[start + 2..];
            continue;
        }
        let tag_end = start + 2 + end_rel + 2;
        match resolve_path(data, token) {
            Some(rendered) => {
                out.push_str(&rest[..start]);
                out.push_str(&rendered);
            }
            None => out.push_str(&rest[..tag_end]),
        }
        rest = &rest[tag_end..];
    }
    out.push_str(rest);
    out
}

fn resolve_path(data: &Value, path: &str) -> Option<String> {
    let mut current = data;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}
